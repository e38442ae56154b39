//! Generation orchestrator.
//!
//! This module provides:
//! - `model`: avatars, scripts, production slots, media assets
//! - `scripts`: ScriptBoard with batch merge and capped selection
//! - `avatars`: AvatarRoster with in-flight portrait guard
//! - `audio`: AudioDesk with single global generation slot
//! - `slots`: SlotBoard with versioned renders

pub mod audio;
pub mod avatars;
pub mod model;
pub mod scripts;
pub mod slots;

pub use audio::{AudioDesk, AudioField};
pub use avatars::AvatarRoster;
pub use model::*;
pub use scripts::{ScriptBoard, ScriptMerge};
pub use slots::SlotBoard;

use crate::config::StudioConfig;
use crate::error::StudioResult;
use crate::task::TaskState;

/// Everything generated after the analysis stage.
#[derive(Debug, Clone)]
pub struct Studio {
    pub scripts: ScriptBoard,
    pub avatars: AvatarRoster,
    pub audio: AudioDesk,
    pub slots: SlotBoard,
    pub footage: Vec<MediaAsset>,
    pub custom_prompt: String,
    pub scene_image: TaskState<String>,
}

impl Studio {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            scripts: ScriptBoard::new(config.max_selected_scripts),
            avatars: AvatarRoster::new(),
            audio: AudioDesk::new(),
            slots: SlotBoard::new(),
            footage: Vec::new(),
            custom_prompt: String::new(),
            scene_image: TaskState::Idle,
        }
    }

    /// Updates one audio setting and drops the script's cached track.
    pub fn set_audio(&mut self, script_id: &str, field: AudioField, value: &str) -> StudioResult<()> {
        let script = self.scripts.script_mut(script_id)?;
        field.apply(&mut script.audio_settings, value)?;
        self.audio.invalidate(script_id);
        Ok(())
    }

    /// Footage images as data URLs, in upload order.
    pub fn image_footage(&self) -> Vec<String> {
        self.footage
            .iter()
            .filter(|asset| asset.is_image())
            .map(|asset| asset.data_url.clone())
            .collect()
    }

    /// Clears the campaign's generated state. Avatars survive a restart.
    pub fn clear(&mut self) {
        self.scripts.clear();
        self.audio.clear();
        self.slots.clear();
        self.footage.clear();
        self.custom_prompt.clear();
        self.scene_image = TaskState::Idle;
    }
}
