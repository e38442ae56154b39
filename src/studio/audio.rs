//! AudioDesk: voice-over tracks keyed by script id, with a single global
//! generation slot and single-track playback.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog;
use crate::error::{StudioError, StudioResult};
use crate::gateway::GatewayError;
use crate::studio::model::{AudioSettings, MarketingScript};
use crate::task::{MergeOutcome, RequestSeq, Ticket};

/// Editable audio setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioField {
    Voice,
    Style,
    Speed,
}

impl AudioField {
    /// Validates `value` against the catalog and writes it into `settings`.
    pub fn apply(self, settings: &mut AudioSettings, value: &str) -> StudioResult<()> {
        match self {
            AudioField::Voice => {
                catalog::voice_option(value).ok_or_else(|| StudioError::unknown_option("voice", value))?;
                settings.voice_id = value.to_string();
            }
            AudioField::Style => {
                if !catalog::AUDIO_STYLES.contains(&value) {
                    return Err(StudioError::unknown_option("audio style", value));
                }
                settings.style = value.to_string();
            }
            AudioField::Speed => {
                if !catalog::PACING_OPTIONS.contains(&value) {
                    return Err(StudioError::unknown_option("pacing", value));
                }
                settings.speed = value.to_string();
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AudioDesk {
    tracks: HashMap<String, String>,
    seqs: HashMap<String, RequestSeq>,
    generating: Option<String>,
    playing: Option<String>,
}

impl AudioDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, script_id: &str) -> Option<&str> {
        self.tracks.get(script_id).map(String::as_str)
    }

    pub fn tracks(&self) -> &HashMap<String, String> {
        &self.tracks
    }

    pub fn generating(&self) -> Option<&str> {
        self.generating.as_deref()
    }

    pub fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }

    /// Drops the cached track after a settings change and supersedes any
    /// outstanding request for it.
    pub fn invalidate(&mut self, script_id: &str) {
        self.tracks.remove(script_id);
        self.seqs.entry(script_id.to_string()).or_default().invalidate();
        if self.playing.as_deref() == Some(script_id) {
            self.playing = None;
        }
    }

    /// Claims the global generation slot for `script_id`.
    pub fn begin(&mut self, script_id: &str) -> StudioResult<Ticket> {
        if let Some(busy) = &self.generating {
            return Err(StudioError::AudioBusy(busy.clone()));
        }
        self.generating = Some(script_id.to_string());
        let ticket = self.seqs.entry(script_id.to_string()).or_default().issue();
        info!(script = script_id, "Voice-over requested");
        Ok(ticket)
    }

    /// Stores the track unless the settings changed since `begin`. Replies to
    /// superseded requests are `Stale` whether they succeeded or failed.
    pub fn complete(
        &mut self,
        script_id: &str,
        ticket: Ticket,
        result: Result<String, GatewayError>,
    ) -> Result<MergeOutcome, GatewayError> {
        if self.generating.as_deref() == Some(script_id) {
            self.generating = None;
        }
        let current = self
            .seqs
            .get(script_id)
            .is_some_and(|seq| seq.is_current(ticket));
        if !current {
            warn!(script = script_id, "Discarding voice-over for outdated settings");
            return Ok(MergeOutcome::Stale);
        }
        let url = result?;
        self.tracks.insert(script_id.to_string(), url);
        Ok(MergeOutcome::Applied)
    }

    /// Starts or stops playback. Returns true if `script_id` is now playing.
    pub fn toggle_playback(&mut self, script_id: &str) -> StudioResult<bool> {
        if self.playing.as_deref() == Some(script_id) {
            self.playing = None;
            return Ok(false);
        }
        if !self.tracks.contains_key(script_id) {
            return Err(StudioError::NoAudio(script_id.to_string()));
        }
        self.playing = Some(script_id.to_string());
        Ok(true)
    }

    pub fn playback_finished(&mut self, script_id: &str) {
        if self.playing.as_deref() == Some(script_id) {
            self.playing = None;
        }
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        for seq in self.seqs.values_mut() {
            seq.invalidate();
        }
        self.generating = None;
        self.playing = None;
    }
}

/// File name offered when saving a voice-over.
pub fn download_name(script: &MarketingScript) -> String {
    format!(
        "{}_{}.wav",
        script.version_name, script.audio_settings.voice_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_global_generation() {
        let mut desk = AudioDesk::new();
        let ticket = desk.begin("s1").unwrap();
        assert!(matches!(desk.begin("s2"), Err(StudioError::AudioBusy(id)) if id == "s1"));

        desk.complete("s1", ticket, Ok("blob:1".to_string())).unwrap();
        assert_eq!(desk.generating(), None);
        assert_eq!(desk.track("s1"), Some("blob:1"));
        assert!(desk.begin("s2").is_ok());
    }

    #[test]
    fn test_failure_frees_generation_slot() {
        let mut desk = AudioDesk::new();
        let ticket = desk.begin("s1").unwrap();
        assert!(desk.complete("s1", ticket, Err(GatewayError::EmptyResponse)).is_err());
        assert_eq!(desk.generating(), None);
        assert!(desk.track("s1").is_none());
    }

    #[test]
    fn test_settings_change_discards_inflight_track() {
        let mut desk = AudioDesk::new();
        let ticket = desk.begin("s1").unwrap();
        desk.invalidate("s1");

        let outcome = desk.complete("s1", ticket, Ok("blob:old".to_string())).unwrap();
        assert_eq!(outcome, MergeOutcome::Stale);
        assert!(desk.track("s1").is_none());
    }

    #[test]
    fn test_superseded_failure_is_stale_not_error() {
        let mut desk = AudioDesk::new();
        let ticket = desk.begin("s1").unwrap();
        desk.invalidate("s1");

        let outcome = desk.complete("s1", ticket, Err(GatewayError::EmptyResponse)).unwrap();
        assert_eq!(outcome, MergeOutcome::Stale);
        assert_eq!(desk.generating(), None);
    }

    #[test]
    fn test_invalidate_drops_cached_track() {
        let mut desk = AudioDesk::new();
        let ticket = desk.begin("s1").unwrap();
        desk.complete("s1", ticket, Ok("blob:1".to_string())).unwrap();
        desk.toggle_playback("s1").unwrap();

        desk.invalidate("s1");
        assert!(desk.track("s1").is_none());
        assert_eq!(desk.playing(), None);
    }

    #[test]
    fn test_playback_is_exclusive() {
        let mut desk = AudioDesk::new();
        for id in ["s1", "s2"] {
            let ticket = desk.begin(id).unwrap();
            desk.complete(id, ticket, Ok(format!("blob:{id}"))).unwrap();
        }

        assert!(desk.toggle_playback("s1").unwrap());
        assert!(desk.toggle_playback("s2").unwrap());
        assert_eq!(desk.playing(), Some("s2"));
        assert!(!desk.toggle_playback("s2").unwrap());
        assert_eq!(desk.playing(), None);

        desk.toggle_playback("s1").unwrap();
        desk.playback_finished("s1");
        assert_eq!(desk.playing(), None);
        assert!(matches!(desk.toggle_playback("s9"), Err(StudioError::NoAudio(_))));
    }

    #[test]
    fn test_field_validation() {
        let mut settings = AudioSettings::default();
        AudioField::Voice.apply(&mut settings, "Kore-ASMR").unwrap();
        AudioField::Speed.apply(&mut settings, "Fast (Urgent)").unwrap();
        assert_eq!(settings.voice_id, "Kore-ASMR");
        assert_eq!(settings.speed, "Fast (Urgent)");
        assert!(AudioField::Style.apply(&mut settings, "Yelling").is_err());
    }

    #[test]
    fn test_download_name() {
        let mut script = MarketingScript::new("s1", "Hook A");
        script.audio_settings.voice_id = "Charon".to_string();
        assert_eq!(download_name(&script), "Hook A_Charon.wav");
    }
}
