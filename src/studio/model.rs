//! Data models for generated assets: avatars, scripts, production slots and
//! uploaded media.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

// =============================================================================
// AVATARS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarTraits {
    pub ethnicity: String,
    pub age: String,
    pub gender: String,
    pub vibe: String,
}

/// Digital human presenter. `img` stays `None` until its render lands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Avatar {
    pub id: String,
    pub name: String,
    pub img: Option<String>,
    /// Full visual description used as the image prompt.
    pub desc: String,
    pub traits: AvatarTraits,
    pub is_custom: bool,
}

impl Avatar {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: Set visual description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn with_traits(mut self, traits: AvatarTraits) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_img(mut self, img: impl Into<String>) -> Self {
        self.img = Some(img.into());
        self
    }

    pub fn custom(mut self) -> Self {
        self.is_custom = true;
        self
    }
}

// =============================================================================
// SCRIPTS
// =============================================================================

/// Subtitle styling suggested by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubtitleStrategy {
    pub font: String,
    pub color: String,
    pub size: String,
    pub animation: String,
    /// Keywords or timestamps to highlight.
    pub explosive_moments: Vec<String>,
}

/// Voice-over preferences for one script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioSettings {
    pub voice_id: String,
    pub style: String,
    /// Pacing option.
    pub speed: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            voice_id: "Puck".to_string(),
            style: "Excited (Viral)".to_string(),
            speed: "Normal".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    #[default]
    #[serde(rename = "AI_Avatar")]
    AiAvatar,
    #[serde(rename = "Local_Footage")]
    LocalFootage,
    #[serde(rename = "Product_Image")]
    ProductImage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScriptScene {
    pub time: String,
    pub visual: String,
    pub audio: String,
    pub asset_type: AssetType,
}

impl ScriptScene {
    pub fn new(time: impl Into<String>, visual: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            time: time.into(),
            visual: visual.into(),
            audio: String::new(),
            asset_type,
        }
    }
}

/// Where a script came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptSource {
    #[default]
    #[serde(rename = "AI_GEN")]
    AiGenerated,
    #[serde(rename = "USER_PROMPT")]
    UserPrompted,
}

/// One script variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketingScript {
    pub id: String,
    pub version_name: String,
    pub style: String,
    pub platform: String,
    pub duration: String,
    pub copy: String,
    pub title: String,
    pub hashtags: Vec<String>,
    pub subtitle_strategy: SubtitleStrategy,
    pub audio_settings: AudioSettings,
    pub scenes: Vec<ScriptScene>,
    pub cta: String,
    pub source: ScriptSource,
}

impl MarketingScript {
    pub fn new(id: impl Into<String>, version_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version_name: version_name.into(),
            ..Default::default()
        }
    }

    /// Builder: Set visual style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Builder: Set narration copy.
    pub fn with_copy(mut self, copy: impl Into<String>) -> Self {
        self.copy = copy.into();
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_scene(mut self, scene: ScriptScene) -> Self {
        self.scenes.push(scene);
        self
    }

    pub fn with_source(mut self, source: ScriptSource) -> Self {
        self.source = source;
        self
    }

    /// Scene visuals joined into one render prompt.
    pub fn video_prompt(&self) -> String {
        let visuals: Vec<&str> = self.scenes.iter().map(|s| s.visual.as_str()).collect();
        format!("{}. Style: {}.", visuals.join(" "), self.style)
    }
}

// =============================================================================
// PRODUCTION SLOTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    Idle,
    Generating,
    Done,
    Error(String),
}

/// Prompt-history entry recorded for a render without an instruction.
pub const INITIAL_PROMPT: &str = "Initial";

/// Render target in the studio. History is newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSlot {
    pub id: usize,
    pub script_id: String,
    pub status: SlotStatus,
    pub current_url: Option<String>,
    pub history: Vec<String>,
    pub prompt_history: Vec<String>,
}

impl ProductionSlot {
    pub fn new(id: usize, script_id: impl Into<String>) -> Self {
        Self {
            id,
            script_id: script_id.into(),
            ..Default::default()
        }
    }

    /// Records a finished render as the newest version.
    pub fn push_version(&mut self, url: impl Into<String>, instruction: Option<&str>) {
        let url = url.into();
        self.history.insert(0, url.clone());
        self.prompt_history
            .insert(0, instruction.unwrap_or(INITIAL_PROMPT).to_string());
        self.current_url = Some(url);
        self.status = SlotStatus::Done;
    }

    /// "V{n}" label of the history entry at `index`; the newest has the largest n.
    pub fn version_label(&self, index: usize) -> Option<String> {
        (index < self.history.len()).then(|| format!("V{}", self.history.len() - index))
    }

    pub fn download_name(&self, index: usize) -> Option<String> {
        (index < self.history.len())
            .then(|| format!("Slot_{}_V{}.mp4", self.id, self.history.len() - index))
    }
}

// =============================================================================
// MEDIA ASSETS
// =============================================================================

/// Uploaded file held in memory as an inline data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub name: String,
    pub mime: String,
    pub data_url: String,
}

impl MediaAsset {
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: &[u8]) -> Self {
        let mime = mime.into();
        let data_url = format!("data:{};base64,{}", mime, STANDARD.encode(bytes));
        Self {
            name: name.into(),
            mime,
            data_url,
        }
    }

    /// Reads a file, guessing its mime type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_bytes(name, guess_mime(path), &bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.mime.starts_with("video/")
    }
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// TESTS
// =============================================================================
