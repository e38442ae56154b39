//! Error types for the campaign wizard and generation orchestrator.

use thiserror::Error;

use crate::wizard::Stage;

/// Result type alias for studio operations.
pub type StudioResult<T> = Result<T, StudioError>;

/// Errors returned when an intent cannot be applied to the session.
///
/// Gateway failures raised during an intent are folded into entity or stage
/// state instead.
#[derive(Error, Debug)]
pub enum StudioError {
    /// Intent issued on the wrong stage.
    #[error("Expected stage {expected:?}, wizard is on {actual:?}")]
    StageMismatch { expected: Stage, actual: Stage },

    /// No product analysis is available yet.
    #[error("Product analysis has not completed")]
    MissingAnalysis,

    /// Strategy requires at least one target country.
    #[error("At least one target country must be selected")]
    NoCountriesSelected,

    /// Studio requires at least one selected script.
    #[error("At least one script must be selected")]
    NoScriptsSelected,

    /// Script selection is capped.
    #[error("Cannot select more than {0} scripts")]
    SelectionLimit(usize),

    /// Script not found in the current collection.
    #[error("Script not found: {0}")]
    ScriptNotFound(String),

    /// Avatar not found in the roster.
    #[error("Avatar not found: {0}")]
    AvatarNotFound(String),

    /// Production slot index out of range.
    #[error("Slot not found: {0}")]
    SlotNotFound(usize),

    /// History entry index out of range for a slot.
    #[error("Slot {slot} has no version at index {index}")]
    VersionNotFound { slot: usize, index: usize },

    /// Strategy is read-only outside the strategy stage.
    #[error("Strategy is frozen on stage {0:?}")]
    StrategyFrozen(Stage),

    /// Value rejected by the option catalog.
    #[error("Unknown {field}: {value}")]
    UnknownOption { field: &'static str, value: String },

    /// Another audio track is being generated.
    #[error("Audio generation already running for script {0}")]
    AudioBusy(String),

    /// Playback requested for a script without a generated track.
    #[error("No audio generated for script {0}")]
    NoAudio(String),

    /// Required free-text input was blank.
    #[error("Input must not be empty")]
    EmptyInput,

    /// Revision needs an instruction or a refinement image.
    #[error("Revision needs an instruction or a refinement image")]
    EmptyRevision,

    /// Configuration value rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Snapshot could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StudioError {
    /// Creates a StageMismatch error.
    pub fn stage_mismatch(expected: Stage, actual: Stage) -> Self {
        Self::StageMismatch { expected, actual }
    }

    /// Creates a ScriptNotFound error.
    pub fn script_not_found(id: impl Into<String>) -> Self {
        Self::ScriptNotFound(id.into())
    }

    /// Creates an AvatarNotFound error.
    pub fn avatar_not_found(id: impl Into<String>) -> Self {
        Self::AvatarNotFound(id.into())
    }

    /// Creates an UnknownOption error.
    pub fn unknown_option(field: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownOption {
            field,
            value: value.into(),
        }
    }

    /// Creates an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
