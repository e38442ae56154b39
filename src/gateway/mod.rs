//! AI gateway: the async seam between the orchestrator and the provider.
//!
//! - `client`: `HttpBridge`, posting prompts to the serverless proxy
//! - `bridge`: `BridgeGateway`, building prompts and parsing replies
//! - `credentials`: credential stores gating paid video renders

pub mod bridge;
pub mod client;
pub mod credentials;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::studio::model::{AudioSettings, Avatar, MarketingScript};
use crate::wizard::model::{AnalysisResult, CompetitorData, Language, ProductAnalysis, StrategySummary};

pub use bridge::BridgeGateway;
pub use client::HttpBridge;
pub use credentials::{CredentialStore, EnvCredentials};

// =============================================================================
// ERRORS
// =============================================================================

/// Gateway failures.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Failed to parse reply: {0}")]
    Parse(String),
    #[error("Provider returned an empty reply")]
    EmptyResponse,
    #[error("Video credential unavailable")]
    CredentialUnavailable,
}

impl GatewayError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Product analysis input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub input: String,
    /// Product photo as a data URL.
    pub image: Option<String>,
    pub language: Language,
}

/// Everything the provider needs to write a script batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub product: ProductAnalysis,
    pub competitors: Vec<CompetitorData>,
    pub strategy: StrategySummary,
    pub hooks: Vec<String>,
    /// Image footage as data URLs.
    pub footage: Vec<String>,
    pub custom_prompt: Option<String>,
}

/// Custom avatar description and/or reference image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAvatarRequest {
    pub text: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub settings: AudioSettings,
}

/// One video render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRequest {
    pub prompt: String,
    pub reference_image: Option<String>,
    pub narration: String,
    pub duration: String,
    pub aspect_ratio: String,
    pub footage_count: usize,
    /// Render without burned-in subtitles.
    pub clean_feed: bool,
    pub instruction: Option<String>,
    pub avatar_hint: Option<String>,
    pub language: String,
}

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// Opaque async AI provider.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn analyze_product(&self, request: &AnalysisRequest) -> Result<AnalysisResult, GatewayError>;

    async fn generate_scripts(&self, request: &ScriptRequest) -> Result<Vec<MarketingScript>, GatewayError>;

    /// Returns `count` avatar profiles without images.
    async fn generate_avatar_profiles(&self, count: usize) -> Result<Vec<Avatar>, GatewayError>;

    /// Renders an avatar portrait from its visual description; returns an image URL.
    async fn generate_avatar_image(&self, description: &str) -> Result<String, GatewayError>;

    async fn analyze_custom_avatar(&self, request: &CustomAvatarRequest) -> Result<Avatar, GatewayError>;

    async fn generate_scene_image(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Returns a playable audio URL.
    async fn generate_speech(&self, request: &SpeechRequest) -> Result<String, GatewayError>;

    /// Returns a video URL.
    async fn generate_video(&self, request: &VideoRequest) -> Result<String, GatewayError>;

    /// True if the paid video credential is available.
    async fn has_credential(&self) -> bool;

    /// Asks the user to provide the video credential.
    async fn request_credential(&self);
}
