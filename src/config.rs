//! Runtime configuration for the gateway bridge and the orchestrator.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StudioError, StudioResult};

pub const DEFAULT_GATEWAY_PATH: &str = "/.netlify/functions/chat";
pub const DEFAULT_CREDENTIAL_ENV: &str = "GCE_VIDEO_API_KEY";

/// Orchestrator and bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Base URL of the serverless proxy, without the function path.
    pub gateway_url: String,
    pub gateway_path: String,
    /// Transport timeout for one gateway round trip.
    pub request_timeout_secs: u64,
    /// Number of production slots built when entering the editor.
    pub slot_count: usize,
    pub avatar_batch_size: usize,
    /// Profiles from each batch whose images are rendered immediately.
    pub avatar_autorender: usize,
    pub max_selected_scripts: usize,
    /// Environment variable holding the paid video credential.
    pub credential_env: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:8888".to_string(),
            gateway_path: DEFAULT_GATEWAY_PATH.to_string(),
            request_timeout_secs: 600,
            slot_count: 5,
            avatar_batch_size: 10,
            avatar_autorender: 5,
            max_selected_scripts: 5,
            credential_env: DEFAULT_CREDENTIAL_ENV.to_string(),
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `GCE_*` environment variables.
    pub fn from_env() -> StudioResult<Self> {
        let mut config = Self::default();
        if let Ok(url) = env::var("GCE_GATEWAY_URL") {
            config.gateway_url = url;
        }
        if let Ok(path) = env::var("GCE_GATEWAY_PATH") {
            config.gateway_path = path;
        }
        if let Some(secs) = parse_var("GCE_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout_secs = secs;
        }
        if let Some(count) = parse_var("GCE_SLOT_COUNT")? {
            config.slot_count = count;
        }
        if let Some(batch) = parse_var("GCE_AVATAR_BATCH")? {
            config.avatar_batch_size = batch;
        }
        if let Some(max) = parse_var("GCE_MAX_SELECTED_SCRIPTS")? {
            config.max_selected_scripts = max;
        }
        if let Ok(name) = env::var("GCE_CREDENTIAL_ENV") {
            config.credential_env = name;
        }
        config.validate()?;
        Ok(config)
    }

    /// Builder: Set gateway base URL.
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    /// Builder: Set gateway function path.
    pub fn with_gateway_path(mut self, path: impl Into<String>) -> Self {
        self.gateway_path = path.into();
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_slot_count(mut self, count: usize) -> Self {
        self.slot_count = count;
        self
    }

    pub fn with_avatar_batch_size(mut self, size: usize) -> Self {
        self.avatar_batch_size = size;
        self
    }

    pub fn with_avatar_autorender(mut self, count: usize) -> Self {
        self.avatar_autorender = count;
        self
    }

    pub fn with_max_selected_scripts(mut self, max: usize) -> Self {
        self.max_selected_scripts = max;
        self
    }

    pub fn with_credential_env(mut self, name: impl Into<String>) -> Self {
        self.credential_env = name.into();
        self
    }

    /// Full endpoint the bridge posts prompts to.
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.gateway_url.trim_end_matches('/'),
            self.gateway_path
        )
    }

    pub fn validate(&self) -> StudioResult<()> {
        if self.gateway_url.trim().is_empty() {
            return Err(StudioError::invalid_config("gateway_url is empty"));
        }
        let counts = [
            ("request_timeout_secs", self.request_timeout_secs as usize),
            ("slot_count", self.slot_count),
            ("avatar_batch_size", self.avatar_batch_size),
            ("max_selected_scripts", self.max_selected_scripts),
        ];
        if let Some((name, _)) = counts.iter().find(|(_, value)| *value == 0) {
            return Err(StudioError::invalid_config(format!("{name} must be positive")));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str) -> StudioResult<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StudioError::invalid_config(format!("{name}={raw} is not a number"))),
        Err(_) => Ok(None),
    }
}
