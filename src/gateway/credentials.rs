//! Credential stores for the paid video render.

use async_trait::async_trait;
use tracing::warn;

use crate::config::DEFAULT_CREDENTIAL_ENV;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn has_credential(&self) -> bool;

    /// Prompts for the credential. Callers re-check afterwards.
    async fn request(&self);
}

/// Reads the credential from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_CREDENTIAL_ENV)
    }
}

#[async_trait]
impl CredentialStore for EnvCredentials {
    async fn has_credential(&self) -> bool {
        std::env::var(&self.var)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }

    async fn request(&self) {
        warn!(var = %self.var, "Video credential missing; export it and retry");
    }
}
