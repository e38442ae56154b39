//! HTTP bridge to the serverless AI proxy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::StudioConfig;
use crate::gateway::GatewayError;

/// Raw text-in/text-out access to the provider.
#[async_trait]
pub trait PromptBridge: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatReply {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Posts `{"prompt": ...}` to the proxy function and reads `{"text": ...}`.
pub struct HttpBridge {
    client: Client,
    endpoint: String,
}

impl HttpBridge {
    /// Create a bridge posting to `endpoint` with a transport timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn from_config(config: &StudioConfig) -> Result<Self, GatewayError> {
        Self::new(
            &config.endpoint(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PromptBridge for HttpBridge {
    /// POST {endpoint} - One prompt round trip, no retries
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        debug!(endpoint = %self.endpoint, chars = prompt.len(), "Posting prompt");
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { prompt })
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ChatReply>(&body)
                .ok()
                .and_then(|reply| reply.error)
                .unwrap_or(body);
            error!(status, %message, "Gateway request failed");
            return Err(GatewayError::Api { status, message });
        }

        let reply: ChatReply = resp.json().await?;
        match reply.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(GatewayError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn bridge(server: &MockServer) -> HttpBridge {
        let config = StudioConfig::new().with_gateway_url(server.uri());
        HttpBridge::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/.netlify/functions/chat"))
            .and(body_json(serde_json::json!({ "prompt": "hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": "hi there" })))
            .expect(1)
            .mount(&server)
            .await;

        let text = bridge(&server).await.generate("hello").await.unwrap();
        assert_eq!(text, "hi there");
    }

    #[tokio::test]
    async fn test_error_body_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({ "error": "Missing API Key" })))
            .mount(&server)
            .await;

        let err = bridge(&server).await.generate("hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::Api { status: 500, ref message } if message == "Missing API Key"));
    }

    #[tokio::test]
    async fn test_raw_error_body_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(405).set_body_string("Method Not Allowed"))
            .mount(&server)
            .await;

        let err = bridge(&server).await.generate("hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::Api { status: 405, ref message } if message == "Method Not Allowed"));
    }

    #[tokio::test]
    async fn test_missing_text_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = bridge(&server).await.generate("hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::EmptyResponse));
    }
}
