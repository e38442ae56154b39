//! `Gateway` implementation on top of a single prompt bridge.
//!
//! Every capability is one prompt round trip. Structured replies are JSON,
//! possibly wrapped in markdown fences; media replies carry a URL.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::gateway::client::PromptBridge;
use crate::gateway::credentials::CredentialStore;
use crate::gateway::{
    AnalysisRequest, CustomAvatarRequest, Gateway, GatewayError, ScriptRequest, SpeechRequest,
    VideoRequest,
};
use crate::studio::model::{Avatar, MarketingScript};
use crate::wizard::model::{AnalysisResult, ProductAnalysis};

/// Routes every gateway capability through one `PromptBridge`.
pub struct BridgeGateway<B, C> {
    bridge: B,
    credentials: C,
}

impl<B: PromptBridge, C: CredentialStore> BridgeGateway<B, C> {
    pub fn new(bridge: B, credentials: C) -> Self {
        Self {
            bridge,
            credentials,
        }
    }

    async fn structured<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, GatewayError> {
        let reply = self.bridge.generate(prompt).await?;
        parse_json(&reply)
    }

    async fn media(&self, prompt: &str) -> Result<String, GatewayError> {
        let reply = self.bridge.generate(prompt).await?;
        extract_media_url(&reply)
    }
}

#[async_trait]
impl<B: PromptBridge, C: CredentialStore> Gateway for BridgeGateway<B, C> {
    async fn analyze_product(&self, request: &AnalysisRequest) -> Result<AnalysisResult, GatewayError> {
        let reply = self.bridge.generate(&analysis_prompt(request)).await?;
        match parse_json::<AnalysisResult>(&reply) {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(error = %err, "Analysis reply is not JSON, using placeholder");
                Ok(AnalysisResult::new(ProductAnalysis::placeholder(&reply)))
            }
        }
    }

    async fn generate_scripts(&self, request: &ScriptRequest) -> Result<Vec<MarketingScript>, GatewayError> {
        let prompt = script_prompt(request)?;
        let mut scripts: Vec<MarketingScript> = self.structured(&prompt).await?;
        for script in &mut scripts {
            script.id = Uuid::new_v4().to_string();
        }
        info!(count = scripts.len(), "Scripts parsed");
        Ok(scripts)
    }

    async fn generate_avatar_profiles(&self, count: usize) -> Result<Vec<Avatar>, GatewayError> {
        let prompt = format!(
            "Create {count} diverse digital human presenter profiles for short-form product videos. \
             Return a JSON array of objects with fields name, desc (full visual description) and \
             traits {{ethnicity, age, gender, vibe}}."
        );
        let mut avatars: Vec<Avatar> = self.structured(&prompt).await?;
        for avatar in &mut avatars {
            avatar.id = Uuid::new_v4().to_string();
            avatar.img = None;
            avatar.is_custom = false;
        }
        Ok(avatars)
    }

    async fn generate_avatar_image(&self, description: &str) -> Result<String, GatewayError> {
        self.media(&format!(
            "Render a photorealistic portrait of this presenter and return the image URL as \
             {{\"url\": ...}}: {description}"
        ))
        .await
    }

    async fn analyze_custom_avatar(&self, request: &CustomAvatarRequest) -> Result<Avatar, GatewayError> {
        let mut prompt = String::from(
            "Design one digital human presenter. Return a JSON object with fields name, desc and \
             traits {ethnicity, age, gender, vibe}.",
        );
        if let Some(text) = &request.text {
            prompt.push_str(&format!("\nUser description: {text}"));
        }
        if let Some(image) = &request.image {
            prompt.push_str(&format!("\nReference image: {image}"));
        }
        let mut avatar: Avatar = self.structured(&prompt).await?;
        avatar.id = Uuid::new_v4().to_string();
        avatar.img = None;
        avatar.is_custom = true;
        Ok(avatar)
    }

    async fn generate_scene_image(&self, prompt: &str) -> Result<String, GatewayError> {
        self.media(&format!(
            "Render a background scene for a product video and return the image URL as \
             {{\"url\": ...}}: {prompt}"
        ))
        .await
    }

    async fn generate_speech(&self, request: &SpeechRequest) -> Result<String, GatewayError> {
        let settings = &request.settings;
        self.media(&format!(
            "Synthesize speech with voice {}, style {}, pacing {}. Return the audio URL as \
             {{\"url\": ...}}.\n{}",
            settings.voice_id, settings.style, settings.speed, request.text
        ))
        .await
    }

    async fn generate_video(&self, request: &VideoRequest) -> Result<String, GatewayError> {
        if !self.credentials.has_credential().await {
            return Err(GatewayError::CredentialUnavailable);
        }
        let body = serde_json::to_string(request).map_err(|e| GatewayError::parse(e.to_string()))?;
        self.media(&format!(
            "Render a marketing video from this request and return the video URL as {{\"url\": ...}}: {body}"
        ))
        .await
    }

    async fn has_credential(&self) -> bool {
        self.credentials.has_credential().await
    }

    async fn request_credential(&self) {
        self.credentials.request().await
    }
}

// =============================================================================
// PROMPTS
// =============================================================================

fn analysis_prompt(request: &AnalysisRequest) -> String {
    let mut prompt = format!(
        "Analyze this product: {}.\nReturn the output in {}.\n\
         Respond with JSON {{\"product\": {{productName, category, usp, targetAudience, \
         sellingPoints [{{point, hook}}], painPoints, marketQuestions [{{type, question, volume}}], \
         negativeReviews [{{source, complaint, sentiment}}]}}, \"competitors\": [{{id, name, \
         platform (TikTok|Amazon|Shopify), conversionRate, monthlySales, topVideoUrl, productUrl, \
         strategy}}]}}.",
        request.input,
        request.language.output_name()
    );
    if let Some(image) = &request.image {
        prompt.push_str(&format!("\nProduct image: {image}"));
    }
    prompt
}

fn script_prompt(request: &ScriptRequest) -> Result<String, GatewayError> {
    let context = serde_json::to_string(request).map_err(|e| GatewayError::parse(e.to_string()))?;
    Ok(format!(
        "Write marketing video scripts for this campaign in {}. Return a JSON array of objects \
         with fields versionName, style, platform, duration, copy, title, hashtags, \
         subtitleStrategy {{font, color, size, animation, explosiveMoments}}, audioSettings \
         {{voiceId, style, speed}}, scenes [{{time, visual, audio, assetType \
         (AI_Avatar|Local_Footage|Product_Image)}}], cta.\nCampaign: {context}",
        request.strategy.language
    ))
}

// =============================================================================
// REPLY PARSING
// =============================================================================

/// Strips a surrounding markdown code fence, if present.
pub fn strip_code_fence(text: &str) -> &str {
    let cleaned = text.trim();
    if !cleaned.starts_with("```") {
        return cleaned;
    }
    let start = cleaned.find('\n').map(|i| i + 1).unwrap_or(cleaned.len());
    let end = cleaned[start..]
        .rfind("```")
        .map(|i| i + start)
        .unwrap_or(cleaned.len());
    cleaned[start..end].trim().trim_end_matches('`').trim()
}

pub fn parse_json<T: DeserializeOwned>(reply: &str) -> Result<T, GatewayError> {
    let json = strip_code_fence(reply);
    serde_json::from_str(json).map_err(|e| {
        let snippet: String = json.chars().take(200).collect();
        GatewayError::parse(format!("{e}: {snippet}"))
    })
}

#[derive(Deserialize)]
struct MediaReply {
    url: String,
}

/// Reads a media URL from `{"url": ...}` or a bare URL reply.
pub fn extract_media_url(reply: &str) -> Result<String, GatewayError> {
    let body = strip_code_fence(reply);
    if let Ok(MediaReply { url }) = serde_json::from_str(body) {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    let bare = body.trim_matches('"');
    if ["http://", "https://", "data:", "blob:"]
        .iter()
        .any(|scheme| bare.starts_with(scheme))
    {
        return Ok(bare.to_string());
    }
    if body.is_empty() {
        Err(GatewayError::EmptyResponse)
    } else {
        Err(GatewayError::parse("reply carries no media URL"))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::studio::model::ScriptSource;
    use crate::wizard::model::Language;

    struct ScriptedBridge {
        replies: Mutex<VecDeque<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBridge {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PromptBridge for ScriptedBridge {
        async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(GatewayError::EmptyResponse)
        }
    }

    struct Present(bool);

    #[async_trait]
    impl CredentialStore for Present {
        async fn has_credential(&self) -> bool {
            self.0
        }

        async fn request(&self) {}
    }

    fn gateway(replies: &[&str]) -> BridgeGateway<ScriptedBridge, Present> {
        BridgeGateway::new(ScriptedBridge::new(replies), Present(true))
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("````\n{}\n````"), "{}");
    }

    #[test]
    fn test_extract_media_url() {
        assert_eq!(
            extract_media_url("{\"url\": \"https://cdn.test/a.png\"}").unwrap(),
            "https://cdn.test/a.png"
        );
        assert_eq!(
            extract_media_url("  https://cdn.test/b.mp4 ").unwrap(),
            "https://cdn.test/b.mp4"
        );
        assert!(matches!(
            extract_media_url("sorry, I cannot do that"),
            Err(GatewayError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_analysis_falls_back_to_placeholder() {
        let gw = gateway(&["This lamp is great for camping."]);
        let request = AnalysisRequest {
            input: "lamp".to_string(),
            image: None,
            language: Language::Zh,
        };
        let result = gw.analyze_product(&request).await.unwrap();

        assert_eq!(result.product.name, "AI Analyzed Product");
        assert!(result.competitors.is_empty());
        let prompts = gw.bridge.prompts.lock().unwrap();
        assert!(prompts[0].contains("Return the output in Chinese"));
    }

    #[tokio::test]
    async fn test_scripts_get_fresh_ids() {
        let reply = r#"```json
        [{"versionName": "Hook A", "copy": "Buy now", "scenes": [{"time": "0-3s", "visual": "Lamp glows", "audio": "whoosh", "assetType": "AI_Avatar"}]},
         {"versionName": "Hook B", "copy": "Glow up"}]
        ```"#;
        let gw = gateway(&[reply]);
        let request = crate::gateway::fake::sample_script_request();
        let scripts = gw.generate_scripts(&request).await.unwrap();

        assert_eq!(scripts.len(), 2);
        assert_ne!(scripts[0].id, scripts[1].id);
        assert!(!scripts[0].id.is_empty());
        assert_eq!(scripts[0].source, ScriptSource::AiGenerated);
        assert_eq!(scripts[0].scenes[0].visual, "Lamp glows");
    }

    #[tokio::test]
    async fn test_avatar_profiles_have_no_images() {
        let reply = r#"[{"name": "Mia", "desc": "Smiling hiker", "img": "x", "traits": {"ethnicity": "Latina", "age": "25", "gender": "female", "vibe": "sporty"}}]"#;
        let gw = gateway(&[reply]);
        let avatars = gw.generate_avatar_profiles(1).await.unwrap();

        assert_eq!(avatars[0].name, "Mia");
        assert!(avatars[0].img.is_none());
        assert!(!avatars[0].is_custom);
    }

    #[tokio::test]
    async fn test_video_requires_credential() {
        let gw = BridgeGateway::new(ScriptedBridge::new(&["https://v.test/1.mp4"]), Present(false));
        let request = VideoRequest {
            prompt: "Lamp glows. Style: UGC.".to_string(),
            reference_image: None,
            narration: "Buy now".to_string(),
            duration: "15s".to_string(),
            aspect_ratio: "9:16".to_string(),
            footage_count: 0,
            clean_feed: true,
            instruction: None,
            avatar_hint: None,
            language: "English (US)".to_string(),
        };
        assert!(matches!(
            gw.generate_video(&request).await,
            Err(GatewayError::CredentialUnavailable)
        ));
        assert!(gw.bridge.prompts.lock().unwrap().is_empty());
    }
}
