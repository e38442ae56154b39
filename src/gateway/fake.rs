//! Scripted in-memory gateway for orchestrator and session tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::gateway::{
    AnalysisRequest, CustomAvatarRequest, Gateway, GatewayError, ScriptRequest, SpeechRequest,
    VideoRequest,
};
use crate::studio::model::{AssetType, Avatar, MarketingScript, ScriptScene};
use crate::wizard::model::{
    AnalysisResult, CompetitorData, Platform, ProductAnalysis, StrategySummary,
};

type Reply<T> = Result<T, GatewayError>;

/// Each capability pops a scripted reply or falls back to a deterministic
/// success. Calls are counted per capability.
#[derive(Default)]
pub(crate) struct FakeGateway {
    analysis: Mutex<VecDeque<Reply<AnalysisResult>>>,
    scripts: Mutex<VecDeque<Reply<Vec<MarketingScript>>>>,
    profiles: Mutex<VecDeque<Reply<Vec<Avatar>>>>,
    avatar_images: Mutex<VecDeque<Reply<String>>>,
    custom_avatars: Mutex<VecDeque<Reply<Avatar>>>,
    scene_images: Mutex<VecDeque<Reply<String>>>,
    speech: Mutex<VecDeque<Reply<String>>>,
    /// Video replies with the number of scheduler yields before they resolve.
    videos: Mutex<VecDeque<(usize, Reply<String>)>>,
    /// Successive `has_credential` answers; the last one sticks. Empty means true.
    credentials: Mutex<VecDeque<bool>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    script_requests: Mutex<Vec<ScriptRequest>>,
    video_requests: Mutex<Vec<VideoRequest>>,
    /// Call numbers of video renders, in completion order.
    finished_videos: Mutex<Vec<usize>>,
    image_prompts: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analysis(self, reply: Reply<AnalysisResult>) -> Self {
        push(&self.analysis, reply);
        self
    }

    pub fn with_scripts(self, reply: Reply<Vec<MarketingScript>>) -> Self {
        push(&self.scripts, reply);
        self
    }

    pub fn with_profiles(self, reply: Reply<Vec<Avatar>>) -> Self {
        push(&self.profiles, reply);
        self
    }

    pub fn with_avatar_image(self, reply: Reply<String>) -> Self {
        push(&self.avatar_images, reply);
        self
    }

    pub fn with_custom_avatar(self, reply: Reply<Avatar>) -> Self {
        push(&self.custom_avatars, reply);
        self
    }

    pub fn with_scene_image(self, reply: Reply<String>) -> Self {
        push(&self.scene_images, reply);
        self
    }

    pub fn with_speech(self, reply: Reply<String>) -> Self {
        push(&self.speech, reply);
        self
    }

    pub fn with_video(self, reply: Reply<String>) -> Self {
        self.with_video_after(0, reply)
    }

    /// Queues a video reply that resolves only after `yields` scheduler turns.
    pub fn with_video_after(self, yields: usize, reply: Reply<String>) -> Self {
        push(&self.videos, (yields, reply));
        self
    }

    pub fn with_credentials(self, answers: &[bool]) -> Self {
        self.credentials.lock().unwrap().extend(answers.iter().copied());
        self
    }

    pub fn calls(&self, capability: &str) -> usize {
        self.calls.lock().unwrap().get(capability).copied().unwrap_or(0)
    }

    pub fn script_requests(&self) -> Vec<ScriptRequest> {
        self.script_requests.lock().unwrap().clone()
    }

    pub fn video_requests(&self) -> Vec<VideoRequest> {
        self.video_requests.lock().unwrap().clone()
    }

    pub fn finished_videos(&self) -> Vec<usize> {
        self.finished_videos.lock().unwrap().clone()
    }

    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts.lock().unwrap().clone()
    }

    fn count(&self, capability: &'static str) -> usize {
        let mut calls = self.calls.lock().unwrap();
        let n = calls.entry(capability).or_insert(0);
        *n += 1;
        *n
    }
}

fn push<T>(queue: &Mutex<VecDeque<T>>, reply: T) {
    queue.lock().unwrap().push_back(reply);
}

fn pop<T>(queue: &Mutex<VecDeque<Reply<T>>>, fallback: impl FnOnce() -> T) -> Reply<T> {
    queue.lock().unwrap().pop_front().unwrap_or_else(|| Ok(fallback()))
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn analyze_product(&self, _request: &AnalysisRequest) -> Reply<AnalysisResult> {
        self.count("analyze_product");
        pop(&self.analysis, sample_analysis)
    }

    async fn generate_scripts(&self, request: &ScriptRequest) -> Reply<Vec<MarketingScript>> {
        let n = self.count("generate_scripts");
        self.script_requests.lock().unwrap().push(request.clone());
        pop(&self.scripts, || {
            (1..=3)
                .map(|i| sample_script(&format!("script-{n}-{i}")))
                .collect()
        })
    }

    async fn generate_avatar_profiles(&self, count: usize) -> Reply<Vec<Avatar>> {
        let n = self.count("generate_avatar_profiles");
        pop(&self.profiles, || {
            (1..=count)
                .map(|i| Avatar::new(format!("avatar-{n}-{i}"), format!("Presenter {i}")).with_desc(format!("desc {n}-{i}")))
                .collect()
        })
    }

    async fn generate_avatar_image(&self, description: &str) -> Reply<String> {
        self.count("generate_avatar_image");
        self.image_prompts.lock().unwrap().push(description.to_string());
        pop(&self.avatar_images, || format!("https://img.test/{}.png", description.replace(' ', "-")))
    }

    async fn analyze_custom_avatar(&self, request: &CustomAvatarRequest) -> Reply<Avatar> {
        let n = self.count("analyze_custom_avatar");
        let desc = request.text.clone().unwrap_or_else(|| "reference look".to_string());
        pop(&self.custom_avatars, || {
            Avatar::new(format!("custom-{n}"), "Custom Presenter").with_desc(desc)
        })
    }

    async fn generate_scene_image(&self, _prompt: &str) -> Reply<String> {
        let n = self.count("generate_scene_image");
        pop(&self.scene_images, || format!("https://img.test/scene-{n}.png"))
    }

    async fn generate_speech(&self, _request: &SpeechRequest) -> Reply<String> {
        let n = self.count("generate_speech");
        pop(&self.speech, || format!("blob:audio-{n}"))
    }

    async fn generate_video(&self, request: &VideoRequest) -> Reply<String> {
        let n = self.count("generate_video");
        self.video_requests.lock().unwrap().push(request.clone());
        let (yields, reply) = self
            .videos
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| (0, Ok(format!("https://video.test/{n}.mp4"))));
        for _ in 0..yields {
            tokio::task::yield_now().await;
        }
        self.finished_videos.lock().unwrap().push(n);
        reply
    }

    async fn has_credential(&self) -> bool {
        self.count("has_credential");
        let mut answers = self.credentials.lock().unwrap();
        if answers.len() > 1 {
            answers.pop_front().unwrap_or(true)
        } else {
            answers.front().copied().unwrap_or(true)
        }
    }

    async fn request_credential(&self) {
        self.count("request_credential");
    }
}

// =============================================================================
// SAMPLES
// =============================================================================

pub(crate) fn sample_analysis() -> AnalysisResult {
    AnalysisResult::new(
        ProductAnalysis::new("Trail Lamp")
            .with_category("Outdoor > Lighting > Lanterns")
            .with_usp("40 hours on one charge")
            .with_target_audience("Weekend campers")
            .with_selling_point("Bright", "Light up the whole camp")
            .with_selling_point("Rechargeable", "Never buy batteries again")
            .with_pain_point("Dead batteries"),
    )
    .with_competitor(
        CompetitorData::new("c1", "LumaCamp", Platform::Amazon)
            .with_conversion_rate(3.2)
            .with_monthly_sales(12_000)
            .with_strategy("Bundle deals"),
    )
}

pub(crate) fn sample_script(id: &str) -> MarketingScript {
    MarketingScript::new(id, format!("Version {id}"))
        .with_style("TikTok UGC Style (Viral)")
        .with_duration("15s")
        .with_copy("Stop fumbling in the dark.")
        .with_scene(ScriptScene::new("0-3s", "Tent at dusk", AssetType::LocalFootage))
        .with_scene(ScriptScene::new("3-8s", "Lamp clicks on", AssetType::ProductImage))
}

pub(crate) fn sample_script_request() -> ScriptRequest {
    let analysis = sample_analysis();
    ScriptRequest {
        product: analysis.product,
        competitors: analysis.competitors,
        strategy: StrategySummary {
            market: "United States".to_string(),
            language: "English (US)".to_string(),
            tone: "Professional".to_string(),
            style: "TikTok UGC Style (Viral)".to_string(),
            scene: "Indoor".to_string(),
            duration: "15s".to_string(),
            aspect_ratio: "9:16".to_string(),
        },
        hooks: vec!["Bright".to_string()],
        footage: Vec::new(),
        custom_prompt: None,
    }
}
