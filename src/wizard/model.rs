//! Data models for the campaign wizard.
//!
//! Field names serialize in camelCase so gateway replies parse directly into
//! these structs.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::error::{StudioError, StudioResult};

// =============================================================================
// STAGE & LANGUAGE
// =============================================================================

/// Wizard stage, totally ordered by rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Input = 0,
    Analysis = 1,
    Strategy = 2,
    Generation = 3,
    Editor = 4,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Input,
        Stage::Analysis,
        Stage::Strategy,
        Stage::Generation,
        Stage::Editor,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    /// The following stage, or `None` on the last one.
    pub fn next(self) -> Option<Stage> {
        Self::ALL.get(self.rank() as usize + 1).copied()
    }

    /// The preceding stage, or `None` on the first one.
    pub fn previous(self) -> Option<Stage> {
        (self.rank() as usize)
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Sidebar label in the given interface language.
    pub fn label(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Stage::Input, Language::En) => "Product Scan",
            (Stage::Analysis, Language::En) => "Analysis",
            (Stage::Strategy, Language::En) => "Strategy",
            (Stage::Generation, Language::En) => "Generation",
            (Stage::Editor, Language::En) => "Studio",
            (Stage::Input, Language::Zh) => "产品扫描",
            (Stage::Analysis, Language::Zh) => "分析与情报",
            (Stage::Strategy, Language::Zh) => "策略布局",
            (Stage::Generation, Language::Zh) => "内容生成",
            (Stage::Editor, Language::Zh) => "制片工坊",
        }
    }
}

/// Interface language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    /// Parses `en` / `zh`.
    pub fn parse(code: &str) -> StudioResult<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            other => Err(StudioError::unknown_option("language", other)),
        }
    }

    /// Name of the language generated text is written in.
    pub fn output_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "Chinese",
        }
    }
}

// =============================================================================
// PRODUCT ANALYSIS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellingPoint {
    pub point: String,
    #[serde(default)]
    pub hook: String,
}

impl SellingPoint {
    pub fn new(point: impl Into<String>, hook: impl Into<String>) -> Self {
        Self {
            point: point.into(),
            hook: hook.into(),
        }
    }
}

/// Search-demand question from market research.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketQuestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    pub volume: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NegativeReview {
    pub source: String,
    pub complaint: String,
    pub sentiment: String,
}

/// Structured understanding of the product. Never mutated after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductAnalysis {
    #[serde(rename = "productName", alias = "name")]
    pub name: String,
    pub category: String,
    pub usp: String,
    pub target_audience: String,
    pub selling_points: Vec<SellingPoint>,
    pub pain_points: Vec<String>,
    pub market_questions: Vec<MarketQuestion>,
    pub negative_reviews: Vec<NegativeReview>,
}

impl ProductAnalysis {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: Set category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: Set unique selling proposition.
    pub fn with_usp(mut self, usp: impl Into<String>) -> Self {
        self.usp = usp.into();
        self
    }

    pub fn with_target_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = audience.into();
        self
    }

    pub fn with_selling_point(mut self, point: impl Into<String>, hook: impl Into<String>) -> Self {
        self.selling_points.push(SellingPoint::new(point, hook));
        self
    }

    pub fn with_pain_point(mut self, pain: impl Into<String>) -> Self {
        self.pain_points.push(pain.into());
        self
    }

    /// Placeholder built when the provider answers with prose instead of JSON.
    pub fn placeholder(reply: &str) -> Self {
        let excerpt: String = reply.chars().take(200).collect();
        Self::new("AI Analyzed Product")
            .with_category("E-commerce Item")
            .with_target_audience("General Global Audience")
            .with_selling_point(format!("{excerpt}..."), "")
            .with_pain_point("General pain points solved by this product")
    }
}

// =============================================================================
// COMPETITORS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    TikTok,
    Amazon,
    Shopify,
}

/// Competitor record. Read-only after the analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorData {
    pub id: String,
    pub name: String,
    pub platform: Platform,
    /// Percentage.
    pub conversion_rate: f64,
    pub monthly_sales: u64,
    pub top_video_url: String,
    pub product_url: String,
    pub strategy: String,
}

impl CompetitorData {
    pub fn new(id: impl Into<String>, name: impl Into<String>, platform: Platform) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            platform,
            conversion_rate: 0.0,
            monthly_sales: 0,
            top_video_url: String::new(),
            product_url: String::new(),
            strategy: String::new(),
        }
    }

    pub fn with_conversion_rate(mut self, rate: f64) -> Self {
        self.conversion_rate = rate;
        self
    }

    pub fn with_monthly_sales(mut self, sales: u64) -> Self {
        self.monthly_sales = sales;
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }
}

/// Analysis reply: the product plus its competitor landscape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub product: ProductAnalysis,
    #[serde(default)]
    pub competitors: Vec<CompetitorData>,
}

impl AnalysisResult {
    pub fn new(product: ProductAnalysis) -> Self {
        Self {
            product,
            competitors: Vec::new(),
        }
    }

    pub fn with_competitor(mut self, competitor: CompetitorData) -> Self {
        self.competitors.push(competitor);
        self
    }
}

// =============================================================================
// STRATEGY
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneCategory {
    #[default]
    Indoor,
    Outdoor,
}

impl SceneCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SceneCategory::Indoor => "Indoor",
            SceneCategory::Outdoor => "Outdoor",
        }
    }
}

/// Scene image supplied or generated by the user, selected under `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedScene {
    pub name: String,
    pub image: String,
}

/// Creative parameters chosen on the strategy stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    pub continent: String,
    pub countries: Vec<String>,
    pub language: String,
    pub tone: String,
    pub video_style: String,
    pub scene_category: SceneCategory,
    selected_scenes: Vec<String>,
    pub duration: String,
    pub aspect_ratio: String,
    pub selected_avatars: Vec<String>,
    /// Reference images behind custom avatars.
    pub custom_avatars: Vec<String>,
    /// Every upload is also listed in `selected_scenes`.
    uploaded_scenes: Vec<UploadedScene>,
    #[serde(default)]
    scene_counter: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            continent: "North America".to_string(),
            countries: vec!["United States".to_string()],
            language: "English (US)".to_string(),
            tone: "Professional".to_string(),
            video_style: "TikTok UGC Style (Viral)".to_string(),
            scene_category: SceneCategory::Indoor,
            selected_scenes: Vec::new(),
            duration: "15s".to_string(),
            aspect_ratio: "9:16".to_string(),
            selected_avatars: Vec::new(),
            custom_avatars: Vec::new(),
            uploaded_scenes: Vec::new(),
            scene_counter: 0,
        }
    }
}

impl StrategyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_scenes(&self) -> &[String] {
        &self.selected_scenes
    }

    pub fn uploaded_scenes(&self) -> &[UploadedScene] {
        &self.uploaded_scenes
    }

    /// Switches continent and resets countries to its first market.
    pub fn set_continent(&mut self, continent: &str) -> StudioResult<()> {
        let countries = catalog::countries_for(continent)
            .ok_or_else(|| StudioError::unknown_option("continent", continent))?;
        self.continent = continent.to_string();
        self.countries = countries.iter().take(1).map(|c| c.to_string()).collect();
        Ok(())
    }

    /// Adds or removes a country from the target set.
    pub fn toggle_country(&mut self, country: &str) -> StudioResult<()> {
        if !catalog::is_known_country(country) {
            return Err(StudioError::unknown_option("country", country));
        }
        toggle(&mut self.countries, country);
        Ok(())
    }

    pub fn set_countries<I, S>(&mut self, countries: I) -> StudioResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let countries: Vec<String> = countries.into_iter().map(Into::into).collect();
        if let Some(unknown) = countries.iter().find(|c| !catalog::is_known_country(c)) {
            return Err(StudioError::unknown_option("country", unknown.as_str()));
        }
        self.countries = countries;
        Ok(())
    }

    pub fn set_language(&mut self, language: &str) -> StudioResult<()> {
        check(catalog::LANGUAGES, "language", language)?;
        self.language = language.to_string();
        Ok(())
    }

    pub fn set_video_style(&mut self, style: &str) -> StudioResult<()> {
        check(catalog::VIDEO_STYLES, "video style", style)?;
        self.video_style = style.to_string();
        Ok(())
    }

    pub fn set_duration(&mut self, duration: &str) -> StudioResult<()> {
        check(catalog::DURATIONS, "duration", duration)?;
        self.duration = duration.to_string();
        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, ratio: &str) -> StudioResult<()> {
        check(catalog::ASPECT_RATIOS, "aspect ratio", ratio)?;
        self.aspect_ratio = ratio.to_string();
        Ok(())
    }

    /// Tones come from the analysis stage, so any value is accepted.
    pub fn set_tone(&mut self, tone: impl Into<String>) {
        self.tone = tone.into();
    }

    pub fn set_scene_category(&mut self, category: SceneCategory) {
        self.scene_category = category;
    }

    /// Toggles a scene name; deselecting an uploaded scene drops its image.
    pub fn toggle_scene(&mut self, name: &str) {
        if toggle(&mut self.selected_scenes, name) {
            return;
        }
        self.uploaded_scenes.retain(|scene| scene.name != name);
    }

    pub fn toggle_avatar(&mut self, id: &str) {
        toggle(&mut self.selected_avatars, id);
    }

    /// Selects an avatar if it is not selected yet.
    pub fn select_avatar(&mut self, id: &str) {
        if !self.selected_avatars.iter().any(|a| a == id) {
            self.selected_avatars.push(id.to_string());
        }
    }

    /// Appends an uploaded scene image and selects it. Returns its name.
    pub fn upload_scene(&mut self, image: impl Into<String>) -> String {
        let name = self.next_scene_name("Custom Scene");
        self.uploaded_scenes.push(UploadedScene {
            name: name.clone(),
            image: image.into(),
        });
        self.selected_scenes.push(name.clone());
        name
    }

    /// Prepends a generated scene image and selects it. Returns its name.
    pub fn add_generated_scene(&mut self, image: impl Into<String>) -> String {
        let name = self.next_scene_name("AI Generated Scene");
        self.uploaded_scenes.insert(
            0,
            UploadedScene {
                name: name.clone(),
                image: image.into(),
            },
        );
        self.selected_scenes.push(name.clone());
        name
    }

    /// True if every uploaded scene is selected under its name.
    pub fn uploads_consistent(&self) -> bool {
        self.uploaded_scenes
            .iter()
            .all(|scene| self.selected_scenes.contains(&scene.name))
    }

    /// Clears the multi-select and custom fields, keeping scalar choices.
    pub fn clear_selections(&mut self) {
        self.custom_avatars.clear();
        self.uploaded_scenes.clear();
        self.selected_scenes.clear();
        self.selected_avatars.clear();
    }

    /// Skips names already in use, so a restored config keeps numbering.
    fn next_scene_name(&mut self, prefix: &str) -> String {
        loop {
            self.scene_counter += 1;
            let name = format!("{prefix} {}", self.scene_counter);
            let taken = self.selected_scenes.contains(&name)
                || self.uploaded_scenes.iter().any(|scene| scene.name == name);
            if !taken {
                return name;
            }
        }
    }
}

/// Adds `value` if missing; returns true if it was added.
fn toggle(list: &mut Vec<String>, value: &str) -> bool {
    if let Some(pos) = list.iter().position(|v| v == value) {
        list.remove(pos);
        false
    } else {
        list.push(value.to_string());
        true
    }
}

fn check(options: &[&str], field: &'static str, value: &str) -> StudioResult<()> {
    if options.contains(&value) {
        Ok(())
    } else {
        Err(StudioError::unknown_option(field, value))
    }
}

/// Strategy flattened into the fields request builders need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub market: String,
    pub language: String,
    pub tone: String,
    pub style: String,
    pub scene: String,
    pub duration: String,
    pub aspect_ratio: String,
}

// =============================================================================
// PROGRESS
// =============================================================================

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    pub stage: Stage,
    pub label: String,
    pub active: bool,
    pub completed: bool,
}

// =============================================================================
// TESTS
// =============================================================================
