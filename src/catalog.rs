//! Static option tables offered by the strategy and generation stages.

use crate::wizard::model::SceneCategory;

/// Target markets grouped by continent.
pub const MARKETS: &[(&str, &[&str])] = &[
    ("North America", &["United States", "Canada", "Mexico"]),
    (
        "Europe",
        &[
            "United Kingdom",
            "Germany",
            "France",
            "Spain",
            "Italy",
            "Netherlands",
            "Sweden",
            "Poland",
            "Switzerland",
        ],
    ),
    (
        "Asia Pacific",
        &[
            "Japan",
            "South Korea",
            "Australia",
            "Singapore",
            "India",
            "Thailand",
            "Vietnam",
            "Indonesia",
            "Malaysia",
        ],
    ),
    (
        "Middle East & Africa",
        &["UAE", "Saudi Arabia", "Turkey", "Israel", "Egypt", "South Africa"],
    ),
    (
        "Latin America",
        &["Brazil", "Argentina", "Chile", "Colombia", "Peru"],
    ),
];

pub const LANGUAGES: &[&str] = &[
    "English (US)",
    "English (UK)",
    "Spanish (Spain)",
    "Spanish (LatAm)",
    "French",
    "German",
    "Japanese",
    "Chinese (Mandarin)",
    "Arabic",
    "Portuguese (Brazil)",
    "Italian",
    "Korean",
    "Dutch",
    "Turkish",
    "Hindi",
    "Russian",
    "Thai",
    "Vietnamese",
    "Indonesian",
    "Polish",
];

pub const VIDEO_STYLES: &[&str] = &[
    "TikTok UGC Style (Viral)",
    "High-End Brand Commercial",
    "Problem/Solution Split Screen",
    "ASMR Unboxing",
    "Founder Story",
    "3D Product Showcase",
    "Fast-Paced Street Interview",
    "Lifestyle Vlog Aesthetic",
    "Cinematic Macro Shots",
    "Testimonial Montage",
];

/// Preset scene offered in the scene picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub img: &'static str,
}

const fn preset(id: &'static str, name: &'static str, img: &'static str) -> ScenePreset {
    ScenePreset { id, name, img }
}

pub const INDOOR_SCENES: &[ScenePreset] = &[
    preset("k1", "Modern White Kitchen", "https://images.unsplash.com/photo-1556911220-bff31c812dba?w=400&q=80"),
    preset("k2", "Rustic Farmhouse Kitchen", "https://images.unsplash.com/photo-1556909212-d5b604d4390c?w=400&q=80"),
    preset("k3", "Industrial Loft Kitchen", "https://images.unsplash.com/photo-1542013936693-884638332954?w=400&q=80"),
    preset("k4", "Minimalist Japandi Kitchen", "https://images.unsplash.com/photo-1593696140826-c58b5418a800?w=400&q=80"),
    preset("k6", "Cozy Tiny Home Kitchen", "https://images.unsplash.com/photo-1588854337440-27a3c3104f4a?w=400&q=80"),
    preset("lr1", "Sunny Living Room", "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=400&q=80"),
    preset("gym1", "Home Gym", "https://images.unsplash.com/photo-1534438327276-14e5300c3a48?w=400&q=80"),
];

pub const OUTDOOR_SCENES: &[ScenePreset] = &[
    preset("c1", "Forest Campsite", "https://images.unsplash.com/photo-1523987355523-c7b5b0dd90a7?w=400&q=80"),
    preset("c2", "Lakeside Glamping", "https://images.unsplash.com/photo-1478131143081-80f7f84ca84d?w=400&q=80"),
    preset("c3", "Mountain Peak Tent", "https://images.unsplash.com/photo-1464822759023-fed622ff2c3b?w=400&q=80"),
    preset("c4", "Desert Bonfire", "https://images.unsplash.com/photo-1465056836041-7f43ac27dcb5?w=400&q=80"),
    preset("c5", "RV Park Sunset", "https://images.unsplash.com/photo-1526491109672-747406520280?w=400&q=80"),
    preset("c7", "Beach Picnic", "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?w=400&q=80"),
    preset("c10", "National Park Vista", "https://images.unsplash.com/photo-1496070242169-953f95071977?w=400&q=80"),
    preset("st1", "Urban Street", "https://images.unsplash.com/photo-1477959858617-67f85cf4f1df?w=400&q=80"),
];

pub const DURATIONS: &[&str] = &["10s", "15s", "20s", "30s", "60s"];

pub const ASPECT_RATIOS: &[&str] = &["9:16", "16:9", "3:4", "4:3", "1:1"];

/// Voice option; several ids map onto the same base voice with a usage hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceOption {
    pub id: &'static str,
    pub base: &'static str,
    pub label: &'static str,
}

const fn voice(id: &'static str, base: &'static str, label: &'static str) -> VoiceOption {
    VoiceOption { id, base, label }
}

pub const VOICE_OPTIONS: &[VoiceOption] = &[
    voice("Puck", "Puck", "Male - Gen Z/Hype (TikTok Native)"),
    voice("Charon", "Charon", "Male - Deep Narrative (Movie Trailer)"),
    voice("Kore", "Kore", "Female - Soothing (Wellness/Beauty)"),
    voice("Fenrir", "Fenrir", "Male - Authoritative (Tech Review)"),
    voice("Zephyr", "Zephyr", "Female - Clear/News (Educational)"),
    voice("Puck-HighEnergy", "Puck", "Male - High Energy Sales"),
    voice("Kore-ASMR", "Kore", "Female - Soft ASMR"),
    voice("Zephyr-Fast", "Zephyr", "Female - Fast Explainer"),
    voice("Charon-Gravel", "Charon", "Male - Gritty Storyteller"),
    voice("Fenrir-Coach", "Fenrir", "Male - Motivational Coach"),
    voice("Kore-Sales", "Kore", "Female - Enthusiastic Sales"),
    voice("Puck-Urgent", "Puck", "Male - Urgent Deal Alert"),
    voice("Zephyr-Professional", "Zephyr", "Female - Corporate Professional"),
    voice("Charon-Dramatic", "Charon", "Male - Dramatic Intro"),
    voice("Fenrir-Bold", "Fenrir", "Male - Bold Statement"),
];

pub const AUDIO_STYLES: &[&str] = &[
    "Excited (Viral)",
    "Professional (Trust)",
    "Storytelling (Emotional)",
    "ASMR (Whisper)",
    "News Anchor (Fact-based)",
    "Sarcastic (Humorous)",
    "Urgent (Limited Time)",
    "Casual (Bestie/Vlog)",
    "Luxurious (Elegant)",
    "Motivational (Inspiring)",
    "Suspenseful (Mystery)",
    "Empathetic (Problem Solving)",
    "Controversial (Opinion)",
    "Educational (How-to)",
    "Minimalist (Luxury)",
    "Hype (High Energy)",
    "Chill (Relaxed)",
    "Dramatic (Movie Trailer)",
    "Serious (Warning)",
    "Friendly (Customer Support)",
];

pub const PACING_OPTIONS: &[&str] = &[
    "Normal",
    "Fast (Urgent)",
    "Slow (Dramatic)",
    "Ultra Fast (Disclaimers/Gen Z)",
    "Variable (Natural Pause)",
    "Slow Build (Crescendo)",
    "Staccato (Punchy)",
    "Flowing (Meditative)",
    "Rapid Fire (TikTok Trend)",
    "Deliberate (Educational)",
];

/// Tone options offered after every successful analysis.
pub const SEED_TONES: &[&str] = &["Professional", "Viral", "Humorous", "Luxury", "Storytelling"];

/// Countries of a continent, or `None` for an unknown continent.
pub fn countries_for(continent: &str) -> Option<&'static [&'static str]> {
    MARKETS
        .iter()
        .find(|(name, _)| *name == continent)
        .map(|(_, countries)| *countries)
}

/// True if `country` belongs to any known market.
pub fn is_known_country(country: &str) -> bool {
    MARKETS
        .iter()
        .any(|(_, countries)| countries.contains(&country))
}

pub fn scenes_for(category: SceneCategory) -> &'static [ScenePreset] {
    match category {
        SceneCategory::Indoor => INDOOR_SCENES,
        SceneCategory::Outdoor => OUTDOOR_SCENES,
    }
}

pub fn voice_option(id: &str) -> Option<&'static VoiceOption> {
    VOICE_OPTIONS.iter().find(|v| v.id == id)
}
