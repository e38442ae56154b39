//! Campaign generation CLI
//!
//! Runs one wizard session end to end against the AI gateway.
//!
//! Usage:
//!   gce --product "Rechargeable camping lantern" [OPTIONS]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gce_studio::gateway::{BridgeGateway, EnvCredentials, HttpBridge};
use gce_studio::studio::{MediaAsset, SlotStatus};
use gce_studio::{CampaignSession, Language, RenderOutcome, Stage, StudioConfig};

#[derive(Parser)]
#[command(
    name = "gce",
    about = "Generate marketing scripts and videos for a product",
    version
)]
struct Args {
    /// Product description
    #[arg(short = 'p', long)]
    product: String,

    /// Product photo
    #[arg(long)]
    image: Option<PathBuf>,

    /// Footage files (images or clips)
    #[arg(short = 'f', long)]
    footage: Vec<PathBuf>,

    /// Interface language (en or zh)
    #[arg(long, default_value = "en")]
    lang: String,

    /// Target countries, comma separated
    #[arg(long, value_delimiter = ',')]
    countries: Vec<String>,

    /// Tone of voice
    #[arg(long)]
    tone: Option<String>,

    /// Number of scripts to take into the studio
    #[arg(short = 's', long, default_value_t = 2)]
    select: usize,

    /// Generate avatar profiles and cast the first one
    #[arg(long)]
    avatars: bool,

    /// Render every production slot
    #[arg(long)]
    render: bool,

    /// Gateway base URL
    #[arg(long, env = "GCE_GATEWAY_URL")]
    gateway_url: Option<String>,

    /// Write the final session snapshot as JSON
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints the stage error and exits if one is pending.
fn exit_on_stage_error(session: &CampaignSession, pb: &ProgressBar) {
    if let Some(err) = session.wizard().error() {
        pb.abandon_with_message(format!("FAIL: {}", err.message));
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let mut config = StudioConfig::from_env()?;
    if let Some(url) = &args.gateway_url {
        config = config.with_gateway_url(url);
    }
    config.validate()?;
    let language = Language::parse(&args.lang)?;

    let bridge = HttpBridge::from_config(&config)?;
    let credentials = EnvCredentials::new(config.credential_env.clone());
    println!("Gateway: {}", bridge.endpoint());
    let gateway = Arc::new(BridgeGateway::new(bridge, credentials));
    let mut session = CampaignSession::new(config, gateway).with_language(language);

    // Product scan
    let image = args.image.as_ref().map(MediaAsset::from_path).transpose()?;
    let pb = spinner(session.stage().label(language));
    session.analyze_product(&args.product, image).await?;
    exit_on_stage_error(&session, &pb);
    let product = session
        .wizard()
        .product()
        .map(|p| p.name.clone())
        .unwrap_or_default();
    pb.finish_with_message(format!("Analyzed: {product}"));

    // Analysis & strategy
    session.confirm_analysis()?;
    if !args.countries.is_empty() {
        session.edit_strategy(|cfg| cfg.set_countries(args.countries.iter().map(|c| c.trim())))??;
    }
    if let Some(tone) = &args.tone {
        session.edit_strategy(|cfg| cfg.set_tone(tone.as_str()))?;
    }
    if args.avatars {
        let pb = spinner("Casting avatars");
        let ids = session.generate_avatar_profiles().await?;
        exit_on_stage_error(&session, &pb);
        if let Some(first) = ids.first() {
            session.edit_strategy(|cfg| cfg.select_avatar(first))?;
        }
        pb.finish_with_message(format!("{} avatars", ids.len()));
    }
    session.confirm_strategy()?;

    // Generation
    for path in &args.footage {
        session.add_footage(MediaAsset::from_path(path)?);
    }
    let pb = spinner(Stage::Generation.label(language));
    session.generate_scripts().await?;
    exit_on_stage_error(&session, &pb);
    let ids: Vec<String> = session
        .studio()
        .scripts
        .scripts()
        .iter()
        .map(|s| s.id.clone())
        .collect();
    pb.finish_with_message(format!("{} scripts", ids.len()));
    for id in ids.iter().take(args.select.max(1)) {
        session.toggle_script(id)?;
    }
    session.proceed_to_studio()?;

    // Studio
    if args.render {
        let ids: Vec<usize> = (0..session.studio().slots.slots().len()).collect();
        let pb = spinner(&format!("Rendering {} slots", ids.len()));
        let outcomes = session.render_slots(&ids, None).await?;
        if outcomes
            .iter()
            .any(|(_, outcome)| *outcome == RenderOutcome::CredentialMissing)
        {
            pb.abandon_with_message("Video credential missing");
        } else {
            pb.finish_and_clear();
        }
    }

    // Summary
    let snapshot = session.snapshot();
    println!("\n=== {} ===", Stage::Editor.label(language));
    for script in session.studio().scripts.selected_scripts() {
        println!("  {} [{}] {}", script.version_name, script.duration, script.title);
    }
    for slot in &snapshot.slots {
        let state = match &slot.status {
            SlotStatus::Idle => "idle".to_string(),
            SlotStatus::Generating => "generating".to_string(),
            SlotStatus::Done => format!("done (V{})", slot.history.len()),
            SlotStatus::Error(msg) => format!("error: {msg}"),
        };
        println!(
            "  Slot {} -> {} : {} {}",
            slot.id + 1,
            slot.script_id,
            state,
            slot.current_url.as_deref().unwrap_or("")
        );
    }

    if let Some(path) = &args.output {
        std::fs::write(path, session.snapshot_json()?)?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}
