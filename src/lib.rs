//! GCE Studio - wizard state machine and generation orchestrator for
//! AI-driven marketing video campaigns.
//!
//! A campaign runs through five stages:
//!
//! - **Product Scan**: free-text product input, optional photo
//! - **Analysis**: product breakdown, competitors, user hooks
//! - **Strategy**: markets, tone, style, scenes, avatars
//! - **Generation**: script batches, selection, voice-overs
//! - **Studio**: five production slots rendering versioned videos
//!
//! All AI work goes through the [`Gateway`] trait. [`CampaignSession`] owns
//! the whole state and is the only mutation surface.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gce_studio::{BridgeGateway, CampaignSession, EnvCredentials, HttpBridge, StudioConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StudioConfig::from_env()?;
//! let bridge = HttpBridge::from_config(&config)?;
//! let gateway = BridgeGateway::new(bridge, EnvCredentials::new(&config.credential_env));
//! let mut session = CampaignSession::new(config, Arc::new(gateway));
//!
//! session.analyze_product("Rechargeable camping lantern, 40h battery", None).await?;
//! session.confirm_analysis()?;
//! session.confirm_strategy()?;
//! session.generate_scripts().await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
pub mod studio;
pub mod task;
pub mod wizard;

// Re-exports for convenience
pub use config::StudioConfig;
pub use error::{StudioError, StudioResult};
pub use gateway::{BridgeGateway, EnvCredentials, Gateway, GatewayError, HttpBridge};
pub use session::{CampaignSession, RenderOutcome, SessionSnapshot};
pub use studio::Studio;
pub use task::{MergeOutcome, TaskState, Ticket};
pub use wizard::{Language, Stage, WizardController};
