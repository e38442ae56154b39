//! Campaign wizard: stage machine and the data it accumulates.
//!
//! - `model`: stages, product analysis, competitors, strategy
//! - `controller`: WizardController with validated transitions

pub mod controller;
pub mod model;

pub use controller::{StageError, WizardController, RESTART_PROMPT};
pub use model::*;
