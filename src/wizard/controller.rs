//! WizardController: the five-stage state machine.
//!
//! The controller owns everything the wizard accumulates before generation
//! starts: the product analysis, competitors, tone options, hooks, the
//! strategy and the stage-scoped error. Every transition is validated here;
//! generated assets live in [`crate::studio::Studio`].

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::SEED_TONES;
use crate::error::{StudioError, StudioResult};
use crate::gateway::{AnalysisRequest, GatewayError};
use crate::task::{MergeOutcome, RequestSeq, TaskState, Ticket};
use crate::wizard::model::*;

pub const RESTART_PROMPT: &str = "Restart? All data will be lost.";

/// Dismissable error shown on the stage that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageError {
    pub stage: Stage,
    pub message: String,
}

// =============================================================================
// WIZARD CONTROLLER
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct WizardController {
    stage: Stage,
    language: Language,
    analysis: TaskState<()>,
    analysis_seq: RequestSeq,
    product: Option<ProductAnalysis>,
    competitors: Vec<CompetitorData>,
    tone_options: Vec<String>,
    custom_hooks: Vec<String>,
    confirmed_hooks: Vec<String>,
    strategy: StrategyConfig,
    error: Option<StageError>,
}

impl WizardController {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set interface language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn analysis_state(&self) -> &TaskState<()> {
        &self.analysis
    }

    pub fn product(&self) -> Option<&ProductAnalysis> {
        self.product.as_ref()
    }

    pub fn competitors(&self) -> &[CompetitorData] {
        &self.competitors
    }

    pub fn tone_options(&self) -> &[String] {
        &self.tone_options
    }

    pub fn custom_hooks(&self) -> &[String] {
        &self.custom_hooks
    }

    /// Hooks fixed when the analysis was confirmed.
    pub fn confirmed_hooks(&self) -> &[String] {
        &self.confirmed_hooks
    }

    pub fn strategy(&self) -> &StrategyConfig {
        &self.strategy
    }

    pub fn error(&self) -> Option<&StageError> {
        self.error.as_ref()
    }

    /// True if `step` lies strictly behind the current stage.
    pub fn is_completed(&self, step: Stage) -> bool {
        self.stage.rank() > step.rank()
    }

    /// Sidebar view of all stages.
    pub fn progress(&self) -> Vec<StageProgress> {
        Stage::ALL
            .iter()
            .map(|&stage| StageProgress {
                stage,
                label: stage.label(self.language).to_string(),
                active: stage == self.stage,
                completed: self.is_completed(stage),
            })
            .collect()
    }

    // =========================================================================
    // ANALYSIS
    // =========================================================================

    /// Starts product analysis and returns the request to send.
    pub fn begin_analysis(
        &mut self,
        input: &str,
        image: Option<String>,
    ) -> StudioResult<(Ticket, AnalysisRequest)> {
        self.expect_stage(Stage::Input)?;
        let input = input.trim();
        if input.is_empty() {
            return Err(StudioError::EmptyInput);
        }
        self.error = None;
        self.analysis = TaskState::Pending;
        let ticket = self.analysis_seq.issue();
        info!(ticket = ticket.value(), "Product analysis requested");
        Ok((
            ticket,
            AnalysisRequest {
                input: input.to_string(),
                image,
                language: self.language,
            },
        ))
    }

    /// Merges an analysis reply. Success moves the wizard to Analysis.
    pub fn complete_analysis(
        &mut self,
        ticket: Ticket,
        result: Result<AnalysisResult, GatewayError>,
    ) -> MergeOutcome {
        if !self.analysis_seq.is_current(ticket) || self.stage != Stage::Input {
            warn!(ticket = ticket.value(), "Discarding stale analysis reply");
            return MergeOutcome::Stale;
        }
        match result {
            Ok(AnalysisResult {
                product,
                competitors,
            }) => {
                info!(product = %product.name, competitors = competitors.len(), "Analysis complete");
                self.product = Some(product);
                self.competitors = competitors;
                self.tone_options = SEED_TONES.iter().map(|t| t.to_string()).collect();
                self.analysis = TaskState::Succeeded(());
                self.move_to(Stage::Analysis);
            }
            Err(err) => {
                warn!(error = %err, "Analysis failed");
                self.analysis = TaskState::Failed(err.to_string());
                self.record_error(err.to_string());
            }
        }
        MergeOutcome::Applied
    }

    /// Adds a user hook. Blank input is ignored.
    pub fn add_hook(&mut self, text: &str) -> StudioResult<()> {
        self.expect_stage(Stage::Analysis)?;
        let text = text.trim();
        if !text.is_empty() {
            self.custom_hooks.push(text.to_string());
        }
        Ok(())
    }

    /// Analysis → Strategy. Fixes the hook list.
    pub fn confirm_analysis(&mut self) -> StudioResult<()> {
        self.expect_stage(Stage::Analysis)?;
        let product = self.product.as_ref().ok_or(StudioError::MissingAnalysis)?;
        self.confirmed_hooks = product
            .selling_points
            .iter()
            .map(|sp| sp.point.clone())
            .chain(self.custom_hooks.iter().cloned())
            .collect();
        self.move_to(Stage::Strategy);
        Ok(())
    }

    // =========================================================================
    // STRATEGY
    // =========================================================================

    /// Mutates the strategy. Only allowed on the Strategy stage.
    pub fn edit_strategy<F, R>(&mut self, f: F) -> StudioResult<R>
    where
        F: FnOnce(&mut StrategyConfig) -> R,
    {
        if self.stage != Stage::Strategy {
            return Err(StudioError::StrategyFrozen(self.stage));
        }
        Ok(f(&mut self.strategy))
    }

    /// Strategy → Generation. Freezes the strategy.
    pub fn confirm_strategy(&mut self) -> StudioResult<()> {
        self.expect_stage(Stage::Strategy)?;
        if self.strategy.countries.is_empty() {
            return Err(StudioError::NoCountriesSelected);
        }
        self.move_to(Stage::Generation);
        Ok(())
    }

    /// Generation → Editor.
    pub fn enter_editor(&mut self, selected_count: usize) -> StudioResult<()> {
        self.expect_stage(Stage::Generation)?;
        if selected_count == 0 {
            return Err(StudioError::NoScriptsSelected);
        }
        self.move_to(Stage::Editor);
        Ok(())
    }

    /// Output language for generated text.
    pub fn resolved_language(&self) -> String {
        match self.language {
            Language::Zh => Language::Zh.output_name().to_string(),
            Language::En => self.strategy.language.clone(),
        }
    }

    pub fn strategy_summary(&self) -> StrategySummary {
        let cfg = &self.strategy;
        let scene = if cfg.selected_scenes().is_empty() {
            cfg.scene_category.as_str().to_string()
        } else {
            cfg.selected_scenes().join(", ")
        };
        StrategySummary {
            market: cfg.countries.join(", "),
            language: self.resolved_language(),
            tone: cfg.tone.clone(),
            style: cfg.video_style.clone(),
            scene,
            duration: cfg.duration.clone(),
            aspect_ratio: cfg.aspect_ratio.clone(),
        }
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Steps back one stage, keeping all data. No-op on Input.
    pub fn back(&mut self) -> Stage {
        if let Some(previous) = self.stage.previous() {
            self.move_to(previous);
        }
        self.stage
    }

    /// Clears accumulated data once the user confirms. Returns true on restart.
    pub fn restart<C>(&mut self, confirm: C) -> bool
    where
        C: FnOnce(&str) -> bool,
    {
        if !confirm(RESTART_PROMPT) {
            return false;
        }
        self.product = None;
        self.competitors.clear();
        self.tone_options.clear();
        self.custom_hooks.clear();
        self.confirmed_hooks.clear();
        self.error = None;
        self.analysis = TaskState::Idle;
        self.analysis_seq.invalidate();
        self.strategy.clear_selections();
        self.move_to(Stage::Input);
        true
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Records a stage-blocking failure against the current stage.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(StageError {
            stage: self.stage,
            message: message.into(),
        });
    }

    fn expect_stage(&self, expected: Stage) -> StudioResult<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(StudioError::stage_mismatch(expected, self.stage))
        }
    }

    fn move_to(&mut self, stage: Stage) {
        if stage != self.stage {
            info!(from = ?self.stage, to = ?stage, "Stage transition");
            self.error = None;
        }
        self.stage = stage;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> AnalysisResult {
        AnalysisResult::new(
            ProductAnalysis::new("Trail Lamp")
                .with_selling_point("Bright", "See the whole camp")
                .with_selling_point("Light", "Weighs nothing"),
        )
        .with_competitor(CompetitorData::new("c1", "LumaCamp", Platform::Amazon))
    }

    fn at_stage(stage: Stage) -> WizardController {
        let mut wizard = WizardController::new();
        let (ticket, _) = wizard.begin_analysis("camping lamp", None).unwrap();
        wizard.complete_analysis(ticket, Ok(analysis()));
        if stage >= Stage::Strategy {
            wizard.confirm_analysis().unwrap();
        }
        if stage >= Stage::Generation {
            wizard.confirm_strategy().unwrap();
        }
        if stage >= Stage::Editor {
            wizard.enter_editor(1).unwrap();
        }
        wizard
    }

    #[test]
    fn test_analysis_success_moves_forward() {
        let wizard = at_stage(Stage::Analysis);
        assert_eq!(wizard.stage(), Stage::Analysis);
        assert_eq!(wizard.product().unwrap().name, "Trail Lamp");
        assert_eq!(wizard.competitors().len(), 1);
        assert_eq!(
            wizard.tone_options(),
            &["Professional", "Viral", "Humorous", "Luxury", "Storytelling"]
        );
        assert!(wizard.is_completed(Stage::Input));
        assert!(!wizard.is_completed(Stage::Analysis));
    }

    #[test]
    fn test_analysis_failure_stays_on_input() {
        let mut wizard = WizardController::new();
        let (ticket, _) = wizard.begin_analysis("lamp", None).unwrap();
        wizard.complete_analysis(ticket, Err(GatewayError::EmptyResponse));

        assert_eq!(wizard.stage(), Stage::Input);
        assert!(wizard.analysis_state().is_failed());
        assert_eq!(wizard.error().unwrap().stage, Stage::Input);

        wizard.dismiss_error();
        assert!(wizard.error().is_none());
    }

    #[test]
    fn test_begin_analysis_rejects_blank_input() {
        let mut wizard = WizardController::new();
        assert!(matches!(
            wizard.begin_analysis("   ", None),
            Err(StudioError::EmptyInput)
        ));
    }

    #[test]
    fn test_analysis_request_carries_language() {
        let mut wizard = WizardController::new().with_language(Language::Zh);
        let (_, request) = wizard.begin_analysis("  lamp ", Some("data:x".into())).unwrap();
        assert_eq!(request.input, "lamp");
        assert_eq!(request.language, Language::Zh);
        assert_eq!(request.image.as_deref(), Some("data:x"));
    }

    #[test]
    fn test_stale_analysis_reply_is_discarded() {
        let mut wizard = WizardController::new();
        let (first, _) = wizard.begin_analysis("lamp", None).unwrap();
        let (second, _) = wizard.begin_analysis("lamp v2", None).unwrap();

        assert_eq!(wizard.complete_analysis(first, Ok(analysis())), MergeOutcome::Stale);
        assert_eq!(wizard.stage(), Stage::Input);
        assert!(wizard.complete_analysis(second, Ok(analysis())).is_applied());
        assert_eq!(wizard.stage(), Stage::Analysis);
    }

    #[test]
    fn test_confirmed_hooks_follow_selling_points() {
        let mut wizard = at_stage(Stage::Analysis);
        wizard.add_hook("  Glows in the dark  ").unwrap();
        wizard.add_hook("   ").unwrap();
        wizard.confirm_analysis().unwrap();

        assert_eq!(wizard.confirmed_hooks(), &["Bright", "Light", "Glows in the dark"]);
        assert_eq!(wizard.stage(), Stage::Strategy);
    }

    #[test]
    fn test_confirm_strategy_requires_countries() {
        let mut wizard = at_stage(Stage::Strategy);
        wizard.edit_strategy(|cfg| cfg.countries.clear()).unwrap();
        assert!(matches!(
            wizard.confirm_strategy(),
            Err(StudioError::NoCountriesSelected)
        ));
        assert_eq!(wizard.stage(), Stage::Strategy);
    }

    #[test]
    fn test_strategy_frozen_outside_strategy_stage() {
        let mut wizard = at_stage(Stage::Generation);
        let err = wizard.edit_strategy(|cfg| cfg.set_tone("Viral")).unwrap_err();
        assert!(matches!(err, StudioError::StrategyFrozen(Stage::Generation)));
        assert_eq!(wizard.strategy().tone, "Professional");
    }

    #[test]
    fn test_enter_editor_requires_selection() {
        let mut wizard = at_stage(Stage::Generation);
        assert!(matches!(
            wizard.enter_editor(0),
            Err(StudioError::NoScriptsSelected)
        ));
        wizard.enter_editor(2).unwrap();
        assert_eq!(wizard.stage(), Stage::Editor);
    }

    #[test]
    fn test_back_keeps_data() {
        let mut wizard = at_stage(Stage::Editor);
        assert_eq!(wizard.back(), Stage::Generation);
        assert_eq!(wizard.back(), Stage::Strategy);
        assert_eq!(wizard.back(), Stage::Analysis);
        assert_eq!(wizard.back(), Stage::Input);
        assert_eq!(wizard.back(), Stage::Input);
        assert!(wizard.product().is_some());
        assert_eq!(wizard.confirmed_hooks().len(), 2);
    }

    #[test]
    fn test_skipping_stages_is_rejected() {
        let mut wizard = WizardController::new();
        assert!(matches!(
            wizard.confirm_strategy(),
            Err(StudioError::StageMismatch { expected: Stage::Strategy, actual: Stage::Input })
        ));
        assert!(wizard.confirm_analysis().is_err());
        assert!(wizard.enter_editor(3).is_err());
    }

    #[test]
    fn test_restart_requires_confirmation() {
        let mut wizard = at_stage(Stage::Strategy);
        let mut prompt = String::new();
        let restarted = wizard.restart(|msg| {
            prompt = msg.to_string();
            false
        });

        assert!(!restarted);
        assert_eq!(prompt, RESTART_PROMPT);
        assert_eq!(wizard.stage(), Stage::Strategy);
        assert!(wizard.product().is_some());
    }

    #[test]
    fn test_restart_clears_selections_keeps_scalars() {
        let mut wizard = at_stage(Stage::Strategy);
        wizard
            .edit_strategy(|cfg| {
                cfg.set_tone("Luxury");
                cfg.upload_scene("data:image/png;base64,AA");
                cfg.select_avatar("a1");
            })
            .unwrap();

        assert!(wizard.restart(|_| true));
        assert_eq!(wizard.stage(), Stage::Input);
        assert!(wizard.product().is_none());
        assert!(wizard.competitors().is_empty());
        assert!(wizard.confirmed_hooks().is_empty());
        assert!(wizard.strategy().selected_scenes().is_empty());
        assert!(wizard.strategy().selected_avatars.is_empty());
        assert!(wizard.strategy().uploaded_scenes().is_empty());
        assert_eq!(wizard.strategy().tone, "Luxury");
    }

    #[test]
    fn test_resolved_language_and_summary() {
        let mut wizard = at_stage(Stage::Strategy);
        wizard
            .edit_strategy(|cfg| {
                cfg.set_countries(["United States", "Canada"]).unwrap();
                cfg.toggle_scene("Modern White Kitchen");
            })
            .unwrap();

        let summary = wizard.strategy_summary();
        assert_eq!(summary.market, "United States, Canada");
        assert_eq!(summary.language, "English (US)");
        assert_eq!(summary.scene, "Modern White Kitchen");

        wizard.set_language(Language::Zh);
        assert_eq!(wizard.resolved_language(), "Chinese");
    }

    #[test]
    fn test_progress_marks_active_and_completed() {
        let wizard = at_stage(Stage::Strategy);
        let progress = wizard.progress();
        assert_eq!(progress.len(), 5);
        assert!(progress[0].completed && progress[1].completed);
        assert!(progress[2].active && !progress[2].completed);
        assert!(!progress[3].active && !progress[3].completed);
        assert_eq!(progress[2].label, "Strategy");
    }
}
