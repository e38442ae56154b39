//! CampaignSession: the single owner of wizard and studio state.
//!
//! Every user intent goes through a method here. Synchronous intents validate
//! and mutate directly; asynchronous ones run begin → gateway call → complete,
//! so results always merge by key and ticket. Gateway failures are folded
//! into task or stage state; `Err` means the intent itself was rejected.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};
use crate::gateway::{CustomAvatarRequest, Gateway, ScriptRequest, SpeechRequest, VideoRequest};
use crate::studio::slots::video_request;
use crate::studio::{
    AudioField, Avatar, MarketingScript, MediaAsset, ProductionSlot, ScriptMerge, ScriptSource,
    Studio,
};
use crate::task::{MergeOutcome, TaskState};
use crate::wizard::model::*;
use crate::wizard::{StageError, WizardController};

/// What happened to a render intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOutcome {
    /// The render ran; its result was applied or discarded as stale.
    Merged(MergeOutcome),
    /// No credential after one request; nothing changed.
    CredentialMissing,
}

// =============================================================================
// SESSION
// =============================================================================

pub struct CampaignSession {
    config: StudioConfig,
    gateway: Arc<dyn Gateway>,
    wizard: WizardController,
    studio: Studio,
}

impl CampaignSession {
    pub fn new(config: StudioConfig, gateway: Arc<dyn Gateway>) -> Self {
        let studio = Studio::new(&config);
        Self {
            config,
            gateway,
            wizard: WizardController::new(),
            studio,
        }
    }

    /// Builder: Set interface language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.wizard.set_language(language);
        self
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn studio(&self) -> &Studio {
        &self.studio
    }

    pub fn stage(&self) -> Stage {
        self.wizard.stage()
    }

    pub fn set_language(&mut self, language: Language) {
        self.wizard.set_language(language);
    }

    // =========================================================================
    // INPUT & ANALYSIS
    // =========================================================================

    /// Runs product analysis. On success the wizard moves to Analysis.
    pub async fn analyze_product(&mut self, input: &str, image: Option<MediaAsset>) -> StudioResult<()> {
        let (ticket, request) = self
            .wizard
            .begin_analysis(input, image.map(|asset| asset.data_url))?;
        let result = self.gateway.analyze_product(&request).await;
        self.wizard.complete_analysis(ticket, result);
        Ok(())
    }

    pub fn add_hook(&mut self, text: &str) -> StudioResult<()> {
        self.wizard.add_hook(text)
    }

    pub fn confirm_analysis(&mut self) -> StudioResult<()> {
        self.wizard.confirm_analysis()
    }

    // =========================================================================
    // STRATEGY
    // =========================================================================

    /// Mutates the strategy while on the Strategy stage.
    pub fn edit_strategy<F, R>(&mut self, f: F) -> StudioResult<R>
    where
        F: FnOnce(&mut StrategyConfig) -> R,
    {
        self.wizard.edit_strategy(f)
    }

    /// Adds an uploaded scene image and selects it. Returns the scene name.
    pub fn upload_scene(&mut self, image: MediaAsset) -> StudioResult<String> {
        self.wizard
            .edit_strategy(|cfg| cfg.upload_scene(image.data_url))
    }

    /// Requests a profile batch and renders the first few portraits.
    pub async fn generate_avatar_profiles(&mut self) -> StudioResult<Vec<String>> {
        self.expect_stage(Stage::Strategy)?;
        self.studio.avatars.begin_profiles();
        let result = self
            .gateway
            .generate_avatar_profiles(self.config.avatar_batch_size)
            .await;
        if let Err(err) = &result {
            self.wizard.record_error(err.to_string());
        }
        let ids = self.studio.avatars.complete_profiles(result);
        let autorender: Vec<String> = ids.iter().take(self.config.avatar_autorender).cloned().collect();
        self.generate_avatar_images(&autorender).await?;
        Ok(ids)
    }

    /// Renders one portrait. Returns false if the request was skipped.
    pub async fn generate_avatar_image(&mut self, id: &str) -> StudioResult<bool> {
        Ok(self.generate_avatar_images(&[id.to_string()]).await? == 1)
    }

    /// Renders several portraits concurrently and merges each by id.
    /// Returns how many requests were issued.
    pub async fn generate_avatar_images(&mut self, ids: &[String]) -> StudioResult<usize> {
        let mut pending = Vec::new();
        for id in ids {
            if let Some(desc) = self.studio.avatars.begin_image(id)? {
                pending.push((id.clone(), desc));
            }
        }
        let gateway = Arc::clone(&self.gateway);
        let results = join_all(pending.iter().map(|(id, desc)| {
            let gateway = &gateway;
            async move { (id, gateway.generate_avatar_image(desc).await) }
        }))
        .await;
        for (id, result) in results {
            self.studio.avatars.complete_image(id, result);
        }
        Ok(pending.len())
    }

    /// Creates one custom avatar, starts its portrait and selects it.
    pub async fn create_custom_avatar(
        &mut self,
        text: Option<&str>,
        image: Option<MediaAsset>,
    ) -> StudioResult<Option<String>> {
        self.expect_stage(Stage::Strategy)?;
        let text = text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);
        if text.is_none() && image.is_none() {
            return Err(StudioError::EmptyInput);
        }
        let request = CustomAvatarRequest {
            text,
            image: image.map(|asset| asset.data_url),
        };
        self.studio.avatars.begin_custom();
        let result = self.gateway.analyze_custom_avatar(&request).await;
        if let Err(err) = &result {
            self.wizard.record_error(err.to_string());
        }
        let Some(id) = self.studio.avatars.complete_custom(result) else {
            return Ok(None);
        };

        let portrait = self.studio.avatars.begin_image(&id)?;
        let reference = request.image.clone();
        let selected = self.wizard.edit_strategy(|cfg| {
            cfg.custom_avatars.extend(reference);
            cfg.select_avatar(&id);
        });
        if let Err(err) = selected {
            warn!(avatar = %id, error = %err, "Custom avatar not selected");
        }
        if let Some(desc) = portrait {
            let result = self.gateway.generate_avatar_image(&desc).await;
            self.studio.avatars.complete_image(&id, result);
        }
        Ok(Some(id))
    }

    /// Generates a scene image and selects it. Returns the scene name.
    pub async fn generate_scene_image(&mut self, prompt: &str) -> StudioResult<Option<String>> {
        self.expect_stage(Stage::Strategy)?;
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StudioError::EmptyInput);
        }
        self.studio.scene_image = TaskState::Pending;
        match self.gateway.generate_scene_image(prompt).await {
            Ok(url) => match self.wizard.edit_strategy(|cfg| cfg.add_generated_scene(url)) {
                Ok(name) => {
                    self.studio.scene_image = TaskState::Succeeded(name.clone());
                    Ok(Some(name))
                }
                Err(err) => {
                    warn!(error = %err, "Generated scene arrived after strategy froze");
                    self.studio.scene_image = TaskState::Idle;
                    Ok(None)
                }
            },
            Err(err) => {
                warn!(error = %err, "Scene image failed");
                self.studio.scene_image = TaskState::Failed(err.to_string());
                self.wizard.record_error(err.to_string());
                Ok(None)
            }
        }
    }

    pub fn confirm_strategy(&mut self) -> StudioResult<()> {
        self.wizard.confirm_strategy()
    }

    // =========================================================================
    // GENERATION
    // =========================================================================

    pub fn add_footage(&mut self, asset: MediaAsset) {
        info!(name = %asset.name, mime = %asset.mime, "Footage added");
        self.studio.footage.push(asset);
    }

    pub fn remove_footage(&mut self, index: usize) -> Option<MediaAsset> {
        (index < self.studio.footage.len()).then(|| self.studio.footage.remove(index))
    }

    pub fn set_custom_prompt(&mut self, text: &str) {
        self.studio.custom_prompt = text.to_string();
    }

    /// Assembles the script request from accumulated state.
    pub fn script_request(&self) -> StudioResult<ScriptRequest> {
        let product = self.wizard.product().ok_or(StudioError::MissingAnalysis)?;
        let custom = self.studio.custom_prompt.trim();
        Ok(ScriptRequest {
            product: product.clone(),
            competitors: self.wizard.competitors().to_vec(),
            strategy: self.wizard.strategy_summary(),
            hooks: self.wizard.confirmed_hooks().to_vec(),
            footage: self.studio.image_footage(),
            custom_prompt: (!custom.is_empty()).then(|| custom.to_string()),
        })
    }

    /// Generates a new script batch, replacing the current one.
    pub async fn generate_scripts(&mut self) -> StudioResult<ScriptMerge> {
        self.expect_stage(Stage::Generation)?;
        let request = self.script_request()?;
        let source = if request.custom_prompt.is_some() {
            ScriptSource::UserPrompted
        } else {
            ScriptSource::AiGenerated
        };
        let ticket = self.studio.scripts.begin(source);
        let result = self.gateway.generate_scripts(&request).await;
        let failure = result.as_ref().err().map(ToString::to_string);
        let merge = self.studio.scripts.complete(ticket, result);
        if let (Some(msg), true) = (failure, merge.outcome.is_applied()) {
            self.wizard.record_error(msg);
        }
        Ok(merge)
    }

    pub fn toggle_script(&mut self, id: &str) -> StudioResult<bool> {
        self.studio.scripts.toggle_selection(id)
    }

    pub fn set_script_duration(&mut self, id: &str, duration: &str) -> StudioResult<()> {
        self.studio.scripts.set_duration(id, duration)
    }

    pub fn set_audio(&mut self, script_id: &str, field: AudioField, value: &str) -> StudioResult<()> {
        self.studio.set_audio(script_id, field, value)
    }

    /// Generates the voice-over for one script.
    pub async fn generate_audio(&mut self, script_id: &str) -> StudioResult<MergeOutcome> {
        let script = self
            .studio
            .scripts
            .script(script_id)
            .ok_or_else(|| StudioError::script_not_found(script_id))?;
        let request = SpeechRequest {
            text: script.copy.clone(),
            settings: script.audio_settings.clone(),
        };
        let ticket = self.studio.audio.begin(script_id)?;
        let result = self.gateway.generate_speech(&request).await;
        match self.studio.audio.complete(script_id, ticket, result) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                warn!(script = script_id, error = %err, "Voice-over failed");
                self.wizard.record_error(err.to_string());
                Ok(MergeOutcome::Applied)
            }
        }
    }

    pub fn toggle_playback(&mut self, script_id: &str) -> StudioResult<bool> {
        self.studio.audio.toggle_playback(script_id)
    }

    pub fn playback_finished(&mut self, script_id: &str) {
        self.studio.audio.playback_finished(script_id);
    }

    /// Generation → Editor. Builds the production slots.
    pub fn proceed_to_studio(&mut self) -> StudioResult<()> {
        let selected = self.studio.scripts.selected_scripts();
        self.wizard.enter_editor(selected.len())?;
        self.studio
            .slots
            .build(&selected, self.config.slot_count, &self.studio.footage);
        Ok(())
    }

    // =========================================================================
    // STUDIO
    // =========================================================================

    pub fn set_refinement_image(&mut self, image: Option<MediaAsset>) {
        self.studio
            .slots
            .set_refinement_image(image.map(|asset| asset.data_url));
    }

    /// Renders one slot behind the credential gate.
    pub async fn render_slot(&mut self, slot_id: usize, instruction: Option<&str>) -> StudioResult<RenderOutcome> {
        let mut outcomes = self.render_slots(&[slot_id], instruction).await?;
        outcomes
            .pop()
            .map(|(_, outcome)| outcome)
            .ok_or(StudioError::SlotNotFound(slot_id))
    }

    /// Renders several slots concurrently behind one credential gate. Each
    /// result merges into its own slot as it is collected.
    ///
    /// Every id is validated before the gate; duplicates render once.
    pub async fn render_slots(
        &mut self,
        slot_ids: &[usize],
        instruction: Option<&str>,
    ) -> StudioResult<Vec<(usize, RenderOutcome)>> {
        self.expect_stage(Stage::Editor)?;
        let instruction = instruction.map(str::trim).filter(|i| !i.is_empty());
        let mut ids: Vec<usize> = Vec::with_capacity(slot_ids.len());
        for &id in slot_ids {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        let requests = ids
            .iter()
            .map(|&id| self.slot_request(id, instruction))
            .collect::<StudioResult<Vec<VideoRequest>>>()?;

        if !self.ensure_credential().await {
            warn!(slots = ?ids, "Render aborted: no video credential");
            return Ok(ids
                .into_iter()
                .map(|id| (id, RenderOutcome::CredentialMissing))
                .collect());
        }

        let mut tickets = Vec::with_capacity(ids.len());
        for &id in &ids {
            tickets.push(self.studio.slots.begin(id)?);
        }
        let gateway = Arc::clone(&self.gateway);
        let results = join_all(requests.iter().map(|request| {
            let gateway = &gateway;
            async move { gateway.generate_video(request).await }
        }))
        .await;

        let mut outcomes = Vec::with_capacity(ids.len());
        for ((id, ticket), result) in ids.into_iter().zip(tickets).zip(results) {
            let outcome = self.studio.slots.complete(id, ticket, instruction, result)?;
            outcomes.push((id, RenderOutcome::Merged(outcome)));
        }
        Ok(outcomes)
    }

    fn slot_request(&self, slot_id: usize, instruction: Option<&str>) -> StudioResult<VideoRequest> {
        let script_id = &self.studio.slots.slot(slot_id)?.script_id;
        let script = self
            .studio
            .scripts
            .script(script_id)
            .ok_or_else(|| StudioError::script_not_found(script_id.as_str()))?;
        Ok(video_request(
            script,
            self.wizard.strategy(),
            self.studio.slots.active_reference(),
            self.studio.footage.len(),
            instruction,
        ))
    }

    /// Asks for the credential once if it is missing, then re-checks.
    async fn ensure_credential(&self) -> bool {
        if self.gateway.has_credential().await {
            return true;
        }
        self.gateway.request_credential().await;
        self.gateway.has_credential().await
    }

    /// Re-renders a slot with a revision instruction and/or the refinement image.
    pub async fn submit_revision(&mut self, slot_id: usize, text: &str) -> StudioResult<RenderOutcome> {
        let text = text.trim();
        if text.is_empty() && self.studio.slots.refinement_image().is_none() {
            return Err(StudioError::EmptyRevision);
        }
        self.render_slot(slot_id, Some(text)).await
    }

    pub fn select_version(&mut self, slot_id: usize, index: usize) -> StudioResult<()> {
        self.studio.slots.select_version(slot_id, index)
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    pub fn back(&mut self) -> Stage {
        self.wizard.back()
    }

    /// Clears the campaign after confirmation. Avatars are kept.
    pub fn restart<C>(&mut self, confirm: C) -> bool
    where
        C: FnOnce(&str) -> bool,
    {
        if !self.wizard.restart(confirm) {
            return false;
        }
        self.studio.clear();
        info!("Session restarted");
        true
    }

    pub fn dismiss_error(&mut self) {
        self.wizard.dismiss_error();
    }

    fn expect_stage(&self, expected: Stage) -> StudioResult<()> {
        let actual = self.wizard.stage();
        if actual == expected {
            Ok(())
        } else {
            Err(StudioError::stage_mismatch(expected, actual))
        }
    }

    // =========================================================================
    // SNAPSHOT
    // =========================================================================

    /// Pretty-printed JSON of [`CampaignSession::snapshot`].
    pub fn snapshot_json(&self) -> StudioResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Serializable view of the whole session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let wizard = &self.wizard;
        let studio = &self.studio;
        SessionSnapshot {
            stage: wizard.stage(),
            language: wizard.language(),
            progress: wizard.progress(),
            error: wizard.error().cloned(),
            analysis: wizard.analysis_state().clone(),
            product: wizard.product().cloned(),
            competitors: wizard.competitors().to_vec(),
            tone_options: wizard.tone_options().to_vec(),
            custom_hooks: wizard.custom_hooks().to_vec(),
            confirmed_hooks: wizard.confirmed_hooks().to_vec(),
            strategy: wizard.strategy().clone(),
            summary: wizard.strategy_summary(),
            avatars: studio.avatars.avatars().to_vec(),
            avatar_profiles: studio.avatars.profiles_task().clone(),
            rendering_avatars: studio.avatars.rendering(),
            custom_avatar: studio.avatars.custom_task().clone(),
            scene_image: studio.scene_image.clone(),
            footage: studio.footage.iter().map(|a| a.name.clone()).collect(),
            custom_prompt: studio.custom_prompt.clone(),
            scripts: studio.scripts.scripts().to_vec(),
            script_task: studio.scripts.task().clone(),
            selected_scripts: studio.scripts.selected_ids().to_vec(),
            audio_tracks: studio.audio.tracks().clone(),
            audio_generating: studio.audio.generating().map(str::to_string),
            audio_playing: studio.audio.playing().map(str::to_string),
            slots: studio.slots.slots().to_vec(),
            has_reference_frame: studio.slots.reference_frame().is_some(),
            has_refinement_image: studio.slots.refinement_image().is_some(),
        }
    }
}

/// Typed idle/pending/done/error view rendered by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub stage: Stage,
    pub language: Language,
    pub progress: Vec<StageProgress>,
    pub error: Option<StageError>,
    pub analysis: TaskState<()>,
    pub product: Option<ProductAnalysis>,
    pub competitors: Vec<CompetitorData>,
    pub tone_options: Vec<String>,
    pub custom_hooks: Vec<String>,
    pub confirmed_hooks: Vec<String>,
    pub strategy: StrategyConfig,
    pub summary: StrategySummary,
    pub avatars: Vec<Avatar>,
    pub avatar_profiles: TaskState<usize>,
    pub rendering_avatars: Vec<String>,
    pub custom_avatar: TaskState<String>,
    pub scene_image: TaskState<String>,
    pub footage: Vec<String>,
    pub custom_prompt: String,
    pub scripts: Vec<MarketingScript>,
    pub script_task: TaskState<usize>,
    pub selected_scripts: Vec<String>,
    pub audio_tracks: HashMap<String, String>,
    pub audio_generating: Option<String>,
    pub audio_playing: Option<String>,
    pub slots: Vec<ProductionSlot>,
    pub has_reference_frame: bool,
    pub has_refinement_image: bool,
}

// =============================================================================
// TESTS
// =============================================================================
