//! SlotBoard: production slots, video renders and version history.

use tracing::{info, warn};

use crate::error::{StudioError, StudioResult};
use crate::gateway::{GatewayError, VideoRequest};
use crate::studio::model::{MarketingScript, MediaAsset, ProductionSlot, SlotStatus};
use crate::task::{MergeOutcome, RequestSeq, Ticket};
use crate::wizard::model::StrategyConfig;

pub const AVATAR_HINT: &str = "Include a consistent digital human character presenter.";

#[derive(Debug, Clone, Default)]
pub struct SlotBoard {
    slots: Vec<ProductionSlot>,
    seqs: Vec<RequestSeq>,
    reference_frame: Option<String>,
    refinement_image: Option<String>,
}

impl SlotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds `count` slots cycling through `selected`, and picks the first
    /// image in `footage` as reference frame.
    ///
    /// A slot still bound to the same script keeps its versions; a rebound
    /// slot starts empty and its outstanding render becomes stale.
    pub fn build(&mut self, selected: &[&MarketingScript], count: usize, footage: &[MediaAsset]) {
        let previous = std::mem::take(&mut self.slots);
        let assigned = assign_scripts(selected, count);
        self.seqs.resize_with(assigned.len(), RequestSeq::new);
        let mut kept = 0;
        self.slots = assigned
            .into_iter()
            .zip(self.seqs.iter_mut())
            .map(|(fresh, seq)| match previous.get(fresh.id) {
                Some(existing) if existing.script_id == fresh.script_id => {
                    kept += 1;
                    existing.clone()
                }
                _ => {
                    seq.invalidate();
                    fresh
                }
            })
            .collect();
        self.reference_frame = footage
            .iter()
            .find(|asset| asset.is_image())
            .map(|asset| asset.data_url.clone());
        info!(
            slots = self.slots.len(),
            kept,
            reference = self.reference_frame.is_some(),
            "Production slots built"
        );
    }

    pub fn slots(&self) -> &[ProductionSlot] {
        &self.slots
    }

    pub fn slot(&self, id: usize) -> StudioResult<&ProductionSlot> {
        self.slots.get(id).ok_or(StudioError::SlotNotFound(id))
    }

    pub fn reference_frame(&self) -> Option<&str> {
        self.reference_frame.as_deref()
    }

    pub fn refinement_image(&self) -> Option<&str> {
        self.refinement_image.as_deref()
    }

    pub fn set_refinement_image(&mut self, image: Option<String>) {
        self.refinement_image = image;
    }

    /// Refinement image if set, otherwise the reference frame.
    pub fn active_reference(&self) -> Option<String> {
        self.refinement_image
            .clone()
            .or_else(|| self.reference_frame.clone())
    }

    // =========================================================================
    // RENDERS
    // =========================================================================

    /// Marks a slot generating and issues its ticket.
    pub fn begin(&mut self, id: usize) -> StudioResult<Ticket> {
        let slot = self.slots.get_mut(id).ok_or(StudioError::SlotNotFound(id))?;
        slot.status = SlotStatus::Generating;
        let ticket = self.seqs[id].issue();
        info!(slot = id, ticket = ticket.value(), "Render started");
        Ok(ticket)
    }

    /// Records a render result. Stale tickets leave the slot untouched.
    pub fn complete(
        &mut self,
        id: usize,
        ticket: Ticket,
        instruction: Option<&str>,
        result: Result<String, GatewayError>,
    ) -> StudioResult<MergeOutcome> {
        let slot = self.slots.get_mut(id).ok_or(StudioError::SlotNotFound(id))?;
        if !self.seqs[id].is_current(ticket) {
            warn!(slot = id, ticket = ticket.value(), "Discarding stale render");
            return Ok(MergeOutcome::Stale);
        }
        match result {
            Ok(url) => {
                info!(slot = id, %url, "Render finished");
                slot.push_version(url, instruction);
            }
            Err(err) => {
                warn!(slot = id, error = %err, "Render failed");
                slot.status = SlotStatus::Error(err.to_string());
            }
        }
        Ok(MergeOutcome::Applied)
    }

    /// Points the slot at an earlier version without reordering history.
    pub fn select_version(&mut self, id: usize, index: usize) -> StudioResult<()> {
        let slot = self.slots.get_mut(id).ok_or(StudioError::SlotNotFound(id))?;
        let url = slot
            .history
            .get(index)
            .cloned()
            .ok_or(StudioError::VersionNotFound { slot: id, index })?;
        slot.current_url = Some(url);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.seqs.clear();
        self.reference_frame = None;
        self.refinement_image = None;
    }
}

/// `slot[i]` renders `selected[i % n]`. No selection yields no slots.
pub fn assign_scripts(selected: &[&MarketingScript], count: usize) -> Vec<ProductionSlot> {
    if selected.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|i| ProductionSlot::new(i, selected[i % selected.len()].id.clone()))
        .collect()
}

/// Assembles one render request from the script and the frozen strategy.
pub fn video_request(
    script: &MarketingScript,
    strategy: &StrategyConfig,
    reference_image: Option<String>,
    footage_count: usize,
    instruction: Option<&str>,
) -> VideoRequest {
    VideoRequest {
        prompt: script.video_prompt(),
        reference_image,
        narration: script.copy.clone(),
        duration: strategy.duration.clone(),
        aspect_ratio: strategy.aspect_ratio.clone(),
        footage_count,
        clean_feed: true,
        instruction: instruction.map(str::to_string),
        avatar_hint: (!strategy.selected_avatars.is_empty()).then(|| AVATAR_HINT.to_string()),
        language: strategy.language.clone(),
    }
}
