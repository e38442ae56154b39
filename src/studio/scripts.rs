//! ScriptBoard: script batches, selection and per-script edits.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog;
use crate::error::{StudioError, StudioResult};
use crate::gateway::GatewayError;
use crate::studio::model::{MarketingScript, ScriptSource};
use crate::task::{MergeOutcome, RequestSeq, TaskState, Ticket};

/// Result of merging a script batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptMerge {
    pub outcome: MergeOutcome,
    /// Selected ids that no longer exist after the replacement.
    pub dropped_selection: usize,
}

#[derive(Debug, Clone)]
pub struct ScriptBoard {
    scripts: Vec<MarketingScript>,
    selected: Vec<String>,
    task: TaskState<usize>,
    seq: RequestSeq,
    pending_source: ScriptSource,
    max_selected: usize,
}

impl Default for ScriptBoard {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ScriptBoard {
    pub fn new(max_selected: usize) -> Self {
        Self {
            scripts: Vec::new(),
            selected: Vec::new(),
            task: TaskState::Idle,
            seq: RequestSeq::new(),
            pending_source: ScriptSource::AiGenerated,
            max_selected,
        }
    }

    pub fn scripts(&self) -> &[MarketingScript] {
        &self.scripts
    }

    pub fn script(&self, id: &str) -> Option<&MarketingScript> {
        self.scripts.iter().find(|s| s.id == id)
    }

    pub(crate) fn script_mut(&mut self, id: &str) -> StudioResult<&mut MarketingScript> {
        self.scripts
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StudioError::script_not_found(id))
    }

    pub fn task(&self) -> &TaskState<usize> {
        &self.task
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selected
    }

    /// Selected scripts resolved against the current collection, in selection order.
    pub fn selected_scripts(&self) -> Vec<&MarketingScript> {
        self.selected
            .iter()
            .filter_map(|id| self.script(id))
            .collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    // =========================================================================
    // GENERATION
    // =========================================================================

    /// Issues a new batch request, superseding any outstanding one.
    pub fn begin(&mut self, source: ScriptSource) -> Ticket {
        let ticket = self.seq.issue();
        self.task = TaskState::Pending;
        self.pending_source = source;
        info!(ticket = ticket.value(), ?source, "Script batch requested");
        ticket
    }

    /// Merges a batch reply. Only the latest ticket is applied.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<MarketingScript>, GatewayError>,
    ) -> ScriptMerge {
        if !self.seq.is_current(ticket) {
            warn!(ticket = ticket.value(), "Discarding stale script batch");
            return ScriptMerge {
                outcome: MergeOutcome::Stale,
                dropped_selection: 0,
            };
        }
        match result {
            Ok(mut scripts) => {
                for script in &mut scripts {
                    script.source = self.pending_source;
                }
                let dropped = self
                    .selected
                    .iter()
                    .filter(|id| !scripts.iter().any(|s| &s.id == *id))
                    .count();
                info!(count = scripts.len(), dropped, "Script batch merged");
                self.task = TaskState::Succeeded(scripts.len());
                self.scripts = scripts;
                self.selected.clear();
                ScriptMerge {
                    outcome: MergeOutcome::Applied,
                    dropped_selection: dropped,
                }
            }
            Err(err) => {
                warn!(error = %err, "Script generation failed");
                self.task = TaskState::Failed(err.to_string());
                ScriptMerge {
                    outcome: MergeOutcome::Applied,
                    dropped_selection: 0,
                }
            }
        }
    }

    // =========================================================================
    // SELECTION & EDITS
    // =========================================================================

    /// Toggles selection. Returns true if the script is now selected.
    pub fn toggle_selection(&mut self, id: &str) -> StudioResult<bool> {
        if self.script(id).is_none() {
            return Err(StudioError::script_not_found(id));
        }
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
            return Ok(false);
        }
        if self.selected.len() >= self.max_selected {
            return Err(StudioError::SelectionLimit(self.max_selected));
        }
        self.selected.push(id.to_string());
        Ok(true)
    }

    /// Changes the target duration and notes the adjustment in the copy.
    pub fn set_duration(&mut self, id: &str, duration: &str) -> StudioResult<()> {
        if !catalog::DURATIONS.contains(&duration) {
            return Err(StudioError::unknown_option("duration", duration));
        }
        let script = self.script_mut(id)?;
        script.duration = duration.to_string();
        script.copy = format!("{} (Adjusted for {})", script.copy, duration);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.scripts.clear();
        self.selected.clear();
        self.task = TaskState::Idle;
        self.seq.invalidate();
    }
}
