//! Asynchronous task bookkeeping shared by the orchestrator boards.
//!
//! Every keyed entity that can be regenerated owns a [`RequestSeq`]. Issuing a
//! request hands out a [`Ticket`]; a completed response is merged only if its
//! ticket is still the latest one issued for that entity, so a slow response
//! can never overwrite the result of a newer request.

use serde::{Deserialize, Serialize};

// =============================================================================
// TASK STATE
// =============================================================================

/// Observable lifecycle of one asynchronous unit of work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum TaskState<T> {
    #[default]
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> TaskState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// REQUEST SEQUENCING
// =============================================================================

/// Request-generation number handed out by a [`RequestSeq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic request counter for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket, superseding every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Returns true if `ticket` is the most recently issued one.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Invalidates all outstanding tickets without issuing a request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

/// What happened to a response when it was merged back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    /// The response was written into state.
    Applied,
    /// A newer request superseded this one; the response was discarded.
    Stale,
}

impl MergeOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_is_current() {
        let mut seq = RequestSeq::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn test_invalidate_supersedes_outstanding() {
        let mut seq = RequestSeq::new();
        let ticket = seq.issue();
        seq.invalidate();
        assert!(!seq.is_current(ticket));
    }

    #[test]
    fn test_task_state_accessors() {
        let failed: TaskState<()> = TaskState::Failed("boom".to_string());
        assert!(failed.is_failed());
        assert_eq!(failed.error(), Some("boom"));
        assert!(TaskState::<()>::Pending.is_pending());
        assert_eq!(TaskState::<u8>::default(), TaskState::Idle);
    }

    #[test]
    fn test_task_state_serializes_tagged() {
        let json = serde_json::to_value(TaskState::Succeeded(3)).unwrap();
        assert_eq!(json["state"], "succeeded");
        assert_eq!(json["value"], 3);
    }
}
