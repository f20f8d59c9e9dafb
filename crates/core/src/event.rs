//! Notifications emitted on every accepted state change.
//!
//! Serialized shapes use the observer-facing field names:
//! ```text
//! WorkflowStatusChange { previousStatus, newStatus }
//! VoterRegistered      { voterAddress }
//! ProposalRegistered   { proposalId }
//! Voted                { voter, proposalId }
//! ```

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{Phase, PhaseChange, Principal, ProposalId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all_fields = "camelCase")]
pub enum Event {
    WorkflowStatusChange {
        previous_status: Phase,
        new_status: Phase,
    },
    VoterRegistered {
        voter_address: Principal,
    },
    ProposalRegistered {
        proposal_id: ProposalId,
    },
    Voted {
        voter: Principal,
        proposal_id: ProposalId,
    },
}

impl From<PhaseChange> for Event {
    fn from(change: PhaseChange) -> Self {
        Event::WorkflowStatusChange {
            previous_status: change.previous,
            new_status: change.new,
        }
    }
}

/// Receives events after the operation that produced them has committed.
///
/// A [`SharedBallot`](crate::SharedBallot) delivers while it still holds the
/// ballot's lock, downgraded to shared access. A sink may read from the same
/// handle during `deliver`, but calling a mutating operation or `subscribe`
/// on it deadlocks.
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: &Event);
}

/// Sink that keeps everything it receives, in order.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<Event>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Take everything delivered so far, leaving the recorder empty.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for EventRecorder {
    fn deliver(&self, event: &Event) {
        self.events.lock().push(event.clone());
    }
}

/// Sink that writes each event to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn deliver(&self, event: &Event) {
        tracing::info!(target: "phasevote::events", ?event, "ballot event");
    }
}
