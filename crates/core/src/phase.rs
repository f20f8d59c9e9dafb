//! Workflow phases.
//!
//! ```text
//! RegisteringVoters(0) -> ProposalsRegistrationStarted(1) -> ProposalsRegistrationEnded(2)
//!   -> VotingSessionStarted(3) -> VotingSessionEnded(4) -> VotesTallied(5)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six ordered workflow steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Phase {
    #[default]
    RegisteringVoters = 0,
    ProposalsRegistrationStarted = 1,
    ProposalsRegistrationEnded = 2,
    VotingSessionStarted = 3,
    VotingSessionEnded = 4,
    VotesTallied = 5,
}

impl Phase {
    /// All phases in workflow order.
    pub const ALL: [Phase; 6] = [
        Phase::RegisteringVoters,
        Phase::ProposalsRegistrationStarted,
        Phase::ProposalsRegistrationEnded,
        Phase::VotingSessionStarted,
        Phase::VotingSessionEnded,
        Phase::VotesTallied,
    ];

    /// Numeric position in the workflow.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<Phase> {
        Phase::from_ordinal(self.ordinal() + 1)
    }

    /// Look up a phase by ordinal.
    pub fn from_ordinal(ordinal: u8) -> Option<Phase> {
        Phase::ALL.get(usize::from(ordinal)).copied()
    }

    /// True once the ballot has been tallied.
    pub fn is_terminal(self) -> bool {
        self == Phase::VotesTallied
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> Self {
        phase.ordinal()
    }
}

impl TryFrom<u8> for Phase {
    type Error = String;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        Phase::from_ordinal(ordinal).ok_or_else(|| format!("no workflow phase with ordinal {ordinal}"))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::RegisteringVoters => "RegisteringVoters",
            Phase::ProposalsRegistrationStarted => "ProposalsRegistrationStarted",
            Phase::ProposalsRegistrationEnded => "ProposalsRegistrationEnded",
            Phase::VotingSessionStarted => "VotingSessionStarted",
            Phase::VotingSessionEnded => "VotingSessionEnded",
            Phase::VotesTallied => "VotesTallied",
        };
        write!(f, "{name}({})", self.ordinal())
    }
}
