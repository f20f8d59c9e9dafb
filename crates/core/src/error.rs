//! Error types for phasevote-core.

use thiserror::Error;

use crate::{Phase, Principal, ProposalId};

/// Rejections of an attempted operation.
///
/// Every variant leaves the ballot exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Caller is not the administrator for an administrator-only operation.
    #[error("caller {0} is not the administrator")]
    Unauthorized(Principal),

    /// Caller is not a registered voter for a voter-only operation.
    #[error("caller {0} is not a registered voter")]
    NotRegistered(Principal),

    /// The workflow is not in the phase the operation requires.
    #[error("{operation} requires phase {required}, current phase is {current}")]
    NotInPhase {
        operation: &'static str,
        required: Phase,
        current: Phase,
    },

    /// Registration attempted for a voter that already has a record.
    #[error("voter {0} is already registered")]
    AlreadyRegistered(Principal),

    /// Proposal text is empty.
    #[error("proposal description must not be empty")]
    EmptyProposal,

    /// Referenced proposal does not exist.
    #[error("proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    /// Voter already cast their vote.
    #[error("voter {0} has already voted")]
    AlreadyVoted(Principal),

    /// Snapshot encoding or decoding failed.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Payload-free view of [`Error`], handy for matching and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    NotRegistered,
    NotInPhase,
    AlreadyRegistered,
    EmptyProposal,
    ProposalNotFound,
    AlreadyVoted,
    Snapshot,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unauthorized(_) => ErrorKind::Unauthorized,
            Error::NotRegistered(_) => ErrorKind::NotRegistered,
            Error::NotInPhase { .. } => ErrorKind::NotInPhase,
            Error::AlreadyRegistered(_) => ErrorKind::AlreadyRegistered,
            Error::EmptyProposal => ErrorKind::EmptyProposal,
            Error::ProposalNotFound(_) => ErrorKind::ProposalNotFound,
            Error::AlreadyVoted(_) => ErrorKind::AlreadyVoted,
            Error::Snapshot(_) => ErrorKind::Snapshot,
        }
    }
}

impl From<ciborium::ser::Error<std::io::Error>> for Error {
    fn from(e: ciborium::ser::Error<std::io::Error>) -> Self {
        Error::Snapshot(e.to_string())
    }
}

impl From<ciborium::de::Error<std::io::Error>> for Error {
    fn from(e: ciborium::de::Error<std::io::Error>) -> Self {
        Error::Snapshot(e.to_string())
    }
}
