//! The workflow state machine.
//!
//! Phase only moves forward, one step at a time, and only on the
//! administrator's say-so. Each named transition is legal from exactly one
//! source phase.

use serde::{Deserialize, Serialize};

use crate::{AccessControl, Error, Phase, Principal};

/// A forward transition the administrator can request directly.
///
/// The final step, `VotingSessionEnded -> VotesTallied`, is not here: it is
/// bundled with the tally computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    StartProposalsRegistering,
    EndProposalsRegistering,
    StartVotingSession,
    EndVotingSession,
}

impl Transition {
    /// The only phase this transition may be taken from.
    pub fn source(self) -> Phase {
        match self {
            Transition::StartProposalsRegistering => Phase::RegisteringVoters,
            Transition::EndProposalsRegistering => Phase::ProposalsRegistrationStarted,
            Transition::StartVotingSession => Phase::ProposalsRegistrationEnded,
            Transition::EndVotingSession => Phase::VotingSessionStarted,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Transition::StartProposalsRegistering => "start_proposals_registering",
            Transition::EndProposalsRegistering => "end_proposals_registering",
            Transition::StartVotingSession => "start_voting_session",
            Transition::EndVotingSession => "end_voting_session",
        }
    }
}

/// A committed phase change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    pub previous: Phase,
    pub new: Phase,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    phase: Phase,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fail with [`Error::NotInPhase`] unless the current phase is `required`.
    pub fn require(&self, required: Phase, operation: &'static str) -> Result<(), Error> {
        if self.phase == required {
            Ok(())
        } else {
            Err(Error::NotInPhase {
                operation,
                required,
                current: self.phase,
            })
        }
    }

    /// Take one of the administrator's named transitions.
    pub fn advance(
        &mut self,
        access: &AccessControl,
        caller: &Principal,
        transition: Transition,
    ) -> Result<PhaseChange, Error> {
        access.require_administrator(caller)?;
        self.require(transition.source(), transition.name())?;
        Ok(self.step())
    }

    /// Move from `VotingSessionEnded` to `VotesTallied`. The tally guards
    /// caller and phase before calling this.
    pub(crate) fn finish_tally(&mut self) -> PhaseChange {
        debug_assert_eq!(self.phase, Phase::VotingSessionEnded);
        self.step()
    }

    fn step(&mut self) -> PhaseChange {
        let previous = self.phase;
        // Callers have already pinned `previous` to a non-terminal phase.
        let new = previous.next().unwrap_or(previous);
        self.phase = new;
        PhaseChange { previous, new }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn owner() -> Principal {
        Principal::new("owner")
    }

    #[test]
    fn full_forward_walk() {
        let access = AccessControl::new(owner());
        let mut workflow = Workflow::new();

        let steps = [
            Transition::StartProposalsRegistering,
            Transition::EndProposalsRegistering,
            Transition::StartVotingSession,
            Transition::EndVotingSession,
        ];
        for (i, transition) in steps.into_iter().enumerate() {
            let change = workflow.advance(&access, &owner(), transition).unwrap();
            assert_eq!(change.previous.ordinal() as usize, i);
            assert_eq!(change.new.ordinal() as usize, i + 1);
        }

        assert_eq!(workflow.phase(), Phase::VotingSessionEnded);
        let change = workflow.finish_tally();
        assert_eq!(change.new, Phase::VotesTallied);
    }

    #[test]
    fn repeated_transition_is_rejected() {
        let access = AccessControl::new(owner());
        let mut workflow = Workflow::new();
        workflow
            .advance(&access, &owner(), Transition::StartProposalsRegistering)
            .unwrap();

        let err = workflow
            .advance(&access, &owner(), Transition::StartProposalsRegistering)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotInPhase);
        assert_eq!(workflow.phase(), Phase::ProposalsRegistrationStarted);
    }

    #[test]
    fn skipping_ahead_is_rejected() {
        let access = AccessControl::new(owner());
        let mut workflow = Workflow::new();

        let err = workflow
            .advance(&access, &owner(), Transition::StartVotingSession)
            .unwrap_err();
        assert_eq!(
            err,
            Error::NotInPhase {
                operation: "start_voting_session",
                required: Phase::ProposalsRegistrationEnded,
                current: Phase::RegisteringVoters,
            }
        );
        assert_eq!(workflow.phase(), Phase::RegisteringVoters);
    }

    #[test]
    fn caller_is_checked_before_phase() {
        let access = AccessControl::new(owner());
        let mut workflow = Workflow::new();

        // Wrong caller and wrong phase at once: authorization wins.
        let err = workflow
            .advance(&access, &Principal::new("mallory"), Transition::EndVotingSession)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(workflow.phase(), Phase::RegisteringVoters);
    }
}
