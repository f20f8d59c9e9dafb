//! The phasevote engine: one owned aggregate holding the workflow phase, the
//! voter and proposal registries, and the tally result.
//!
//! Every public operation takes the authenticated caller explicitly. Checks
//! run authorization first, then phase, then operation-specific preconditions,
//! and all of them run before anything is written.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ledger::record_vote;
use crate::tally::winning_proposal;
use crate::{
    AccessControl, Error, Event, Participant, Participants, Phase, Principal, Proposal,
    ProposalId, Proposals, Transition, Workflow,
};

/// What a successful mutating call produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<T> {
    /// The operation's return value.
    pub value: T,
    /// Events emitted by this call, in emission order.
    pub events: Vec<Event>,
}

/// The part of a ballot its digest covers: everything but the event journal
/// and the journal setting.
#[derive(Serialize)]
pub(crate) struct BallotState<'a> {
    access: &'a AccessControl,
    workflow: &'a Workflow,
    participants: &'a Participants,
    proposals: &'a Proposals,
    winning_proposal: Option<ProposalId>,
}

/// A single ballot from voter registration through tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    access: AccessControl,
    workflow: Workflow,
    participants: Participants,
    proposals: Proposals,
    winning_proposal: Option<ProposalId>,
    journal: Vec<Event>,
    keep_journal: bool,
}

impl Ballot {
    /// A fresh ballot in `RegisteringVoters` owned by `administrator`.
    pub fn new(administrator: Principal) -> Self {
        Self {
            access: AccessControl::new(administrator),
            workflow: Workflow::new(),
            participants: Participants::new(),
            proposals: Proposals::new(),
            winning_proposal: None,
            journal: Vec::new(),
            keep_journal: true,
        }
    }

    /// Stop (or resume) retaining emitted events in [`Ballot::events`].
    /// Outcomes carry their events either way.
    pub fn set_journal(&mut self, keep: bool) {
        self.keep_journal = keep;
    }

    // -------------------------------------------------------------------------
    // Unrestricted accessors
    // -------------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.workflow.phase()
    }

    pub fn administrator(&self) -> &Principal {
        self.access.administrator()
    }

    /// The tallied winner; `None` until `tally_votes` succeeds.
    pub fn winning_proposal(&self) -> Option<ProposalId> {
        self.winning_proposal
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    pub fn voter_count(&self) -> usize {
        self.participants.len()
    }

    /// Every event retained so far, in commit order.
    pub fn events(&self) -> &[Event] {
        &self.journal
    }

    pub fn is_administrator(&self, caller: &Principal) -> bool {
        self.access.is_administrator(caller)
    }

    pub fn is_registered(&self, identity: &Principal) -> bool {
        self.access.is_registered(&self.participants, identity)
    }

    // -------------------------------------------------------------------------
    // Registered-only reads
    // -------------------------------------------------------------------------

    /// Look up any identity's public voting state. An identity with no
    /// record reads as [`Participant::unregistered`].
    pub fn participant(&self, caller: &Principal, voter: &Principal) -> Result<Participant, Error> {
        self.access.require_registered(&self.participants, caller)?;
        Ok(self
            .participants
            .get(voter)
            .cloned()
            .unwrap_or_else(Participant::unregistered))
    }

    pub fn proposal(&self, caller: &Principal, proposal_id: ProposalId) -> Result<&Proposal, Error> {
        self.access.require_registered(&self.participants, caller)?;
        self.proposals.require(proposal_id)
    }

    /// The full proposal list in id order.
    pub fn proposals(&self, caller: &Principal) -> Result<&[Proposal], Error> {
        self.access.require_registered(&self.participants, caller)?;
        Ok(self.proposals.as_slice())
    }

    // -------------------------------------------------------------------------
    // Administrator operations
    // -------------------------------------------------------------------------

    pub fn register_voter(&mut self, caller: &Principal, voter: Principal) -> Result<Outcome<()>, Error> {
        self.commit("register_voter", caller, |ballot| {
            ballot.access.require_administrator(caller)?;
            ballot.workflow.require(Phase::RegisteringVoters, "register_voter")?;
            ballot.participants.insert(voter.clone())?;

            info!(%voter, "voter registered");
            Ok(((), vec![Event::VoterRegistered { voter_address: voter }]))
        })
    }

    pub fn start_proposals_registering(&mut self, caller: &Principal) -> Result<Outcome<Phase>, Error> {
        self.advance(caller, Transition::StartProposalsRegistering)
    }

    pub fn end_proposals_registering(&mut self, caller: &Principal) -> Result<Outcome<Phase>, Error> {
        self.advance(caller, Transition::EndProposalsRegistering)
    }

    pub fn start_voting_session(&mut self, caller: &Principal) -> Result<Outcome<Phase>, Error> {
        self.advance(caller, Transition::StartVotingSession)
    }

    pub fn end_voting_session(&mut self, caller: &Principal) -> Result<Outcome<Phase>, Error> {
        self.advance(caller, Transition::EndVotingSession)
    }

    /// Take a named forward transition; returns the new phase.
    pub fn advance(&mut self, caller: &Principal, transition: Transition) -> Result<Outcome<Phase>, Error> {
        self.commit(transition.name(), caller, |ballot| {
            let change = ballot.workflow.advance(&ballot.access, caller, transition)?;

            info!(from = %change.previous, to = %change.new, "workflow advanced");
            Ok((change.new, vec![change.into()]))
        })
    }

    /// Compute the winner and close the ballot. Runs at most once: afterwards
    /// the phase is `VotesTallied` and every further call fails `NotInPhase`.
    pub fn tally_votes(&mut self, caller: &Principal) -> Result<Outcome<ProposalId>, Error> {
        self.commit("tally_votes", caller, |ballot| {
            ballot.access.require_administrator(caller)?;
            ballot.workflow.require(Phase::VotingSessionEnded, "tally_votes")?;
            let winner =
                winning_proposal(ballot.proposals.as_slice()).ok_or(Error::ProposalNotFound(0))?;

            let change = ballot.workflow.finish_tally();
            ballot.winning_proposal = Some(winner);

            info!(winner, from = %change.previous, to = %change.new, "votes tallied");
            Ok((winner, vec![change.into()]))
        })
    }

    // -------------------------------------------------------------------------
    // Voter operations
    // -------------------------------------------------------------------------

    /// Add a proposal; returns its id.
    pub fn add_proposal(
        &mut self,
        caller: &Principal,
        description: impl Into<String>,
    ) -> Result<Outcome<ProposalId>, Error> {
        let description = description.into();
        self.commit("add_proposal", caller, |ballot| {
            ballot.access.require_registered(&ballot.participants, caller)?;
            ballot
                .workflow
                .require(Phase::ProposalsRegistrationStarted, "add_proposal")?;
            let proposal_id = ballot.proposals.push(description)?;

            info!(author = %caller, proposal_id, "proposal registered");
            Ok((proposal_id, vec![Event::ProposalRegistered { proposal_id }]))
        })
    }

    /// Cast the caller's single vote.
    pub fn cast_vote(&mut self, caller: &Principal, proposal_id: ProposalId) -> Result<Outcome<()>, Error> {
        self.commit("cast_vote", caller, |ballot| {
            ballot.access.require_registered(&ballot.participants, caller)?;
            ballot.workflow.require(Phase::VotingSessionStarted, "cast_vote")?;
            record_vote(
                &mut ballot.participants,
                &mut ballot.proposals,
                caller,
                proposal_id,
            )?;

            info!(voter = %caller, proposal_id, "vote cast");
            Ok((
                (),
                vec![Event::Voted {
                    voter: caller.clone(),
                    proposal_id,
                }],
            ))
        })
    }

    pub(crate) fn state(&self) -> BallotState<'_> {
        BallotState {
            access: &self.access,
            workflow: &self.workflow,
            participants: &self.participants,
            proposals: &self.proposals,
            winning_proposal: self.winning_proposal,
        }
    }

    /// Check the cross-record invariants every committed call preserves.
    /// Returns a description of the first violation found.
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        let phase = self.phase();
        let proposals = self.proposals.as_slice();

        if phase < Phase::ProposalsRegistrationStarted && !proposals.is_empty() {
            return Err(format!("{} proposals recorded in phase {phase}", proposals.len()));
        }
        if let Some((id, _)) = proposals
            .iter()
            .enumerate()
            .find(|(_, p)| p.description.is_empty())
        {
            return Err(format!("proposal {id} has an empty description"));
        }

        let mut backing = vec![0u64; proposals.len()];
        for (identity, record) in self.participants.iter() {
            if !record.is_registered {
                return Err(format!("voter {identity} is stored as unregistered"));
            }
            match (record.has_voted, record.voted_proposal_id) {
                (false, None) => {}
                (true, Some(id)) => match backing.get_mut(id as usize) {
                    Some(count) => *count += 1,
                    None => return Err(format!("voter {identity} backs unknown proposal {id}")),
                },
                _ => return Err(format!("voter {identity} has an inconsistent vote record")),
            }
        }
        if phase < Phase::VotingSessionStarted && backing.iter().any(|&n| n > 0) {
            return Err(format!("votes recorded in phase {phase}"));
        }
        for (id, (proposal, expected)) in proposals.iter().zip(&backing).enumerate() {
            if proposal.vote_count != *expected {
                return Err(format!(
                    "proposal {id} counts {} votes but {expected} voters back it",
                    proposal.vote_count
                ));
            }
        }

        let expected_winner = match phase {
            Phase::VotesTallied => winning_proposal(proposals),
            _ => None,
        };
        if self.winning_proposal != expected_winner {
            return Err(format!(
                "winner {:?} does not match tally {expected_winner:?} in phase {phase}",
                self.winning_proposal
            ));
        }
        Ok(())
    }

    /// Run `op`, log a rejection, and journal the events of a success.
    fn commit<T>(
        &mut self,
        operation: &'static str,
        caller: &Principal,
        op: impl FnOnce(&mut Self) -> Result<(T, Vec<Event>), Error>,
    ) -> Result<Outcome<T>, Error> {
        match op(self) {
            Ok((value, events)) => {
                if self.keep_journal {
                    self.journal.extend(events.iter().cloned());
                }
                Ok(Outcome { value, events })
            }
            Err(err) => {
                debug!(operation, %caller, kind = ?err.kind(), "rejected: {err}");
                Err(err)
            }
        }
    }
}
