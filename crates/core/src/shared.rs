//! A thread-safe handle that serializes every operation on one ballot.
//!
//! Mutations hold the write lock while they run, then downgrade it to a read
//! lock for event delivery, so no other mutation can commit before every sink
//! has seen the events and sinks observe them in commit order. Reads take the
//! lock recursively, which lets a sink query the ballot it is subscribed to,
//! and hand back owned copies.

use parking_lot::{RwLock, RwLockWriteGuard};
use std::sync::Arc;

use crate::{
    Ballot, Digest, Error, EventSink, Outcome, Participant, Phase, Principal, Proposal,
    ProposalId, Transition,
};

struct Inner {
    ballot: Ballot,
    sinks: Vec<Arc<dyn EventSink>>,
}

#[derive(Clone)]
pub struct SharedBallot {
    inner: Arc<RwLock<Inner>>,
}

impl SharedBallot {
    pub fn new(ballot: Ballot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                ballot,
                sinks: Vec::new(),
            })),
        }
    }

    /// Attach an observer. It only sees events committed after this call.
    /// Must not be called from inside a sink's `deliver`.
    pub fn subscribe(&self, sink: Arc<dyn EventSink>) {
        self.inner.write().sinks.push(sink);
    }

    pub fn register_voter(&self, caller: &Principal, voter: Principal) -> Result<Outcome<()>, Error> {
        self.mutate(|ballot| ballot.register_voter(caller, voter))
    }

    pub fn advance(&self, caller: &Principal, transition: Transition) -> Result<Outcome<Phase>, Error> {
        self.mutate(|ballot| ballot.advance(caller, transition))
    }

    pub fn add_proposal(
        &self,
        caller: &Principal,
        description: impl Into<String>,
    ) -> Result<Outcome<ProposalId>, Error> {
        self.mutate(|ballot| ballot.add_proposal(caller, description))
    }

    pub fn cast_vote(&self, caller: &Principal, proposal_id: ProposalId) -> Result<Outcome<()>, Error> {
        self.mutate(|ballot| ballot.cast_vote(caller, proposal_id))
    }

    pub fn tally_votes(&self, caller: &Principal) -> Result<Outcome<ProposalId>, Error> {
        self.mutate(|ballot| ballot.tally_votes(caller))
    }

    pub fn phase(&self) -> Phase {
        self.inner.read_recursive().ballot.phase()
    }

    pub fn winning_proposal(&self) -> Option<ProposalId> {
        self.inner.read_recursive().ballot.winning_proposal()
    }

    pub fn participant(&self, caller: &Principal, voter: &Principal) -> Result<Participant, Error> {
        self.inner.read_recursive().ballot.participant(caller, voter)
    }

    pub fn proposal(&self, caller: &Principal, proposal_id: ProposalId) -> Result<Proposal, Error> {
        self.inner.read_recursive().ballot.proposal(caller, proposal_id).cloned()
    }

    pub fn digest(&self) -> Result<Digest, Error> {
        self.inner.read_recursive().ballot.digest()
    }

    /// A consistent copy of the whole ballot.
    pub fn to_ballot(&self) -> Ballot {
        self.inner.read_recursive().ballot.clone()
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Ballot) -> Result<Outcome<T>, Error>,
    ) -> Result<Outcome<T>, Error> {
        let mut inner = self.inner.write();
        let outcome = op(&mut inner.ballot)?;
        let inner = RwLockWriteGuard::downgrade(inner);
        for event in &outcome.events {
            for sink in &inner.sinks {
                sink.deliver(event);
            }
        }
        Ok(outcome)
    }
}

impl From<Ballot> for SharedBallot {
    fn from(ballot: Ballot) -> Self {
        Self::new(ballot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Event, EventRecorder};
    use parking_lot::Mutex;
    use std::thread;

    /// Records the phase it reads back from the ballot on every delivery.
    #[derive(Default)]
    struct PhaseWatcher {
        ballot: Mutex<Option<SharedBallot>>,
        seen: Mutex<Vec<Phase>>,
    }

    impl EventSink for PhaseWatcher {
        fn deliver(&self, _event: &Event) {
            if let Some(ballot) = self.ballot.lock().as_ref() {
                self.seen.lock().push(ballot.phase());
            }
        }
    }

    fn owner() -> Principal {
        Principal::new("owner")
    }

    #[test]
    fn sinks_see_committed_events() {
        let shared = SharedBallot::new(Ballot::new(owner()));
        let recorder = Arc::new(EventRecorder::new());
        shared.subscribe(recorder.clone());

        shared.register_voter(&owner(), Principal::new("alice")).unwrap();
        assert!(shared.register_voter(&owner(), Principal::new("alice")).is_err());
        shared
            .advance(&owner(), Transition::StartProposalsRegistering)
            .unwrap();

        assert_eq!(
            recorder.events(),
            vec![
                Event::VoterRegistered {
                    voter_address: Principal::new("alice")
                },
                Event::WorkflowStatusChange {
                    previous_status: Phase::RegisteringVoters,
                    new_status: Phase::ProposalsRegistrationStarted,
                },
            ]
        );
    }

    #[test]
    fn sink_can_read_the_ballot_it_watches() {
        let shared = SharedBallot::new(Ballot::new(owner()));
        let watcher = Arc::new(PhaseWatcher::default());
        *watcher.ballot.lock() = Some(shared.clone());
        shared.subscribe(watcher.clone());

        shared.register_voter(&owner(), Principal::new("alice")).unwrap();
        shared
            .advance(&owner(), Transition::StartProposalsRegistering)
            .unwrap();

        assert_eq!(
            *watcher.seen.lock(),
            vec![Phase::RegisteringVoters, Phase::ProposalsRegistrationStarted]
        );
        // Break the handle cycle.
        watcher.ballot.lock().take();
    }

    #[test]
    fn concurrent_votes_are_counted_once_each() {
        let mut ballot = Ballot::new(owner());
        let voters: Vec<Principal> = (0..16).map(|i| Principal::new(format!("voter-{i}"))).collect();
        for voter in &voters {
            ballot.register_voter(&owner(), voter.clone()).unwrap();
        }
        ballot.start_proposals_registering(&owner()).unwrap();
        ballot.add_proposal(&voters[0], "only option").unwrap();
        ballot.end_proposals_registering(&owner()).unwrap();
        ballot.start_voting_session(&owner()).unwrap();

        let shared = SharedBallot::new(ballot);
        let handles: Vec<_> = voters
            .iter()
            .cloned()
            .map(|voter| {
                let shared = shared.clone();
                thread::spawn(move || {
                    // Only the first attempt may be accepted.
                    let first = shared.cast_vote(&voter, 0).is_ok();
                    let second = shared.cast_vote(&voter, 0).is_ok();
                    first as u32 + second as u32
                })
            })
            .collect();

        let accepted: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 16);
        assert_eq!(shared.proposal(&voters[0], 0).unwrap().vote_count, 16);
    }
}
