//! The vote ledger.
//!
//! A vote touches two records: the voter's participant entry and the target
//! proposal's counter. Both are validated before either is written, so the
//! sum of all vote counts always equals the number of voters who have voted.

use crate::{Error, Participants, Principal, ProposalId, Proposals};

/// Record `voter`'s single vote for `proposal_id`.
///
/// The caller has already established that `voter` is registered and that
/// voting is open.
pub(crate) fn record_vote(
    participants: &mut Participants,
    proposals: &mut Proposals,
    voter: &Principal,
    proposal_id: ProposalId,
) -> Result<(), Error> {
    proposals.require(proposal_id)?;

    let has_voted = participants
        .get(voter)
        .map(|p| p.has_voted)
        .ok_or_else(|| Error::NotRegistered(voter.clone()))?;
    if has_voted {
        return Err(Error::AlreadyVoted(voter.clone()));
    }

    // Both lookups succeeded above; nothing below can fail.
    if let Some(participant) = participants.get_mut(voter) {
        participant.has_voted = true;
        participant.voted_proposal_id = Some(proposal_id);
    }
    if let Some(proposal) = proposals.get_mut(proposal_id) {
        proposal.vote_count += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Participants, Proposals) {
        let mut participants = Participants::new();
        participants.insert(Principal::new("alice")).unwrap();
        participants.insert(Principal::new("bob")).unwrap();

        let mut proposals = Proposals::new();
        proposals.push("Proposal One".into()).unwrap();
        proposals.push("Proposal Two".into()).unwrap();

        (participants, proposals)
    }

    #[test]
    fn vote_updates_voter_and_count() {
        let (mut participants, mut proposals) = setup();
        let alice = Principal::new("alice");

        record_vote(&mut participants, &mut proposals, &alice, 1).unwrap();

        let record = participants.get(&alice).unwrap();
        assert!(record.has_voted);
        assert_eq!(record.voted_proposal_id, Some(1));
        assert_eq!(proposals.get(1).unwrap().vote_count, 1);
        assert_eq!(proposals.total_votes(), participants.voted_count() as u64);
    }

    #[test]
    fn second_vote_leaves_counts_unchanged() {
        let (mut participants, mut proposals) = setup();
        let alice = Principal::new("alice");
        record_vote(&mut participants, &mut proposals, &alice, 1).unwrap();

        let err = record_vote(&mut participants, &mut proposals, &alice, 0).unwrap_err();
        assert_eq!(err, Error::AlreadyVoted(alice.clone()));
        assert_eq!(proposals.get(0).unwrap().vote_count, 0);
        assert_eq!(proposals.get(1).unwrap().vote_count, 1);
        assert_eq!(participants.get(&alice).unwrap().voted_proposal_id, Some(1));
    }

    #[test]
    fn unknown_proposal_touches_nothing() {
        let (mut participants, mut proposals) = setup();
        let bob = Principal::new("bob");

        let err = record_vote(&mut participants, &mut proposals, &bob, 2).unwrap_err();
        assert_eq!(err, Error::ProposalNotFound(2));
        assert!(!participants.get(&bob).unwrap().has_voted);
        assert_eq!(proposals.total_votes(), 0);
    }
}
