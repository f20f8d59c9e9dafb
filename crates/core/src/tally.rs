//! Winner selection.

use crate::{Proposal, ProposalId};

/// The proposal with the strictly highest vote count.
///
/// Proposals are scanned in id order and the running best is replaced only
/// by a strictly greater count, so ties go to the lowest id. Returns `None`
/// when there are no proposals.
pub fn winning_proposal(proposals: &[Proposal]) -> Option<ProposalId> {
    let (first, rest) = proposals.split_first()?;

    let mut best_id: ProposalId = 0;
    let mut best_count = first.vote_count;
    for (offset, proposal) in rest.iter().enumerate() {
        if proposal.vote_count > best_count {
            best_id = offset as ProposalId + 1;
            best_count = proposal.vote_count;
        }
    }

    Some(best_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_counts(counts: &[u64]) -> Vec<Proposal> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &vote_count)| Proposal {
                description: format!("Proposal {i}"),
                vote_count,
            })
            .collect()
    }

    #[test]
    fn first_maximum_wins_a_tie() {
        assert_eq!(winning_proposal(&with_counts(&[3, 5, 5, 2])), Some(1));
    }

    #[test]
    fn strict_maximum_wins() {
        assert_eq!(winning_proposal(&with_counts(&[1, 0, 4])), Some(2));
    }

    #[test]
    fn no_votes_at_all_picks_the_first() {
        assert_eq!(winning_proposal(&with_counts(&[0, 0, 0])), Some(0));
    }

    #[test]
    fn nothing_to_tally() {
        assert_eq!(winning_proposal(&[]), None);
    }
}
