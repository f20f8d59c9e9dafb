//! Proposal registry: an ordered, append-only list where a proposal's id is
//! its insertion index.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Sequential proposal identifier, starting at 0.
pub type ProposalId = u64;

/// A named option accumulating votes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub description: String,
    pub vote_count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposals {
    entries: Vec<Proposal>,
}

impl Proposals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a proposal and return its id.
    pub fn push(&mut self, description: String) -> Result<ProposalId, Error> {
        if description.is_empty() {
            return Err(Error::EmptyProposal);
        }
        let id = self.next_id();
        self.entries.push(Proposal {
            description,
            vote_count: 0,
        });
        Ok(id)
    }

    /// The id the next appended proposal will receive.
    pub fn next_id(&self) -> ProposalId {
        self.entries.len() as ProposalId
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        usize::try_from(id).ok().and_then(|i| self.entries.get(i))
    }

    pub(crate) fn get_mut(&mut self, id: ProposalId) -> Option<&mut Proposal> {
        usize::try_from(id).ok().and_then(|i| self.entries.get_mut(i))
    }

    /// Fail with [`Error::ProposalNotFound`] if `id` is out of range.
    pub fn require(&self, id: ProposalId) -> Result<&Proposal, Error> {
        self.get(id).ok_or(Error::ProposalNotFound(id))
    }

    pub fn as_slice(&self) -> &[Proposal] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every proposal's vote count.
    pub fn total_votes(&self) -> u64 {
        self.entries.iter().map(|p| p.vote_count).sum()
    }
}
