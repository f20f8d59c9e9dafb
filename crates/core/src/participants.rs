//! Voter registry.
//!
//! Append-only: records are created by the administrator while voters are
//! being registered and are never removed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Error, Principal, ProposalId};

/// A voter's public voting state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Always true for a stored record.
    pub is_registered: bool,
    pub has_voted: bool,
    /// The proposal this voter backed, once they have voted.
    pub voted_proposal_id: Option<ProposalId>,
}

impl Participant {
    /// The blank record reported for an identity that was never registered.
    pub fn unregistered() -> Self {
        Self {
            is_registered: false,
            ..Self::default()
        }
    }
}

impl Default for Participant {
    fn default() -> Self {
        Self {
            is_registered: true,
            has_voted: false,
            voted_proposal_id: None,
        }
    }
}

/// The set of registered voters, keyed by identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    voters: BTreeMap<Principal, Participant>,
}

impl Participants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, identity: &Principal) -> bool {
        self.voters.contains_key(identity)
    }

    pub fn get(&self, identity: &Principal) -> Option<&Participant> {
        self.voters.get(identity)
    }

    pub(crate) fn get_mut(&mut self, identity: &Principal) -> Option<&mut Participant> {
        self.voters.get_mut(identity)
    }

    /// Create a record with defaults. Re-registering is an error, not a no-op.
    pub fn insert(&mut self, identity: Principal) -> Result<(), Error> {
        if self.voters.contains_key(&identity) {
            return Err(Error::AlreadyRegistered(identity));
        }
        self.voters.insert(identity, Participant::default());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    /// Number of voters that have cast a vote.
    pub fn voted_count(&self) -> usize {
        self.voters.values().filter(|p| p.has_voted).count()
    }

    /// Iterate voters in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&Principal, &Participant)> {
        self.voters.iter()
    }
}
