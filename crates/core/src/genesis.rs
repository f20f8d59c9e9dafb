//! Genesis ballot creation.
//!
//! A genesis ballot starts in `RegisteringVoters` with:
//! - The administrator fixed
//! - Optionally, an initial voter roll already registered (in order, each
//!   emitting `VoterRegistered` like a regular registration)

use crate::{Ballot, Error, Principal};

/// Parameters for creating a genesis ballot.
#[derive(Clone, Debug)]
pub struct Genesis {
    /// The administrator's identity.
    pub administrator: Principal,
    /// Voters registered before anyone else can touch the ballot.
    pub voters: Vec<Principal>,
    /// Whether the ballot retains its event journal.
    pub keep_journal: bool,
}

impl Genesis {
    pub fn new(administrator: Principal) -> Self {
        Self {
            administrator,
            voters: Vec::new(),
            keep_journal: true,
        }
    }

    pub fn with_voters(mut self, voters: impl IntoIterator<Item = Principal>) -> Self {
        self.voters.extend(voters);
        self
    }

    /// Build the ballot. A repeated voter fails with `AlreadyRegistered`.
    pub fn build(self) -> Result<Ballot, Error> {
        let mut ballot = Ballot::new(self.administrator.clone());
        ballot.set_journal(self.keep_journal);

        for voter in self.voters {
            ballot.register_voter(&self.administrator, voter)?;
        }

        tracing::debug!(
            administrator = %self.administrator,
            voters = ballot.voter_count(),
            "genesis ballot created"
        );
        Ok(ballot)
    }
}
