//! Snapshots and content digests of a ballot.
//!
//! The engine does not persist anything itself. Whatever stores it takes a
//! CBOR snapshot after each committed call and restores from it on restart.
//! A restored ballot must satisfy the same cross-record invariants as a live
//! one, so tampered or truncated state never becomes a ballot.

use std::fmt;

use crate::{Ballot, Error};

/// BLAKE3 digest of a ballot's state, excluding its event journal.
///
/// Displays as 64 lowercase hex characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

impl Ballot {
    /// Encode the whole ballot, journal included.
    pub fn snapshot(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)?;
        Ok(buf)
    }

    /// Rebuild a ballot from [`Ballot::snapshot`] output.
    pub fn restore(bytes: &[u8]) -> Result<Ballot, Error> {
        let ballot: Ballot = ciborium::from_reader(bytes)?;
        ballot
            .check_consistency()
            .map_err(|reason| Error::Snapshot(format!("inconsistent ballot: {reason}")))?;
        Ok(ballot)
    }

    /// Digest of the ballot's phase, registries and winner. Two ballots that
    /// differ only in their journal share a digest.
    pub fn digest(&self) -> Result<Digest, Error> {
        let mut buf = Vec::new();
        ciborium::into_writer(&self.state(), &mut buf)?;
        Ok(Digest(*blake3::hash(&buf).as_bytes()))
    }
}
