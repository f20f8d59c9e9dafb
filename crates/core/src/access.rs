//! Authorization queries.
//!
//! Checks here never mutate anything; callers run them before touching state
//! so a rejected call leaves the ballot untouched.

use serde::{Deserialize, Serialize};

use crate::{Error, Participants, Principal};

/// Knows the administrator and answers who may do what.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    administrator: Principal,
}

impl AccessControl {
    /// Fix the administrator for the lifetime of the ballot.
    pub fn new(administrator: Principal) -> Self {
        Self { administrator }
    }

    pub fn administrator(&self) -> &Principal {
        &self.administrator
    }

    pub fn is_administrator(&self, caller: &Principal) -> bool {
        &self.administrator == caller
    }

    pub fn is_registered(&self, participants: &Participants, identity: &Principal) -> bool {
        participants.contains(identity)
    }

    /// Fail with [`Error::Unauthorized`] unless `caller` is the administrator.
    pub fn require_administrator(&self, caller: &Principal) -> Result<(), Error> {
        if self.is_administrator(caller) {
            Ok(())
        } else {
            Err(Error::Unauthorized(caller.clone()))
        }
    }

    /// Fail with [`Error::NotRegistered`] unless `caller` is a registered voter.
    pub fn require_registered(
        &self,
        participants: &Participants,
        caller: &Principal,
    ) -> Result<(), Error> {
        if self.is_registered(participants, caller) {
            Ok(())
        } else {
            Err(Error::NotRegistered(caller.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn administrator_is_fixed() {
        let access = AccessControl::new(Principal::new("owner"));
        assert!(access.is_administrator(&Principal::new("owner")));
        assert!(!access.is_administrator(&Principal::new("alice")));

        let err = access
            .require_administrator(&Principal::new("alice"))
            .unwrap_err();
        assert_eq!(err, Error::Unauthorized(Principal::new("alice")));
    }

    #[test]
    fn administrator_is_not_implicitly_a_voter() {
        let access = AccessControl::new(Principal::new("owner"));
        let mut participants = Participants::new();

        let err = access
            .require_registered(&participants, &Principal::new("owner"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotRegistered);

        participants.insert(Principal::new("owner")).unwrap();
        assert!(access.require_registered(&participants, &Principal::new("owner")).is_ok());
    }
}
