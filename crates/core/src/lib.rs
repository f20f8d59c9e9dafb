//! phasevote-core: a governed, phased voting engine.
//!
//! A fixed administrator registers voters and walks the ballot through six
//! ordered phases; registered voters propose options and cast one vote each;
//! the tally picks the first proposal holding the highest count.
//!
//! - `Ballot`: the owned aggregate every operation runs against
//! - `SharedBallot`: a handle that serializes access from many threads
//! - `Event`: notifications emitted on each accepted change

mod principal;
mod phase;
mod access;
mod workflow;
mod participants;
mod proposals;
mod ledger;
mod tally;
mod event;
mod engine;
mod shared;
mod snapshot;
mod error;
pub mod config;
pub mod genesis;

pub use principal::Principal;
pub use phase::Phase;
pub use access::AccessControl;
pub use workflow::{PhaseChange, Transition, Workflow};
pub use participants::{Participant, Participants};
pub use proposals::{Proposal, ProposalId, Proposals};
pub use tally::winning_proposal;
pub use event::{Event, EventRecorder, EventSink, TracingSink};
pub use engine::{Ballot, Outcome};
pub use shared::SharedBallot;
pub use snapshot::Digest;
pub use error::{Error, ErrorKind};
pub use config::BallotConfig;
pub use genesis::Genesis;
