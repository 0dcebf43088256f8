//! Fundamental types for the VoteDAO election core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! wallet and candidate identifiers, candidates, voters, vote records, proof
//! tokens, timestamps and the clock abstraction.

pub mod candidate;
pub mod error;
pub mod proof;
pub mod record;
pub mod time;
pub mod voter;
pub mod wallet;

pub use candidate::{Candidate, CandidateId};
pub use error::IdError;
pub use proof::ProofToken;
pub use record::VoteRecord;
pub use time::{Clock, SystemClock, Timestamp};
pub use voter::Voter;
pub use wallet::WalletId;
