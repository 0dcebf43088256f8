//! Identity gate for the VoteDAO election.
//!
//! Two steps, each backed by a pluggable collaborator:
//! 1. **Connect**: a [`WalletProvider`] hands out the voter's wallet id.
//! 2. **Verify**: a [`CredentialVerifier`] decides whether an institutional
//!    credential (college email or student id) makes the wallet eligible.
//!
//! The gate remembers every connected voter and whether it is verified; the
//! ledger consults it through [`EligibilityCheck`] before accepting a vote.

pub mod credential;
pub mod error;
pub mod gate;
pub mod provider;

pub use credential::{CredentialVerifier, InstitutionalVerifier};
pub use error::IdentityError;
pub use gate::{EligibilityCheck, IdentityGate};
pub use provider::{RandomWalletProvider, WalletProvider};
