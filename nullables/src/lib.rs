//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the election core (clock, wallet provider,
//! credential verifier, proof issuer, vote store) is abstracted behind a
//! trait. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (failures, delays)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod identity;
pub mod proof;
pub mod store;

pub use clock::NullClock;
pub use identity::{NullCredentialVerifier, NullEligibility, NullWalletProvider};
pub use proof::NullProofIssuer;
pub use store::NullVoteStore;
