//! Abstract storage traits for the VoteDAO election core.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The ledger depends only on the traits.

pub mod error;
pub mod vote;

pub use error::StoreError;
pub use vote::VoteStore;
