//! LMDB storage backend for the VoteDAO election core.
//!
//! Implements the `votedao-store` traits using the `heed` LMDB bindings.
//! A single environment holds two databases: `votes` (wallet id → bincode
//! encoded record) and `meta` (schema version).

pub mod environment;
pub mod error;
pub mod integrity;
pub mod vote;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use vote::LmdbVoteStore;
