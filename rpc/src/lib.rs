//! HTTP/JSON API for the VoteDAO election.
//!
//! Provides endpoints for:
//! - Voter sessions driving the election workflow (connect, verify, ballot,
//!   select, confirm)
//! - Candidates, live tally and leaderboard standings
//! - The audit trail and per-voter records
//! - Prometheus metrics

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod sessions;

pub use error::RpcError;
pub use metrics::RpcMetrics;
pub use server::{router, AppState, RpcLimits, RpcServer};
pub use sessions::SessionRegistry;
