//! Prometheus metrics for the election API.
//!
//! [`RpcMetrics`] owns a dedicated [`Registry`] that `GET /metrics` encodes
//! into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

pub struct RpcMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Sessions opened (wallet connected).
    pub sessions_created: IntCounter,
    /// Votes committed through the API.
    pub votes_cast: IntCounter,
    /// Vote attempts that failed for any reason.
    pub votes_rejected: IntCounter,
    /// Credential submissions that did not verify.
    pub verifications_failed: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Sessions currently held in memory.
    pub active_sessions: IntGauge,
}

impl RpcMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let sessions_created = register_int_counter_with_registry!(
            Opts::new("votedao_sessions_created_total", "Total voter sessions opened"),
            registry
        )
        .expect("failed to register sessions_created counter");

        let votes_cast = register_int_counter_with_registry!(
            Opts::new("votedao_votes_cast_total", "Total votes recorded"),
            registry
        )
        .expect("failed to register votes_cast counter");

        let votes_rejected = register_int_counter_with_registry!(
            Opts::new("votedao_votes_rejected_total", "Total vote attempts rejected"),
            registry
        )
        .expect("failed to register votes_rejected counter");

        let verifications_failed = register_int_counter_with_registry!(
            Opts::new(
                "votedao_verifications_failed_total",
                "Total credential submissions that failed verification"
            ),
            registry
        )
        .expect("failed to register verifications_failed counter");

        let active_sessions = register_int_gauge_with_registry!(
            Opts::new("votedao_active_sessions", "Current number of voter sessions"),
            registry
        )
        .expect("failed to register active_sessions gauge");

        Self {
            registry,
            sessions_created,
            votes_cast,
            votes_rejected,
            verifications_failed,
            active_sessions,
        }
    }

    /// Encode every registered metric in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for RpcMetrics {
    fn default() -> Self {
        Self::new()
    }
}
