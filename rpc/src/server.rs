//! Axum-based HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};
use votedao_identity::IdentityGate;
use votedao_ledger::VoteLedger;
use votedao_types::{Clock, SystemClock};

use crate::error::RpcError;
use crate::handlers;
use crate::metrics::RpcMetrics;
use crate::sessions::SessionRegistry;

/// Bounds on the external calls made while serving a request.
#[derive(Clone, Copy, Debug)]
pub struct RpcLimits {
    pub connect_timeout: Duration,
    pub proof_timeout: Duration,
    /// Sessions untouched for this long are dropped and their wallets disconnected.
    pub session_idle_ttl: Duration,
}

impl Default for RpcLimits {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            proof_timeout: Duration::from_secs(30),
            session_idle_ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// Shared state behind every handler.
pub struct AppState {
    pub election_name: String,
    pub gate: Arc<IdentityGate>,
    pub ledger: Arc<VoteLedger>,
    pub sessions: SessionRegistry,
    pub metrics: RpcMetrics,
    pub limits: RpcLimits,
}

impl AppState {
    pub fn new(
        election_name: impl Into<String>,
        gate: Arc<IdentityGate>,
        ledger: Arc<VoteLedger>,
        limits: RpcLimits,
    ) -> Self {
        Self {
            election_name: election_name.into(),
            gate,
            ledger,
            sessions: SessionRegistry::new(limits.session_idle_ttl, Arc::new(SystemClock)),
            metrics: RpcMetrics::new(),
            limits,
        }
    }

    /// Measure session idleness against `clock` instead of the system time.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.sessions = SessionRegistry::new(self.limits.session_idle_ttl, clock);
        self
    }

    /// Drop idle sessions and disconnect their wallets. Returns how many went.
    pub async fn sweep_sessions(&self) -> usize {
        let expired = self.sessions.remove_expired();
        if expired.is_empty() {
            return 0;
        }
        for shared in &expired {
            let wallet = shared.lock().await.wallet().cloned();
            if let Some(wallet) = wallet {
                self.gate.disconnect(&wallet);
            }
        }
        self.metrics.active_sessions.set(self.sessions.len() as i64);
        info!(expired = expired.len(), "idle sessions dropped");
        expired.len()
    }
}

/// Sweep idle sessions a few times per TTL until the task is aborted.
async fn sweep_idle_sessions(state: Arc<AppState>) {
    let period = (state.limits.session_idle_ttl / 4).max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let dropped = state.sweep_sessions().await;
        debug!(dropped, remaining = state.sessions.len(), "session sweep");
    }
}

/// Every route of the API.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::end_session),
        )
        .route("/sessions/:id/verify", post(handlers::verify))
        .route("/sessions/:id/ballot", post(handlers::enter_ballot))
        .route("/sessions/:id/select", post(handlers::select))
        .route("/sessions/:id/cancel", post(handlers::cancel))
        .route("/sessions/:id/confirm", post(handlers::confirm))
        .route("/votes", post(handlers::cast_vote))
        .route("/candidates", get(handlers::candidates))
        .route("/tally", get(handlers::tally))
        .route("/results", get(handlers::results))
        .route("/audit", get(handlers::audit))
        .route("/records/:wallet", get(handlers::record))
        .route("/metrics", get(handlers::metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct RpcServer {
    pub port: u16,
    state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(port: u16, state: Arc<AppState>) -> Self {
        Self { port, state }
    }

    /// Serve until `shutdown` resolves.
    pub async fn start<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let state = self.state;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        info!(%addr, "RPC server listening");
        let sweeper = tokio::spawn(sweep_idle_sessions(Arc::clone(&state)));
        let served = axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()));
        sweeper.abort();
        served?;
        info!("RPC server stopped");
        Ok(())
    }
}
