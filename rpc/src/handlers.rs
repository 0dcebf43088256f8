//! HTTP request handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use votedao_ledger::{AuditEntry, Standing, TallyEntry};
use votedao_types::{Candidate, CandidateId, VoteRecord, WalletId};
use votedao_workflow::{ElectionWorkflow, WorkflowError, WorkflowState};

use crate::error::RpcError;
use crate::server::AppState;
use crate::sessions::{new_session_id, SharedWorkflow};

type AppStateRef = State<Arc<AppState>>;

// ── Sessions ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub state: WorkflowState,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub credential: String,
}

#[derive(Deserialize)]
pub struct SelectRequest {
    pub candidate_id: String,
}

#[derive(Deserialize)]
pub struct CastVoteRequest {
    pub session_id: String,
    pub candidate_id: String,
}

fn session(state: &AppState, id: &str) -> Result<SharedWorkflow, RpcError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| RpcError::SessionNotFound(id.to_string()))
}

fn respond(id: String, workflow: &ElectionWorkflow) -> Json<SessionResponse> {
    Json(SessionResponse {
        session_id: id,
        state: workflow.state().clone(),
    })
}

pub async fn create_session(
    State(state): AppStateRef,
) -> Result<(StatusCode, Json<SessionResponse>), RpcError> {
    state.sweep_sessions().await;

    // The id comes first: once a wallet is connected nothing may fail
    // before the session holding it is registered.
    let id = new_session_id().map_err(|e| RpcError::Server(format!("session id: {e}")))?;
    let mut workflow = ElectionWorkflow::new(state.gate.clone(), state.ledger.clone());
    workflow
        .connect_wallet_within(state.limits.connect_timeout)
        .await?;
    let current = workflow.state().clone();

    state.sessions.insert(id.clone(), workflow);
    state.metrics.sessions_created.inc();
    state.metrics.active_sessions.set(state.sessions.len() as i64);
    info!(session = %id, "session opened");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: id,
            state: current,
        }),
    ))
}

pub async fn get_session(
    State(state): AppStateRef,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, RpcError> {
    let shared = session(&state, &id)?;
    let workflow = shared.lock().await;
    Ok(respond(id, &workflow))
}

pub async fn end_session(
    State(state): AppStateRef,
    Path(id): Path<String>,
) -> Result<StatusCode, RpcError> {
    let shared = state
        .sessions
        .remove(&id)
        .ok_or_else(|| RpcError::SessionNotFound(id.clone()))?;
    state.metrics.active_sessions.set(state.sessions.len() as i64);

    let wallet = shared.lock().await.wallet().cloned();
    if let Some(wallet) = wallet {
        state.gate.disconnect(&wallet);
    }
    info!(session = %id, "session ended");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn verify(
    State(state): AppStateRef,
    Path(id): Path<String>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<SessionResponse>, RpcError> {
    let shared = session(&state, &id)?;
    let mut workflow = shared.lock().await;
    if let Err(e) = workflow.submit_credential(&req.credential) {
        if !matches!(e, WorkflowError::InvalidTransition { .. }) {
            state.metrics.verifications_failed.inc();
        }
        return Err(e.into());
    }
    Ok(respond(id, &workflow))
}

pub async fn enter_ballot(
    State(state): AppStateRef,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, RpcError> {
    let shared = session(&state, &id)?;
    let mut workflow = shared.lock().await;
    workflow.enter_ballot()?;
    Ok(respond(id, &workflow))
}

pub async fn select(
    State(state): AppStateRef,
    Path(id): Path<String>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SessionResponse>, RpcError> {
    let candidate = CandidateId::parse(req.candidate_id)?;
    let shared = session(&state, &id)?;
    let mut workflow = shared.lock().await;
    workflow.select_candidate(&candidate)?;
    Ok(respond(id, &workflow))
}

pub async fn cancel(
    State(state): AppStateRef,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, RpcError> {
    let shared = session(&state, &id)?;
    let mut workflow = shared.lock().await;
    workflow.cancel()?;
    Ok(respond(id, &workflow))
}

async fn confirm_vote(state: &AppState, workflow: &mut ElectionWorkflow) -> Result<(), RpcError> {
    match workflow.confirm_within(state.limits.proof_timeout).await {
        Ok(_) => {
            state.metrics.votes_cast.inc();
            Ok(())
        }
        Err(e) => {
            state.metrics.votes_rejected.inc();
            Err(e.into())
        }
    }
}

pub async fn confirm(
    State(state): AppStateRef,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, RpcError> {
    let shared = session(&state, &id)?;
    let mut workflow = shared.lock().await;
    confirm_vote(&state, &mut workflow).await?;
    Ok(respond(id, &workflow))
}

/// Select and confirm in one request.
///
/// A failed confirmation returns the session to browsing, so the same
/// request can simply be sent again.
pub async fn cast_vote(
    State(state): AppStateRef,
    Json(req): Json<CastVoteRequest>,
) -> Result<Json<SessionResponse>, RpcError> {
    let candidate = CandidateId::parse(req.candidate_id)?;
    let shared = session(&state, &req.session_id)?;
    let mut workflow = shared.lock().await;
    let already_selected = matches!(
        workflow.state(),
        WorkflowState::ConfirmingChoice { candidate: selected, .. } if *selected == candidate
    );
    if !already_selected {
        if let Err(e) = workflow.select_candidate(&candidate) {
            state.metrics.votes_rejected.inc();
            return Err(e.into());
        }
    }
    if let Err(e) = confirm_vote(&state, &mut workflow).await {
        if workflow.cancel().is_ok() {
            info!(session = %req.session_id, "vote not cast, session back to browsing");
        }
        return Err(e);
    }
    Ok(respond(req.session_id, &workflow))
}

// ── Election views ───────────────────────────────────────────────────────

pub async fn candidates(State(state): AppStateRef) -> Json<Vec<Candidate>> {
    Json(state.ledger.candidates().to_vec())
}

#[derive(Serialize)]
pub struct TallyResponse {
    pub election: String,
    pub entries: Vec<TallyEntry>,
    pub total: u64,
}

pub async fn tally(State(state): AppStateRef) -> Json<TallyResponse> {
    let board = state.ledger.tally();
    Json(TallyResponse {
        election: state.election_name.clone(),
        total: board.total(),
        entries: board.entries().to_vec(),
    })
}

#[derive(Serialize)]
pub struct ResultsResponse {
    pub election: String,
    pub total_votes: u64,
    pub standings: Vec<Standing>,
}

pub async fn results(State(state): AppStateRef) -> Json<ResultsResponse> {
    let standings = state.ledger.standings();
    Json(ResultsResponse {
        election: state.election_name.clone(),
        total_votes: standings.iter().map(|s| s.votes).sum(),
        standings,
    })
}

pub async fn audit(State(state): AppStateRef) -> Json<Vec<AuditEntry>> {
    Json(state.ledger.audit_trail())
}

pub async fn record(
    State(state): AppStateRef,
    Path(wallet): Path<String>,
) -> Result<Json<VoteRecord>, RpcError> {
    let wallet = WalletId::parse(wallet)?;
    state
        .ledger
        .get_record(&wallet)
        .map(Json)
        .ok_or_else(|| RpcError::RecordNotFound(wallet.short()))
}

// ── Telemetry ────────────────────────────────────────────────────────────

pub async fn metrics(State(state): AppStateRef) -> Result<impl IntoResponse, RpcError> {
    let text = state
        .metrics
        .encode()
        .map_err(|e| RpcError::Server(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        text,
    ))
}
