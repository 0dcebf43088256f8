use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use votedao_identity::IdentityGate;
use votedao_ledger::VoteLedger;
use votedao_nullables::{
    NullClock, NullCredentialVerifier, NullProofIssuer, NullVoteStore, NullWalletProvider,
};
use votedao_rpc::{router, AppState, RpcLimits};
use votedao_types::Candidate;

const CREDENTIAL: &str = "student@university.edu";

const SESSION_TTL_SECS: u64 = 60;

fn app_with(issuer: Arc<NullProofIssuer>, clock: Arc<NullClock>) -> (Router, Arc<AppState>) {
    let gate = Arc::new(IdentityGate::new(
        Arc::new(NullWalletProvider::sequential()),
        Arc::new(NullCredentialVerifier::accepting([CREDENTIAL])),
        clock.clone(),
    ));
    let ledger = Arc::new(
        VoteLedger::open(
            Candidate::campus_defaults(),
            gate.clone(),
            Arc::new(NullVoteStore::new()),
            issuer,
            clock.clone(),
        )
        .unwrap(),
    );
    let limits = RpcLimits {
        connect_timeout: Duration::from_secs(5),
        proof_timeout: Duration::from_millis(100),
        session_idle_ttl: Duration::from_secs(SESSION_TTL_SECS),
    };
    let state = Arc::new(
        AppState::new("Student Council 2024", gate, ledger, limits).with_clock(clock),
    );
    (router(state.clone()), state)
}

fn app() -> (Router, Arc<AppState>) {
    app_with(
        Arc::new(NullProofIssuer::new()),
        Arc::new(NullClock::new(1_700_000_000)),
    )
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

async fn open_ballot(app: &Router) -> String {
    let (status, body) = call(app, Method::POST, "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["session_id"].as_str().unwrap().to_string();

    let (status, _) = call(
        app,
        Method::POST,
        &format!("/sessions/{id}/verify"),
        Some(json!({ "credential": CREDENTIAL })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(app, Method::POST, &format!("/sessions/{id}/ballot"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "browsing");
    id
}

#[tokio::test]
async fn session_walks_through_the_election() {
    let (app, state) = app();

    let (status, body) = call(&app, Method::POST, "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["state"], "wallet_connected");
    assert_eq!(body["wallet"], "0xnull_wallet_1");
    let id = body["session_id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/verify"),
        Some(json!({ "credential": CREDENTIAL })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "verified");

    call(&app, Method::POST, &format!("/sessions/{id}/ballot"), None).await;
    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/select"),
        Some(json!({ "candidate_id": "candidate3" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "confirming_choice");
    assert_eq!(body["candidate"], "candidate3");

    let (status, body) = call(&app, Method::POST, &format!("/sessions/{id}/confirm"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "vote_submitted");
    assert_eq!(body["record"]["candidate_id"], "candidate3");
    assert_eq!(body["record"]["proof_token"], "0xproof0001");

    let (_, tally) = call(&app, Method::GET, "/tally", None).await;
    assert_eq!(tally["total"], 1);
    assert_eq!(tally["election"], "Student Council 2024");

    let (_, results) = call(&app, Method::GET, "/results", None).await;
    assert_eq!(results["standings"][0]["candidate"]["id"], "candidate3");
    assert_eq!(results["standings"][0]["share"], "100.0%");

    let (status, record) = call(&app, Method::GET, "/records/0xnull_wallet_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["candidate_id"], "candidate3");

    assert_eq!(state.metrics.votes_cast.get(), 1);
    assert_eq!(state.metrics.sessions_created.get(), 1);
}

#[tokio::test]
async fn one_shot_vote_endpoint() {
    let (app, _) = app();
    let id = open_ballot(&app).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/votes",
        Some(json!({ "session_id": id, "candidate_id": "candidate1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "vote_submitted");

    let (status, body) = call(
        &app,
        Method::POST,
        "/votes",
        Some(json!({ "session_id": id, "candidate_id": "candidate2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_transition");
}

#[tokio::test]
async fn error_responses_carry_kind_and_message() {
    let (app, state) = app();

    let (status, body) = call(&app, Method::GET, "/sessions/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "unknown_session");

    let (_, body) = call(&app, Method::POST, "/sessions", None).await;
    let id = body["session_id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/verify"),
        Some(json!({ "credential": "me@gmail.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "verification");
    assert_eq!(body["error"], "Verification failed. Please check your credentials.");
    assert_eq!(state.metrics.verifications_failed.get(), 1);

    let (status, body) = call(&app, Method::POST, &format!("/sessions/{id}/confirm"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_transition");

    let id = open_ballot(&app).await;
    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/select"),
        Some(json!({ "candidate_id": "candidate9" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "unknown_candidate");

    let (status, body) = call(&app, Method::GET, "/records/0xnobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn slow_proof_returns_gateway_timeout() {
    let issuer = Arc::new(NullProofIssuer::new().with_delay(Duration::from_millis(400)));
    let (app, state) = app_with(issuer, Arc::new(NullClock::new(1_700_000_000)));
    let id = open_ballot(&app).await;
    call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/select"),
        Some(json!({ "candidate_id": "candidate2" })),
    )
    .await;

    let (status, body) = call(&app, Method::POST, &format!("/sessions/{id}/confirm"), None).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["kind"], "timeout");

    // The stepwise flow keeps the choice so the voter can confirm again.
    let (_, session) = call(&app, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(session["state"], "confirming_choice");
    assert_eq!(state.ledger.tally().total(), 0);
    assert_eq!(state.metrics.votes_rejected.get(), 1);
}

#[tokio::test]
async fn one_shot_vote_can_be_retried_after_timeout() {
    let issuer = Arc::new(NullProofIssuer::new().with_delay(Duration::from_millis(400)));
    let (app, state) = app_with(issuer.clone(), Arc::new(NullClock::new(1_700_000_000)));
    let id = open_ballot(&app).await;
    let vote = json!({ "session_id": id, "candidate_id": "candidate2" });

    let (status, body) = call(&app, Method::POST, "/votes", Some(vote.clone())).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["kind"], "timeout");
    let (_, session) = call(&app, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(session["state"], "browsing");

    issuer.set_delay(Duration::ZERO);
    let (status, body) = call(&app, Method::POST, "/votes", Some(vote)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "vote_submitted");
    assert_eq!(body["record"]["candidate_id"], "candidate2");
    assert_eq!(state.ledger.tally().total(), 1);
    assert_eq!(state.metrics.votes_rejected.get(), 1);
    assert_eq!(state.metrics.votes_cast.get(), 1);
}

#[tokio::test]
async fn one_shot_vote_accepts_a_pending_selection() {
    let (app, state) = app();
    let id = open_ballot(&app).await;
    call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/select"),
        Some(json!({ "candidate_id": "candidate1" })),
    )
    .await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/votes",
        Some(json!({ "session_id": id, "candidate_id": "candidate1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "vote_submitted");
    assert_eq!(state.ledger.tally().total(), 1);
}

#[tokio::test]
async fn idle_sessions_expire() {
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let (app, state) = app_with(Arc::new(NullProofIssuer::new()), clock.clone());
    let idle = open_ballot(&app).await;
    let (_, body) = call(&app, Method::POST, "/sessions", None).await;
    let active = body["session_id"].as_str().unwrap().to_string();
    assert_eq!(state.gate.connected_count(), 2);

    clock.advance(SESSION_TTL_SECS / 2);
    let (status, _) = call(&app, Method::GET, &format!("/sessions/{active}"), None).await;
    assert_eq!(status, StatusCode::OK);
    clock.advance(SESSION_TTL_SECS / 2);

    let (status, body) = call(&app, Method::GET, &format!("/sessions/{idle}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "unknown_session");
    let (status, _) = call(
        &app,
        Method::POST,
        "/votes",
        Some(json!({ "session_id": idle, "candidate_id": "candidate1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(state.sweep_sessions().await, 1);
    assert_eq!(state.sessions.len(), 1);
    assert_eq!(state.metrics.active_sessions.get(), 1);
    assert_eq!(state.gate.connected_count(), 1);
    let (status, _) = call(&app, Method::GET, &format!("/sessions/{active}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn opening_a_session_sweeps_idle_ones() {
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let (app, state) = app_with(Arc::new(NullProofIssuer::new()), clock.clone());
    open_ballot(&app).await;
    open_ballot(&app).await;

    clock.advance(SESSION_TTL_SECS);
    let (status, _) = call(&app, Method::POST, "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(state.sessions.len(), 1);
    assert_eq!(state.gate.connected_count(), 1);
}

#[tokio::test]
async fn failed_wallet_connection_registers_nothing() {
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let gate = Arc::new(IdentityGate::new(
        Arc::new(NullWalletProvider::failing("wallet extension not installed")),
        Arc::new(NullCredentialVerifier::accept_all()),
        clock.clone(),
    ));
    let ledger = Arc::new(
        VoteLedger::open(
            Candidate::campus_defaults(),
            gate.clone(),
            Arc::new(NullVoteStore::new()),
            Arc::new(NullProofIssuer::new()),
            clock,
        )
        .unwrap(),
    );
    let state = Arc::new(AppState::new("Student Council 2024", gate, ledger, RpcLimits::default()));
    let app = router(state.clone());

    let (status, body) = call(&app, Method::POST, "/sessions", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
    assert!(state.sessions.is_empty());
    assert_eq!(state.gate.connected_count(), 0);
    assert_eq!(state.metrics.sessions_created.get(), 0);
}

#[tokio::test]
async fn cancel_and_end_session() {
    let (app, state) = app();
    let id = open_ballot(&app).await;

    call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/select"),
        Some(json!({ "candidate_id": "candidate4" })),
    )
    .await;
    let (status, body) = call(&app, Method::POST, &format!("/sessions/{id}/cancel"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "browsing");

    assert_eq!(state.sessions.len(), 1);
    let (status, _) = call(&app, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.sessions.is_empty());
    assert_eq!(state.metrics.active_sessions.get(), 0);
    assert_eq!(state.gate.connected_count(), 0);

    let (status, _) = call(&app, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn read_only_views() {
    let (app, _) = app();

    let (status, candidates) = call(&app, Method::GET, "/candidates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(candidates.as_array().unwrap().len(), 4);
    assert_eq!(candidates[0]["name"], "Sarah Chen");

    let (_, audit) = call(&app, Method::GET, "/audit", None).await;
    assert_eq!(audit, json!([]));

    let (_, results) = call(&app, Method::GET, "/results", None).await;
    assert_eq!(results["total_votes"], 0);
    assert_eq!(results["standings"][0]["share"], "0.0%");

    let (status, metrics) = call(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(metrics.as_str().unwrap().contains("votedao_votes_cast_total"));
}
