//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use votedao_identity::IdentityError;
use votedao_ledger::LedgerError;
use votedao_types::IdError;
use votedao_workflow::WorkflowError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("no vote recorded for {0}")]
    RecordNotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<IdError> for RpcError {
    fn from(e: IdError) -> Self {
        RpcError::InvalidRequest(e.to_string())
    }
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Workflow(e) => match e {
                WorkflowError::Identity(IdentityError::Connection(_)) => StatusCode::BAD_GATEWAY,
                WorkflowError::Identity(IdentityError::Verification(_)) => StatusCode::BAD_REQUEST,
                WorkflowError::Ledger(LedgerError::NotEligible(_)) => StatusCode::FORBIDDEN,
                WorkflowError::Ledger(LedgerError::UnknownCandidate(_)) => StatusCode::NOT_FOUND,
                WorkflowError::Ledger(LedgerError::DuplicateVote(_))
                | WorkflowError::InvalidTransition { .. } => StatusCode::CONFLICT,
                WorkflowError::Ledger(LedgerError::Proof(_)) => StatusCode::BAD_GATEWAY,
                WorkflowError::Ledger(LedgerError::ProofTimeout(_)) => {
                    StatusCode::GATEWAY_TIMEOUT
                }
                WorkflowError::Ledger(LedgerError::Store(_) | LedgerError::InvalidElection(_)) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::SessionNotFound(_) | Self::RecordNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Workflow(e) => e.kind(),
            Self::SessionNotFound(_) => "unknown_session",
            Self::RecordNotFound(_) => "not_found",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Server(_) => "server",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Workflow(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "request failed: {self}");
        } else {
            tracing::debug!(kind = self.kind(), "request rejected: {self}");
        }
        let body = ErrorBody {
            error: self.message(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}
