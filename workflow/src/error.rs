use thiserror::Error;
use votedao_identity::IdentityError;
use votedao_ledger::LedgerError;

use crate::state::WorkflowEvent;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("{event} is not allowed in state {state}")]
    InvalidTransition {
        state: &'static str,
        event: WorkflowEvent,
    },
}

impl WorkflowError {
    /// Short machine-readable kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Identity(IdentityError::Connection(_)) => "connection",
            Self::Identity(IdentityError::Verification(_)) => "verification",
            Self::Ledger(LedgerError::DuplicateVote(_)) => "duplicate_vote",
            Self::Ledger(LedgerError::NotEligible(_)) => "not_eligible",
            Self::Ledger(LedgerError::UnknownCandidate(_)) => "unknown_candidate",
            Self::Ledger(LedgerError::Proof(_)) => "proof",
            Self::Ledger(LedgerError::ProofTimeout(_)) => "timeout",
            Self::Ledger(LedgerError::Store(_)) => "storage",
            Self::Ledger(LedgerError::InvalidElection(_)) => "invalid_election",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }

    /// The notification shown to the voter.
    pub fn user_message(&self) -> String {
        match self {
            Self::Identity(IdentityError::Connection(_)) => "Failed to connect wallet".into(),
            Self::Identity(IdentityError::Verification(_)) => {
                "Verification failed. Please check your credentials.".into()
            }
            Self::Ledger(LedgerError::DuplicateVote(_)) => "You have already voted".into(),
            Self::Ledger(LedgerError::NotEligible(_)) => {
                "Your wallet is not verified to vote".into()
            }
            Self::Ledger(LedgerError::UnknownCandidate(id)) => format!("Unknown candidate {id}"),
            Self::Ledger(LedgerError::ProofTimeout(_)) => {
                "Transaction timed out, please try again".into()
            }
            Self::Ledger(LedgerError::Proof(_) | LedgerError::Store(_)) => {
                "Transaction failed".into()
            }
            Self::Ledger(LedgerError::InvalidElection(_)) => "The election is unavailable".into(),
            Self::InvalidTransition { .. } => "That action is not available right now".into(),
        }
    }
}
