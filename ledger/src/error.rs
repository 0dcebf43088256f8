use crate::proof::ProofError;
use thiserror::Error;
use votedao_store::StoreError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("wallet {0} has already voted")]
    DuplicateVote(String),

    #[error("wallet {0} is not verified to vote")]
    NotEligible(String),

    #[error("candidate {0} does not exist")]
    UnknownCandidate(String),

    #[error("proof issuance failed: {0}")]
    Proof(#[from] ProofError),

    #[error("proof issuance timed out after {0} ms")]
    ProofTimeout(u64),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid election setup: {0}")]
    InvalidElection(String),
}
