//! Vote records.

use crate::{CandidateId, ProofToken, Timestamp, WalletId};
use serde::{Deserialize, Serialize};

/// Immutable evidence that a voter cast a specific choice.
///
/// At most one record exists per `voter`; records are never edited or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub candidate_id: CandidateId,
    pub voter: WalletId,
    pub proof_token: ProofToken,
    pub cast_at: Timestamp,
}
