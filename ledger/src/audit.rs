//! Audit trail: a read-only projection over the vote records.

use serde::Serialize;
use votedao_types::{CandidateId, ProofToken, Timestamp, VoteRecord};

/// One line of the audit trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    /// 1-based position in cast order.
    pub sequence: u64,
    pub proof_token: ProofToken,
    /// Shortened wallet id (`0x742d...0bEb`).
    pub voter: String,
    pub candidate_id: CandidateId,
    pub cast_at: Timestamp,
}

/// Project `records` (given in commit order) into audit entries ordered by
/// cast time, ties keeping commit order.
pub fn audit_trail(records: &[VoteRecord]) -> Vec<AuditEntry> {
    let mut sorted: Vec<&VoteRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.cast_at);
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, r)| AuditEntry {
            sequence: i as u64 + 1,
            proof_token: r.proof_token.clone(),
            voter: r.voter.short(),
            candidate_id: r.candidate_id.clone(),
            cast_at: r.cast_at,
        })
        .collect()
}
