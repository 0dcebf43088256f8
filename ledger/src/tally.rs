//! Per-candidate vote counts.

use serde::Serialize;
use votedao_types::CandidateId;

/// One candidate's count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TallyEntry {
    pub candidate_id: CandidateId,
    pub votes: u64,
}

/// Vote counts in candidate-definition order.
///
/// Only the ledger can increment counts; everyone else sees snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TallyBoard {
    entries: Vec<TallyEntry>,
}

impl TallyBoard {
    /// A zeroed board for the given candidates, keeping their order.
    pub fn new(candidates: impl IntoIterator<Item = CandidateId>) -> Self {
        Self {
            entries: candidates
                .into_iter()
                .map(|candidate_id| TallyEntry {
                    candidate_id,
                    votes: 0,
                })
                .collect(),
        }
    }

    pub fn contains(&self, candidate: &CandidateId) -> bool {
        self.entries.iter().any(|e| &e.candidate_id == candidate)
    }

    /// Count for `candidate`, or `None` if it is not on the board.
    pub fn count(&self, candidate: &CandidateId) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| &e.candidate_id == candidate)
            .map(|e| e.votes)
    }

    /// Sum over all candidates.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.votes).sum()
    }

    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    /// Add one vote. Returns `false` (and changes nothing) for an unknown candidate.
    pub(crate) fn increment(&mut self, candidate: &CandidateId) -> bool {
        match self.entries.iter_mut().find(|e| &e.candidate_id == candidate) {
            Some(entry) => {
                entry.votes += 1;
                true
            }
            None => false,
        }
    }
}
