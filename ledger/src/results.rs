//! Leaderboard standings over a tally.
//!
//! Ordering is a presentation concern: a stable sort descending by votes,
//! ties keeping candidate-definition order.

use serde::Serialize;
use votedao_types::Candidate;

use crate::tally::TallyBoard;

/// One row of the results page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// 1-based rank on the leaderboard.
    pub rank: u32,
    pub candidate: Candidate,
    pub votes: u64,
    /// Share of all votes in basis points (10_000 = 100%), rounded half up.
    pub share_bps: u32,
    /// The share as a percentage with one decimal, e.g. `"45.2%"`.
    pub share: String,
}

/// Build the leaderboard for `candidates` from `tally`.
///
/// Candidates missing from the tally count as zero.
pub fn standings(candidates: &[Candidate], tally: &TallyBoard) -> Vec<Standing> {
    let total = tally.total();
    let mut rows: Vec<(Candidate, u64)> = candidates
        .iter()
        .map(|c| (c.clone(), tally.count(&c.id).unwrap_or(0)))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    rows.into_iter()
        .enumerate()
        .map(|(i, (candidate, votes))| Standing {
            rank: i as u32 + 1,
            candidate,
            votes,
            share_bps: share_bps(votes, total),
            share: format_share(votes, total),
        })
        .collect()
}

/// `votes / total` scaled by `scale`, rounded half up. Zero when `total` is.
fn scaled_share(votes: u64, total: u64, scale: u128) -> u128 {
    if total == 0 {
        return 0;
    }
    (votes as u128 * scale * 2 + total as u128) / (2 * total as u128)
}

fn share_bps(votes: u64, total: u64) -> u32 {
    scaled_share(votes, total, 10_000) as u32
}

/// `votes` out of `total` as a percentage with one decimal, rounded once
/// from the exact ratio (`9049` of `20000` → `"45.2%"`).
pub fn format_share(votes: u64, total: u64) -> String {
    let tenths = scaled_share(votes, total, 1_000);
    format!("{}.{}%", tenths / 10, tenths % 10)
}
