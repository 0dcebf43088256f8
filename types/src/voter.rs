//! Voter session state.

use crate::{Timestamp, WalletId};
use serde::{Deserialize, Serialize};

/// A connected voter.
///
/// Whether the voter has voted is not stored here; it is derived from the
/// ledger (a record exists for `wallet`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub wallet: WalletId,
    /// Set once, when the eligibility check succeeds.
    pub verified: bool,
    pub connected_at: Timestamp,
}

impl Voter {
    pub fn connected(wallet: WalletId, at: Timestamp) -> Self {
        Self {
            wallet,
            verified: false,
            connected_at: at,
        }
    }
}
