//! Vote record storage trait.

use crate::StoreError;
use votedao_types::{VoteRecord, WalletId};

/// Persistence for vote records, keyed by voter wallet.
///
/// Implementations must refuse to overwrite an existing record: `save` for a
/// wallet that already has one fails with [`StoreError::Duplicate`].
pub trait VoteStore: Send + Sync {
    /// Persist a new record.
    fn save(&self, record: &VoteRecord) -> Result<(), StoreError>;

    /// Load the record cast by `wallet`, if any.
    fn load(&self, wallet: &WalletId) -> Result<Option<VoteRecord>, StoreError>;

    /// Load every stored record (order unspecified).
    fn load_all(&self) -> Result<Vec<VoteRecord>, StoreError>;

    /// Number of stored records.
    fn record_count(&self) -> Result<u64, StoreError> {
        self.load_all().map(|v| v.len() as u64)
    }
}
