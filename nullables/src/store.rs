//! Nullable store: thread-safe in-memory vote storage for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use votedao_store::{StoreError, VoteStore};
use votedao_types::{VoteRecord, WalletId};

/// An in-memory vote store. Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullVoteStore {
    records: Mutex<HashMap<WalletId, VoteRecord>>,
    fail_saves: AtomicBool,
}

impl NullVoteStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Pre-populate with records, bypassing the duplicate check.
    pub fn with_records(records: impl IntoIterator<Item = VoteRecord>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.lock().unwrap();
            for r in records {
                map.insert(r.voter.clone(), r);
            }
        }
        store
    }

    /// Make subsequent saves fail with a backend error (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl Default for NullVoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VoteStore for NullVoteStore {
    fn save(&self, record: &VoteRecord) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.voter) {
            return Err(StoreError::Duplicate(record.voter.to_string()));
        }
        records.insert(record.voter.clone(), record.clone());
        Ok(())
    }

    fn load(&self, wallet: &WalletId) -> Result<Option<VoteRecord>, StoreError> {
        Ok(self.records.lock().unwrap().get(wallet).cloned())
    }

    fn load_all(&self) -> Result<Vec<VoteRecord>, StoreError> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        Ok(self.records.lock().unwrap().len() as u64)
    }
}
