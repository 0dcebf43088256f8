//! In-memory registry of voter sessions.
//!
//! Sessions that sit idle longer than the registry's TTL stop resolving
//! and are handed back by [`SessionRegistry::remove_expired`] so their
//! wallets can be disconnected.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::Mutex;
use votedao_types::{Clock, Timestamp};
use votedao_workflow::ElectionWorkflow;

/// One workflow per session; the async mutex serializes a session's
/// transitions while different sessions proceed in parallel.
pub type SharedWorkflow = Arc<Mutex<ElectionWorkflow>>;

struct SessionEntry {
    workflow: SharedWorkflow,
    /// Epoch seconds of the last lookup.
    touched: AtomicU64,
}

impl SessionEntry {
    fn idle_for(&self, now: Timestamp) -> u64 {
        Timestamp::new(self.touched.load(Ordering::Relaxed)).elapsed_since(now)
    }
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    idle_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
            clock,
        }
    }

    /// Store `workflow` under `id` (see [`new_session_id`]).
    pub fn insert(&self, id: String, workflow: ElectionWorkflow) {
        let entry = SessionEntry {
            workflow: Arc::new(Mutex::new(workflow)),
            touched: AtomicU64::new(self.clock.now().as_secs()),
        };
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, entry);
    }

    /// Look a session up and mark it active. Expired sessions are not found.
    pub fn get(&self, id: &str) -> Option<SharedWorkflow> {
        let now = self.clock.now();
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let entry = sessions.get(id)?;
        if self.expired(entry, now) {
            return None;
        }
        entry.touched.store(now.as_secs(), Ordering::Relaxed);
        Some(Arc::clone(&entry.workflow))
    }

    /// Drop a session, handing back its workflow if it existed.
    pub fn remove(&self, id: &str) -> Option<SharedWorkflow> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .map(|entry| entry.workflow)
    }

    /// Drop every session idle past the TTL, handing back their workflows.
    pub fn remove_expired(&self) -> Vec<SharedWorkflow> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, entry)| self.expired(entry, now))
            .map(|(id, _)| id.clone())
            .collect();
        expired
            .iter()
            .filter_map(|id| sessions.remove(id))
            .map(|entry| entry.workflow)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn expired(&self, entry: &SessionEntry, now: Timestamp) -> bool {
        entry.idle_for(now) >= self.idle_ttl.as_secs()
    }
}

/// 128 random bits, hex encoded.
pub fn new_session_id() -> Result<String, getrandom::Error> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes)?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique_hex() {
        let a = new_session_id().unwrap();
        let b = new_session_id().unwrap();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
