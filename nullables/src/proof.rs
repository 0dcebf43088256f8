//! Nullable proof issuer: predictable tokens, scripted failures and delays.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use votedao_ledger::{ProofError, ProofIssuer, ProofRequest};
use votedao_types::ProofToken;

/// Issues `0xproof<nnnn>` tokens in sequence.
pub struct NullProofIssuer {
    issued: AtomicU64,
    failing: AtomicBool,
    delay_ms: AtomicU64,
}

impl NullProofIssuer {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            failing: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
        }
    }

    /// Block for `delay` before answering (to exercise timeouts).
    pub fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(delay);
        self
    }

    /// Change the delay for subsequent calls; zero answers at once.
    pub fn set_delay(&self, delay: Duration) {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Make subsequent calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// How many tokens were handed out.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl Default for NullProofIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProofIssuer for NullProofIssuer {
    fn name(&self) -> &str {
        "null-proof"
    }

    fn issue(&self, _request: &ProofRequest) -> Result<ProofToken, ProofError> {
        let delay_ms = self.delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProofError("transaction failed".to_string()));
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ProofToken::new(format!("0xproof{n:04}")))
    }
}
