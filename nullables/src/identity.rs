//! Nullable identity collaborators: scripted wallets and credential policies.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use votedao_identity::{CredentialVerifier, EligibilityCheck, IdentityError, WalletProvider};
use votedao_types::WalletId;

/// A wallet provider that hands out pre-configured ids in order.
///
/// Once the scripted ids run out it generates `0xnull_wallet_<n>`.
pub struct NullWalletProvider {
    scripted: Mutex<VecDeque<WalletId>>,
    generated: AtomicUsize,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl NullWalletProvider {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            scripted: Mutex::new(
                ids.into_iter()
                    .map(|s| WalletId::parse(s.as_ref()).expect("scripted wallet id must be valid"))
                    .collect(),
            ),
            generated: AtomicUsize::new(0),
            failure: None,
            delay: None,
        }
    }

    /// Generated ids only.
    pub fn sequential() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Every handshake fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::sequential()
        }
    }

    /// Block for `delay` before answering (to exercise timeouts).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl WalletProvider for NullWalletProvider {
    fn name(&self) -> &str {
        "null-wallet"
    }

    fn connect(&self) -> Result<WalletId, IdentityError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if let Some(ref message) = self.failure {
            return Err(IdentityError::Connection(message.clone()));
        }
        if let Some(id) = self.scripted.lock().unwrap().pop_front() {
            return Ok(id);
        }
        let n = self.generated.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(WalletId::parse(format!("0xnull_wallet_{n}")).expect("generated id is valid"))
    }
}

/// A credential verifier with a fixed answer set. Counts its calls.
pub struct NullCredentialVerifier {
    accepted: Option<HashSet<String>>,
    accept_everything: bool,
    calls: AtomicUsize,
}

impl NullCredentialVerifier {
    pub fn accept_all() -> Self {
        Self {
            accepted: None,
            accept_everything: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn reject_all() -> Self {
        Self {
            accepted: None,
            accept_everything: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Accept exactly the listed credentials.
    pub fn accepting<I, S>(credentials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted: Some(credentials.into_iter().map(Into::into).collect()),
            accept_everything: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `verify` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CredentialVerifier for NullCredentialVerifier {
    fn name(&self) -> &str {
        "null-verifier"
    }

    fn verify(&self, _wallet: &WalletId, credential: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.accept_everything {
            return true;
        }
        self.accepted
            .as_ref()
            .is_some_and(|set| set.contains(credential))
    }
}

/// An eligibility list controlled directly by the test.
#[derive(Default)]
pub struct NullEligibility {
    eligible: Mutex<HashSet<WalletId>>,
}

impl NullEligibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `wallet` as verified.
    pub fn allow(&self, wallet: &WalletId) {
        self.eligible.lock().unwrap().insert(wallet.clone());
    }
}

impl EligibilityCheck for NullEligibility {
    fn is_eligible(&self, wallet: &WalletId) -> bool {
        self.eligible.lock().unwrap().contains(wallet)
    }
}
