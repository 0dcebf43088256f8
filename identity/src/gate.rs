//! The identity gate: connected voters and their verification status.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, info, warn};
use votedao_types::{Clock, Voter, WalletId};

use crate::credential::CredentialVerifier;
use crate::error::IdentityError;
use crate::provider::WalletProvider;

/// Read-only view of voter eligibility, as consumed by the vote ledger.
pub trait EligibilityCheck: Send + Sync {
    /// Whether `wallet` has passed eligibility verification.
    fn is_eligible(&self, wallet: &WalletId) -> bool;
}

/// Tracks connected wallets and whether each one is verified.
pub struct IdentityGate {
    wallets: Arc<dyn WalletProvider>,
    verifier: Arc<dyn CredentialVerifier>,
    clock: Arc<dyn Clock>,
    voters: RwLock<HashMap<WalletId, Voter>>,
}

impl IdentityGate {
    pub fn new(
        wallets: Arc<dyn WalletProvider>,
        verifier: Arc<dyn CredentialVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            wallets,
            verifier,
            clock,
            voters: RwLock::new(HashMap::new()),
        }
    }

    /// Connect a wallet through the provider and register the voter.
    ///
    /// Reconnecting a wallet that is already known keeps its voter entry
    /// (and its verification status).
    pub fn connect(&self) -> Result<WalletId, IdentityError> {
        let wallet = self.wallets.connect().map_err(|e| {
            warn!(provider = self.wallets.name(), "wallet connection failed: {e}");
            e
        })?;
        self.register(wallet.clone());
        Ok(wallet)
    }

    /// Like [`connect`](Self::connect), but runs the provider handshake on the
    /// blocking pool and gives up after `limit`.
    ///
    /// A timed-out or cancelled handshake registers nothing.
    pub async fn connect_within(&self, limit: Duration) -> Result<WalletId, IdentityError> {
        let provider = Arc::clone(&self.wallets);
        let handshake = tokio::task::spawn_blocking(move || provider.connect());
        let wallet = match tokio::time::timeout(limit, handshake).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join)) => {
                return Err(IdentityError::Connection(format!("handshake aborted: {join}")))
            }
            Err(_) => {
                warn!(provider = self.wallets.name(), "wallet handshake timed out");
                return Err(IdentityError::Connection(format!(
                    "no answer from wallet provider within {} ms",
                    limit.as_millis()
                )));
            }
        };
        self.register(wallet.clone());
        Ok(wallet)
    }

    fn register(&self, wallet: WalletId) {
        let now = self.clock.now();
        let mut voters = self.voters.write().unwrap_or_else(PoisonError::into_inner);
        let fresh = !voters.contains_key(&wallet);
        voters
            .entry(wallet.clone())
            .or_insert_with(|| Voter::connected(wallet.clone(), now));
        if fresh {
            info!(wallet = %wallet.short(), "wallet connected");
        } else {
            debug!(wallet = %wallet.short(), "wallet reconnected");
        }
    }

    /// Check `credential` for a connected wallet.
    ///
    /// Idempotent: an already verified wallet returns `true` without
    /// consulting the verifier. On rejection nothing changes.
    pub fn verify_eligibility(
        &self,
        wallet: &WalletId,
        credential: &str,
    ) -> Result<bool, IdentityError> {
        match self.voter(wallet) {
            None => {
                return Err(IdentityError::Verification(format!(
                    "wallet {} is not connected",
                    wallet.short()
                )))
            }
            Some(voter) if voter.verified => return Ok(true),
            Some(_) => {}
        }

        // the verifier may be slow; do not hold the lock across it
        if !self.verifier.verify(wallet, credential) {
            warn!(
                wallet = %wallet.short(),
                policy = self.verifier.name(),
                "credential rejected"
            );
            return Err(IdentityError::Verification(
                "credential not recognised".to_string(),
            ));
        }

        let mut voters = self.voters.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(voter) = voters.get_mut(wallet) {
            voter.verified = true;
        }
        info!(wallet = %wallet.short(), "voter verified");
        Ok(true)
    }

    /// Forget a connected voter, e.g. when its session ends. A later
    /// connection starts unverified.
    pub fn disconnect(&self, wallet: &WalletId) -> bool {
        let removed = self
            .voters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(wallet)
            .is_some();
        if removed {
            debug!(wallet = %wallet.short(), "wallet disconnected");
        }
        removed
    }

    /// Whether `wallet` is connected and verified.
    pub fn is_verified(&self, wallet: &WalletId) -> bool {
        self.voter(wallet).is_some_and(|v| v.verified)
    }

    /// Snapshot of a connected voter.
    pub fn voter(&self, wallet: &WalletId) -> Option<Voter> {
        self.voters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(wallet)
            .cloned()
    }

    /// Number of connected wallets.
    pub fn connected_count(&self) -> usize {
        self.voters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl EligibilityCheck for IdentityGate {
    fn is_eligible(&self, wallet: &WalletId) -> bool {
        self.is_verified(wallet)
    }
}
