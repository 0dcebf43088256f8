//! The workflow driver.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use votedao_identity::{IdentityError, IdentityGate};
use votedao_ledger::{LedgerError, VoteLedger};
use votedao_types::{CandidateId, VoteRecord, WalletId};

use crate::error::WorkflowError;
use crate::state::{WorkflowEvent, WorkflowState};

/// Longest credential accepted (the longest possible email address).
pub const MAX_CREDENTIAL_LEN: usize = 254;

/// One voter's path through the election.
///
/// A workflow starts [`Anonymous`](WorkflowState::Anonymous) and serves a
/// single wallet; connecting another wallet means starting a new workflow.
pub struct ElectionWorkflow {
    gate: Arc<IdentityGate>,
    ledger: Arc<VoteLedger>,
    state: WorkflowState,
}

impl ElectionWorkflow {
    pub fn new(gate: Arc<IdentityGate>, ledger: Arc<VoteLedger>) -> Self {
        Self {
            gate,
            ledger,
            state: WorkflowState::Anonymous,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn wallet(&self) -> Option<&WalletId> {
        self.state.wallet()
    }

    fn invalid(&self, event: WorkflowEvent) -> WorkflowError {
        debug!(state = self.state.name(), %event, "rejected transition");
        WorkflowError::InvalidTransition {
            state: self.state.name(),
            event,
        }
    }

    fn enter(&mut self, next: WorkflowState) -> &WorkflowState {
        let prev = mem::replace(&mut self.state, next);
        debug!(from = prev.name(), to = self.state.name(), "workflow transition");
        &self.state
    }

    /// Anonymous → WalletConnected.
    pub fn connect_wallet(&mut self) -> Result<&WorkflowState, WorkflowError> {
        if self.state != WorkflowState::Anonymous {
            return Err(self.invalid(WorkflowEvent::ConnectWallet));
        }
        let wallet = self.gate.connect()?;
        Ok(self.enter(WorkflowState::WalletConnected { wallet }))
    }

    /// [`connect_wallet`](Self::connect_wallet) with a bound on the provider handshake.
    pub async fn connect_wallet_within(
        &mut self,
        limit: Duration,
    ) -> Result<&WorkflowState, WorkflowError> {
        if self.state != WorkflowState::Anonymous {
            return Err(self.invalid(WorkflowEvent::ConnectWallet));
        }
        let wallet = self.gate.connect_within(limit).await?;
        Ok(self.enter(WorkflowState::WalletConnected { wallet }))
    }

    /// WalletConnected → Verified, if the credential is well formed and accepted.
    pub fn submit_credential(&mut self, credential: &str) -> Result<&WorkflowState, WorkflowError> {
        let WorkflowState::WalletConnected { wallet } = &self.state else {
            return Err(self.invalid(WorkflowEvent::SubmitCredential));
        };
        let wallet = wallet.clone();
        let credential = normalize_credential(credential)?;

        if !self.gate.verify_eligibility(&wallet, credential)? {
            return Err(IdentityError::Verification("credential rejected".to_string()).into());
        }
        Ok(self.enter(WorkflowState::Verified { wallet }))
    }

    /// Verified → Browsing, or straight to VoteSubmitted when the wallet has
    /// already voted.
    pub fn enter_ballot(&mut self) -> Result<&WorkflowState, WorkflowError> {
        let WorkflowState::Verified { wallet } = &self.state else {
            return Err(self.invalid(WorkflowEvent::EnterBallot));
        };
        let wallet = wallet.clone();

        let next = match self.ledger.get_record(&wallet) {
            Some(record) => {
                info!(wallet = %wallet.short(), "wallet has already voted");
                WorkflowState::VoteSubmitted { wallet, record }
            }
            None => WorkflowState::Browsing { wallet },
        };
        Ok(self.enter(next))
    }

    /// Browsing → ConfirmingChoice for a candidate on the ballot.
    pub fn select_candidate(
        &mut self,
        candidate: &CandidateId,
    ) -> Result<&WorkflowState, WorkflowError> {
        let WorkflowState::Browsing { wallet } = &self.state else {
            return Err(self.invalid(WorkflowEvent::SelectCandidate));
        };
        if self.ledger.candidate(candidate).is_none() {
            return Err(LedgerError::UnknownCandidate(candidate.to_string()).into());
        }
        let wallet = wallet.clone();
        Ok(self.enter(WorkflowState::ConfirmingChoice {
            wallet,
            candidate: candidate.clone(),
        }))
    }

    /// ConfirmingChoice → Browsing, discarding the selection.
    pub fn cancel(&mut self) -> Result<&WorkflowState, WorkflowError> {
        let WorkflowState::ConfirmingChoice { wallet, .. } = &self.state else {
            return Err(self.invalid(WorkflowEvent::Cancel));
        };
        let wallet = wallet.clone();
        Ok(self.enter(WorkflowState::Browsing { wallet }))
    }

    fn selection(&self) -> Result<(WalletId, CandidateId), WorkflowError> {
        match &self.state {
            WorkflowState::ConfirmingChoice { wallet, candidate } => {
                Ok((wallet.clone(), candidate.clone()))
            }
            _ => Err(self.invalid(WorkflowEvent::Confirm)),
        }
    }

    fn submitted(&mut self, wallet: WalletId, record: VoteRecord) -> &WorkflowState {
        info!(
            wallet = %wallet.short(),
            candidate = %record.candidate_id,
            "vote submitted"
        );
        self.enter(WorkflowState::VoteSubmitted { wallet, record })
    }

    /// ConfirmingChoice → VoteSubmitted, casting the vote.
    pub fn confirm(&mut self) -> Result<&WorkflowState, WorkflowError> {
        let (wallet, candidate) = self.selection()?;
        let record = self.ledger.cast_vote(&wallet, &candidate)?;
        Ok(self.submitted(wallet, record))
    }

    /// [`confirm`](Self::confirm) with a bound on proof issuance.
    pub async fn confirm_within(&mut self, limit: Duration) -> Result<&WorkflowState, WorkflowError> {
        let (wallet, candidate) = self.selection()?;
        let record = self
            .ledger
            .cast_vote_within(&wallet, &candidate, limit)
            .await?;
        Ok(self.submitted(wallet, record))
    }
}

/// Trim `raw` and check that it looks like a credential at all.
///
/// Whether the credential is *accepted* is up to the verifier.
pub fn normalize_credential(raw: &str) -> Result<&str, IdentityError> {
    let credential = raw.trim();
    if credential.is_empty() {
        return Err(IdentityError::Verification("credential is empty".to_string()));
    }
    if credential.chars().count() > MAX_CREDENTIAL_LEN {
        return Err(IdentityError::Verification(format!(
            "credential longer than {MAX_CREDENTIAL_LEN} characters"
        )));
    }
    if credential.chars().any(|c| c.is_whitespace() || c.is_control()) {
        warn!("credential with embedded whitespace or control characters");
        return Err(IdentityError::Verification(
            "credential contains whitespace or control characters".to_string(),
        ));
    }
    Ok(credential)
}
