//! The vote ledger.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};
use votedao_identity::EligibilityCheck;
use votedao_store::VoteStore;
use votedao_types::{Candidate, CandidateId, Clock, ProofToken, Timestamp, VoteRecord, WalletId};

use crate::audit::{audit_trail, AuditEntry};
use crate::error::LedgerError;
use crate::proof::{ProofIssuer, ProofRequest};
use crate::results::{standings, Standing};
use crate::tally::TallyBoard;

/// Everything guarded by the ledger mutex.
struct LedgerState {
    records: HashMap<WalletId, VoteRecord>,
    /// Wallets in commit order.
    order: Vec<WalletId>,
    tally: TallyBoard,
    /// Wallets holding an uncommitted [`VoteTicket`].
    pending: HashSet<WalletId>,
}

/// One vote per voter and the aggregate tally.
///
/// All mutation goes through [`VoteTicket::commit`] under a single mutex:
/// the duplicate check, the store write, the record insert and the tally
/// increment form one unit.
pub struct VoteLedger {
    candidates: Vec<Candidate>,
    eligibility: Arc<dyn EligibilityCheck>,
    store: Arc<dyn VoteStore>,
    issuer: Arc<dyn ProofIssuer>,
    clock: Arc<dyn Clock>,
    state: Mutex<LedgerState>,
}

impl VoteLedger {
    /// Open the ledger for an election, restoring every record in `store`
    /// and rebuilding the tally from them.
    pub fn open(
        candidates: Vec<Candidate>,
        eligibility: Arc<dyn EligibilityCheck>,
        store: Arc<dyn VoteStore>,
        issuer: Arc<dyn ProofIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        validate_candidates(&candidates)?;

        let mut tally = TallyBoard::new(candidates.iter().map(|c| c.id.clone()));
        let mut stored = store.load_all()?;
        stored.sort_by(|a, b| {
            a.cast_at
                .cmp(&b.cast_at)
                .then_with(|| a.voter.cmp(&b.voter))
        });

        let mut records = HashMap::with_capacity(stored.len());
        let mut order = Vec::with_capacity(stored.len());
        for record in stored {
            if !tally.increment(&record.candidate_id) {
                return Err(votedao_store::StoreError::Corruption(format!(
                    "record for {} names unknown candidate {}",
                    record.voter, record.candidate_id
                ))
                .into());
            }
            order.push(record.voter.clone());
            if records.insert(record.voter.clone(), record).is_some() {
                return Err(votedao_store::StoreError::Corruption(
                    "two stored records for one wallet".to_string(),
                )
                .into());
            }
        }

        info!(
            candidates = candidates.len(),
            restored = records.len(),
            issuer = issuer.name(),
            "vote ledger opened"
        );

        Ok(Self {
            candidates,
            eligibility,
            store,
            issuer,
            clock,
            state: Mutex::new(LedgerState {
                records,
                order,
                tally,
                pending: HashSet::new(),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `wallet` has a committed vote. A vote still in flight does not count.
    pub fn has_voted(&self, wallet: &WalletId) -> bool {
        self.lock().records.contains_key(wallet)
    }

    /// The record cast by `wallet`, if any.
    pub fn get_record(&self, wallet: &WalletId) -> Option<VoteRecord> {
        self.lock().records.get(wallet).cloned()
    }

    /// Snapshot of the current tally.
    pub fn tally(&self) -> TallyBoard {
        self.lock().tally.clone()
    }

    pub fn record_count(&self) -> usize {
        self.lock().records.len()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate(&self, id: &CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| &c.id == id)
    }

    /// Every record, in commit order.
    pub fn records(&self) -> Vec<VoteRecord> {
        let state = self.lock();
        state
            .order
            .iter()
            .filter_map(|w| state.records.get(w).cloned())
            .collect()
    }

    /// Leaderboard over the current tally.
    pub fn standings(&self) -> Vec<Standing> {
        standings(&self.candidates, &self.tally())
    }

    /// Audit trail over every record.
    pub fn audit_trail(&self) -> Vec<AuditEntry> {
        audit_trail(&self.records())
    }

    /// Reserve `wallet` for a vote on `candidate`.
    ///
    /// Checks, in order: the candidate exists, the wallet is eligible, the
    /// wallet has neither voted nor holds another reservation. While the
    /// returned ticket lives, every other attempt for the wallet fails with
    /// [`LedgerError::DuplicateVote`]. Dropping the ticket without committing
    /// releases the reservation.
    pub fn begin_vote(
        &self,
        wallet: &WalletId,
        candidate: &CandidateId,
    ) -> Result<VoteTicket<'_>, LedgerError> {
        if self.candidate(candidate).is_none() {
            return Err(LedgerError::UnknownCandidate(candidate.to_string()));
        }
        if !self.eligibility.is_eligible(wallet) {
            return Err(LedgerError::NotEligible(wallet.to_string()));
        }

        let mut state = self.lock();
        if state.records.contains_key(wallet) || !state.pending.insert(wallet.clone()) {
            return Err(LedgerError::DuplicateVote(wallet.to_string()));
        }
        drop(state);

        Ok(VoteTicket {
            ledger: self,
            wallet: wallet.clone(),
            candidate: candidate.clone(),
            cast_at: self.clock.now(),
            committed: false,
        })
    }

    /// Cast a vote: reserve, obtain a proof from the issuer, commit.
    pub fn cast_vote(
        &self,
        wallet: &WalletId,
        candidate: &CandidateId,
    ) -> Result<VoteRecord, LedgerError> {
        let result = self.begin_vote(wallet, candidate).and_then(|ticket| {
            let proof = self.issuer.issue(&ticket.request())?;
            ticket.commit(proof)
        });
        if let Err(ref e) = result {
            warn!(wallet = %wallet.short(), candidate = %candidate, "vote rejected: {e}");
        }
        result
    }

    /// Like [`cast_vote`](Self::cast_vote), but issues the proof on the
    /// blocking pool and gives up after `limit`.
    ///
    /// On timeout or cancellation the reservation is released and nothing is
    /// committed; a late proof is discarded.
    pub async fn cast_vote_within(
        &self,
        wallet: &WalletId,
        candidate: &CandidateId,
        limit: Duration,
    ) -> Result<VoteRecord, LedgerError> {
        let ticket = self.begin_vote(wallet, candidate).map_err(|e| {
            warn!(wallet = %wallet.short(), candidate = %candidate, "vote rejected: {e}");
            e
        })?;

        let issuer = Arc::clone(&self.issuer);
        let request = ticket.request();
        let issuing = tokio::task::spawn_blocking(move || issuer.issue(&request));
        let proof = match tokio::time::timeout(limit, issuing).await {
            Ok(Ok(issued)) => issued?,
            Ok(Err(join)) => return Err(crate::ProofError(format!("issuer aborted: {join}")).into()),
            Err(_) => {
                warn!(wallet = %wallet.short(), "proof issuance timed out");
                return Err(LedgerError::ProofTimeout(limit.as_millis() as u64));
            }
        };
        ticket.commit(proof)
    }
}

/// A reserved, not yet committed vote.
///
/// Obtained from [`VoteLedger::begin_vote`]. Either [`commit`](Self::commit)
/// it or drop it; dropping releases the wallet.
pub struct VoteTicket<'a> {
    ledger: &'a VoteLedger,
    wallet: WalletId,
    candidate: CandidateId,
    cast_at: Timestamp,
    committed: bool,
}

impl VoteTicket<'_> {
    pub fn wallet(&self) -> &WalletId {
        &self.wallet
    }

    pub fn candidate(&self) -> &CandidateId {
        &self.candidate
    }

    /// The proof request for this vote.
    pub fn request(&self) -> ProofRequest {
        ProofRequest {
            wallet: self.wallet.clone(),
            candidate: self.candidate.clone(),
            cast_at: self.cast_at,
        }
    }

    /// Persist the record and apply it to the tally.
    ///
    /// If the store write fails nothing is applied and the reservation is
    /// released.
    pub fn commit(mut self, proof: ProofToken) -> Result<VoteRecord, LedgerError> {
        let record = VoteRecord {
            candidate_id: self.candidate.clone(),
            voter: self.wallet.clone(),
            proof_token: proof,
            cast_at: self.cast_at,
        };

        let mut state = self.ledger.lock();
        if !state.tally.contains(&record.candidate_id) {
            return Err(LedgerError::UnknownCandidate(record.candidate_id.to_string()));
        }
        self.ledger.store.save(&record)?;

        state.tally.increment(&record.candidate_id);
        state.order.push(record.voter.clone());
        state.records.insert(record.voter.clone(), record.clone());
        state.pending.remove(&record.voter);
        self.committed = true;
        let total = state.tally.total();
        drop(state);

        info!(
            wallet = %record.voter.short(),
            candidate = %record.candidate_id,
            proof = %record.proof_token,
            total,
            "vote recorded"
        );
        Ok(record)
    }
}

impl Drop for VoteTicket<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.ledger.lock().pending.remove(&self.wallet);
            debug!(wallet = %self.wallet.short(), "vote reservation released");
        }
    }
}

fn validate_candidates(candidates: &[Candidate]) -> Result<(), LedgerError> {
    if candidates.is_empty() {
        return Err(LedgerError::InvalidElection(
            "an election needs at least one candidate".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for c in candidates {
        if !seen.insert(&c.id) {
            return Err(LedgerError::InvalidElection(format!(
                "duplicate candidate id {}",
                c.id
            )));
        }
    }
    Ok(())
}
