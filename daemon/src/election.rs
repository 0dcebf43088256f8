//! Wiring: store, identity gate and ledger for one election.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use votedao_identity::{IdentityGate, InstitutionalVerifier, RandomWalletProvider};
use votedao_ledger::{HashProofIssuer, VoteLedger};
use votedao_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use votedao_types::SystemClock;

use crate::config::ElectionConfig;

const MAX_DBS: u32 = 4;

pub struct Election {
    pub gate: Arc<IdentityGate>,
    pub ledger: Arc<VoteLedger>,
}

/// Open the vote store under `config.data_dir`, creating it on first use,
/// check it, and restore the ledger.
pub fn open(config: &ElectionConfig) -> anyhow::Result<Election> {
    if let Err(e) = check_data_dir(&config.data_dir) {
        warn!("{e}");
    }
    restore(config)
}

/// Like [`open`], but the vote store must already exist. Read-only commands
/// use this so a mistyped path is an error instead of an empty election.
pub fn open_existing(config: &ElectionConfig) -> anyhow::Result<Election> {
    let dir = &config.data_dir;
    if !dir.is_dir() {
        anyhow::bail!("no vote store at {}: directory does not exist", dir.display());
    }
    check_data_dir(dir).map_err(anyhow::Error::msg)?;
    restore(config)
}

fn restore(config: &ElectionConfig) -> anyhow::Result<Election> {
    let env = LmdbEnvironment::open(&config.data_dir, MAX_DBS, config.map_size_bytes()?)
        .with_context(|| format!("opening vote store at {}", config.data_dir.display()))?;

    let report = check_integrity(env.env()).context("integrity check")?;
    if !report.is_healthy() {
        for e in &report.errors {
            warn!("integrity: {e}");
        }
        anyhow::bail!(
            "vote store at {} failed its integrity check ({} errors)",
            config.data_dir.display(),
            report.errors.len()
        );
    }
    info!(
        databases = report.databases_checked,
        entries = report.total_entries,
        "integrity check passed"
    );

    let clock = Arc::new(SystemClock);
    let verifier = InstitutionalVerifier::new(
        config.allowed_email_domains.clone(),
        config.student_id_min_len..=config.student_id_max_len,
    );
    let gate = Arc::new(IdentityGate::new(
        Arc::new(RandomWalletProvider),
        Arc::new(verifier),
        clock.clone(),
    ));
    let ledger = VoteLedger::open(
        config.candidates.clone(),
        gate.clone(),
        Arc::new(env.vote_store()),
        Arc::new(HashProofIssuer),
        clock,
    )
    .context("restoring the vote ledger")?;

    Ok(Election {
        gate,
        ledger: Arc::new(ledger),
    })
}
