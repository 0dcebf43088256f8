//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the ledger rebuilds its
//! tally from the stored records.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::Env;

use crate::environment::{META_DB, VOTES_DB};
use crate::vote::decode_record;
use crate::LmdbError;

/// Summary of an integrity check run.
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

const EXPECTED_DATABASES: &[&str] = &[VOTES_DB, META_DB];

/// Check LMDB database integrity on startup.
///
/// Counts entries in each expected database and decodes every vote record,
/// checking that it is stored under its own voter's key. Read failures are
/// recorded in the report rather than causing a hard error.
pub fn check_integrity(env: &Arc<Env>) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = env.read_txn()?;

    for &db_name in EXPECTED_DATABASES {
        match env.open_database::<Bytes, Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => report.total_entries += count,
                    Err(e) => report
                        .errors
                        .push(format!("failed to read database '{}': {}", db_name, e)),
                }
            }
            Ok(None) => {
                // not created yet in a fresh election
            }
            Err(e) => report
                .errors
                .push(format!("failed to open database '{}': {}", db_name, e)),
        }
    }

    if let Some(votes) = env.open_database::<Bytes, Bytes>(&rtxn, Some(VOTES_DB))? {
        for entry in votes.iter(&rtxn)? {
            let (key, val) = match entry {
                Ok(kv) => kv,
                Err(e) => {
                    report.errors.push(format!("failed to iterate votes: {e}"));
                    break;
                }
            };
            let key_str = String::from_utf8_lossy(key);
            match decode_record(val) {
                Ok(record) if record.voter.as_str().as_bytes() == key => {}
                Ok(record) => report.errors.push(format!(
                    "vote stored under '{}' belongs to '{}'",
                    key_str, record.voter
                )),
                Err(e) => report
                    .errors
                    .push(format!("undecodable vote under '{}': {}", key_str, e)),
            }
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
