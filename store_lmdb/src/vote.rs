//! LMDB implementation of VoteStore.
//!
//! Records are keyed by the raw wallet id bytes and encoded with bincode.
//! `save` checks for an existing key inside the same write transaction, so
//! the store itself never holds two records for one wallet.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use votedao_store::{StoreError, VoteStore};
use votedao_types::{VoteRecord, WalletId};

use crate::LmdbError;

pub struct LmdbVoteStore {
    pub(crate) env: Arc<Env>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
}

pub(crate) fn decode_record(bytes: &[u8]) -> Result<VoteRecord, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}

impl VoteStore for LmdbVoteStore {
    fn save(&self, record: &VoteRecord) -> Result<(), StoreError> {
        let key = record.voter.as_str().as_bytes();
        let value = bincode::serialize(record).map_err(LmdbError::from)?;

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let exists = self
            .votes_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .is_some();
        if exists {
            // dropping the txn aborts it
            return Err(StoreError::Duplicate(record.voter.to_string()));
        }
        self.votes_db
            .put(&mut wtxn, key, &value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn load(&self, wallet: &WalletId) -> Result<Option<VoteRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .votes_db
            .get(&rtxn, wallet.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(Some(decode_record(bytes)?)),
            None => Ok(None),
        }
    }

    fn load_all(&self) -> Result<Vec<VoteRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.votes_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            records.push(decode_record(val)?);
        }
        Ok(records)
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.votes_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
