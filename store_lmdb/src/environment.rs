//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use tracing::{debug, info};

use crate::vote::LmdbVoteStore;
use crate::LmdbError;

/// Current on-disk layout version, stored under [`SCHEMA_VERSION_KEY`].
pub const SCHEMA_VERSION: u32 = 1;

pub(crate) const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";
pub(crate) const VOTES_DB: &str = "votes";
pub(crate) const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// Creates the directory if needed, creates the databases on first open
    /// and stamps the schema version.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: each data directory is opened by a single environment per
        // process; the daemon never opens the same path twice.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let votes_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(VOTES_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;

        let stamped = meta_db.get(&wtxn, SCHEMA_VERSION_KEY)?.is_some();
        if !stamped {
            meta_db.put(&mut wtxn, SCHEMA_VERSION_KEY, &SCHEMA_VERSION.to_le_bytes())?;
            debug!("stamped schema version {SCHEMA_VERSION}");
        }
        wtxn.commit()?;

        info!("opened LMDB environment at {}", path.display());
        Ok(Self {
            env: Arc::new(env),
            votes_db,
            meta_db,
        })
    }

    /// The underlying heed environment.
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// A vote store sharing this environment.
    pub fn vote_store(&self) -> LmdbVoteStore {
        LmdbVoteStore {
            env: Arc::clone(&self.env),
            votes_db: self.votes_db,
        }
    }

    /// Read the stored schema version (0 when never stamped).
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) if bytes.len() == 4 => {
                let mut arr = [0u8; 4];
                arr.copy_from_slice(bytes);
                Ok(u32::from_le_bytes(arr))
            }
            Some(_) => Err(LmdbError::Serialization(
                "schema_version has unexpected byte length".to_string(),
            )),
            None => Ok(0),
        }
    }
}
