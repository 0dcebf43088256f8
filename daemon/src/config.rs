//! Election configuration with TOML file support.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use votedao_types::Candidate;
use votedao_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot render TOML: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for one election.
///
/// Every field has a default, so an empty file describes the campus election
/// with its four default candidates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Display name of the election.
    #[serde(default = "default_election_name")]
    pub election_name: String,

    /// Directory holding the LMDB vote store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// HTTP API port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Email domains whose addresses (and subdomains) are eligible.
    #[serde(default = "default_email_domains")]
    pub allowed_email_domains: Vec<String>,

    #[serde(default = "default_student_id_min_len")]
    pub student_id_min_len: usize,

    #[serde(default = "default_student_id_max_len")]
    pub student_id_max_len: usize,

    /// Wallet handshake bound, in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Proof issuance bound, in milliseconds.
    #[serde(default = "default_proof_timeout_ms")]
    pub proof_timeout_ms: u64,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// Idle voter sessions are dropped after this many seconds.
    #[serde(default = "default_session_idle_ttl_secs")]
    pub session_idle_ttl_secs: u64,

    /// Ballot, in display order.
    #[serde(default = "Candidate::campus_defaults")]
    pub candidates: Vec<Candidate>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_election_name() -> String {
    "Student Council Election 2026".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./votedao_data")
}

fn default_rpc_port() -> u16 {
    7080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_email_domains() -> Vec<String> {
    vec!["university.edu".to_string()]
}

fn default_student_id_min_len() -> usize {
    6
}

fn default_student_id_max_len() -> usize {
    12
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_proof_timeout_ms() -> u64 {
    30_000
}

fn default_map_size_mb() -> usize {
    64
}

fn default_session_idle_ttl_secs() -> u64 {
    30 * 60
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ElectionConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidates.is_empty() {
            return Err(ConfigError::Invalid("at least one candidate is required".into()));
        }
        let mut seen = HashSet::new();
        for c in &self.candidates {
            if !seen.insert(&c.id) {
                return Err(ConfigError::Invalid(format!("duplicate candidate id {}", c.id)));
            }
            if c.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("candidate {} has no name", c.id)));
            }
        }
        if self.student_id_min_len > self.student_id_max_len {
            return Err(ConfigError::Invalid(format!(
                "student_id_min_len {} exceeds student_id_max_len {}",
                self.student_id_min_len, self.student_id_max_len
            )));
        }
        let no_domains = self.allowed_email_domains.iter().all(|d| d.trim().is_empty());
        if no_domains && self.student_id_max_len == 0 {
            return Err(ConfigError::Invalid(
                "no email domain and no student id length: nobody could verify".into(),
            ));
        }
        if self.connect_timeout_ms == 0 || self.proof_timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeouts must be positive".into()));
        }
        if self.map_size_mb == 0 {
            return Err(ConfigError::Invalid("map_size_mb must be positive".into()));
        }
        self.map_size_bytes()?;
        if self.session_idle_ttl_secs == 0 {
            return Err(ConfigError::Invalid("session_idle_ttl_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn proof_timeout(&self) -> Duration {
        Duration::from_millis(self.proof_timeout_ms)
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_ttl_secs)
    }

    pub fn map_size_bytes(&self) -> Result<usize, ConfigError> {
        self.map_size_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "map_size_mb {} does not fit in the address space",
                self.map_size_mb
            ))
        })
    }
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            election_name: default_election_name(),
            data_dir: default_data_dir(),
            rpc_port: default_rpc_port(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            allowed_email_domains: default_email_domains(),
            student_id_min_len: default_student_id_min_len(),
            student_id_max_len: default_student_id_max_len(),
            connect_timeout_ms: default_connect_timeout_ms(),
            proof_timeout_ms: default_proof_timeout_ms(),
            map_size_mb: default_map_size_mb(),
            session_idle_ttl_secs: default_session_idle_ttl_secs(),
            candidates: Candidate::campus_defaults(),
        }
    }
}
