//! Proof tokens standing in for transaction receipts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque receipt attached to a vote record.
///
/// Its generation policy belongs to the proof issuer; the core only stores
/// and displays it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofToken(String);

impl ProofToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Build a `0x`-prefixed lowercase hex token from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut s = String::with_capacity(2 + bytes.len() * 2);
        s.push_str("0x");
        for b in bytes {
            s.push_str(&format!("{:02x}", b));
        }
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProofToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(10).collect();
        write!(f, "ProofToken({head})")
    }
}

impl fmt::Display for ProofToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
