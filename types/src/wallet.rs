//! Wallet identifier type.

use crate::error::{validate_id, IdError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque wallet identifier handed out by a wallet provider.
///
/// The core never inspects the contents beyond basic well-formedness:
/// non-empty, at most [`WalletId::MAX_LEN`] characters, no whitespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletId(String);

impl WalletId {
    pub const MAX_LEN: usize = 128;

    /// Parse a wallet identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
        let s = raw.into();
        validate_id("wallet id", &s, Self::MAX_LEN)?;
        Ok(Self(s))
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened display form: first 6 and last 4 characters (`0x742d...0bEb`).
    ///
    /// Identifiers of 12 characters or fewer are returned unchanged.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WalletId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<WalletId> for String {
    fn from(id: WalletId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_matches_address_bar() {
        let id = WalletId::parse("0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb").unwrap();
        assert_eq!(id.short(), "0x742d...0bEb");
    }

    #[test]
    fn short_ids_are_not_truncated() {
        let id = WalletId::parse("w1").unwrap();
        assert_eq!(id.short(), "w1");
    }

    #[test]
    fn rejects_blank_and_spaced_ids() {
        assert_eq!(
            WalletId::parse(""),
            Err(IdError::Empty { kind: "wallet id" })
        );
        assert!(matches!(
            WalletId::parse("0x12 34"),
            Err(IdError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn rejects_overlong_ids() {
        let raw = "a".repeat(WalletId::MAX_LEN + 1);
        assert!(matches!(WalletId::parse(raw), Err(IdError::TooLong { .. })));
    }

    #[test]
    fn deserialization_validates() {
        let ok: WalletId = serde_json::from_str("\"0xabc\"").unwrap();
        assert_eq!(ok.as_str(), "0xabc");
        assert!(serde_json::from_str::<WalletId>("\"\"").is_err());
    }
}
