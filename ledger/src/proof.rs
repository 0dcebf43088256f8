//! Proof issuance: the stand-in for a transaction receipt.
//!
//! The ledger asks a [`ProofIssuer`] for a token before committing a vote.
//! In a deployment backed by a real chain this is where signing and broadcast
//! would happen; nothing is committed until the issuer has answered.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use thiserror::Error;
use votedao_types::{CandidateId, ProofToken, Timestamp, WalletId};

type Blake2b256 = Blake2b<U32>;

/// Failure reported by a proof issuer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ProofError(pub String);

/// What a proof is requested for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofRequest {
    pub wallet: WalletId,
    pub candidate: CandidateId,
    pub cast_at: Timestamp,
}

/// Source of proof tokens.
pub trait ProofIssuer: Send + Sync {
    /// Human-readable name of this issuer.
    fn name(&self) -> &str;

    fn issue(&self, request: &ProofRequest) -> Result<ProofToken, ProofError>;
}

/// Issues `0x`-prefixed Blake2b-256 digests over the request and a random nonce.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashProofIssuer;

impl ProofIssuer for HashProofIssuer {
    fn name(&self) -> &str {
        "blake2b"
    }

    fn issue(&self, request: &ProofRequest) -> Result<ProofToken, ProofError> {
        let mut nonce = [0u8; 32];
        getrandom::getrandom(&mut nonce)
            .map_err(|e| ProofError(format!("entropy unavailable: {e}")))?;

        let mut hasher = Blake2b256::new();
        hasher.update(request.wallet.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(request.candidate.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(request.cast_at.as_secs().to_le_bytes());
        hasher.update(nonce);
        let digest = hasher.finalize();
        Ok(ProofToken::from_bytes(&digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProofRequest {
        ProofRequest {
            wallet: WalletId::parse("0xw1").unwrap(),
            candidate: CandidateId::parse("candidate1").unwrap(),
            cast_at: Timestamp::new(1_700_000_000),
        }
    }

    #[test]
    fn hash_tokens_are_66_char_hex() {
        let token = HashProofIssuer.issue(&request()).unwrap();
        let s = token.as_str();
        assert_eq!(s.len(), 66);
        assert!(s.starts_with("0x"));
        assert!(s[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_request_yields_distinct_tokens() {
        let a = HashProofIssuer.issue(&request()).unwrap();
        let b = HashProofIssuer.issue(&request()).unwrap();
        assert_ne!(a, b);
    }
}
