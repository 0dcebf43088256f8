//! Wallet providers.

use crate::IdentityError;
use votedao_types::WalletId;

/// Source of wallet identifiers.
///
/// The gate treats the provider as an opaque capability: whatever id it
/// returns is the voter's identity for the rest of the session.
pub trait WalletProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Perform the wallet handshake and return the connected wallet's id.
    fn connect(&self) -> Result<WalletId, IdentityError>;
}

/// Hands out fresh `0x`-prefixed 20-byte hex wallet ids from OS randomness.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomWalletProvider;

impl WalletProvider for RandomWalletProvider {
    fn name(&self) -> &str {
        "random"
    }

    fn connect(&self) -> Result<WalletId, IdentityError> {
        let mut bytes = [0u8; 20];
        getrandom::getrandom(&mut bytes)
            .map_err(|e| IdentityError::Connection(format!("entropy unavailable: {e}")))?;
        WalletId::parse(format!("0x{}", hex::encode(bytes)))
            .map_err(|e| IdentityError::Connection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_look_like_addresses() {
        let id = RandomWalletProvider.connect().unwrap();
        assert!(id.as_str().starts_with("0x"));
        assert_eq!(id.as_str().len(), 42);
    }

    #[test]
    fn random_ids_differ() {
        let a = RandomWalletProvider.connect().unwrap();
        let b = RandomWalletProvider.connect().unwrap();
        assert_ne!(a, b);
    }
}
