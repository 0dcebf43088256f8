use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The wallet provider failed or did not answer in time.
    #[error("wallet connection failed: {0}")]
    Connection(String),

    /// The credential was rejected, or the wallet was never connected.
    #[error("eligibility verification failed: {0}")]
    Verification(String),
}
