use thiserror::Error;

/// Rejection reasons for identifier strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },

    #[error("{kind} is too long: {len} > {max} characters")]
    TooLong {
        kind: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{kind} contains whitespace or control characters")]
    InvalidCharacter { kind: &'static str },
}

/// Shared validation for opaque string identifiers.
pub(crate) fn validate_id(kind: &'static str, raw: &str, max: usize) -> Result<(), IdError> {
    if raw.is_empty() {
        return Err(IdError::Empty { kind });
    }
    let len = raw.chars().count();
    if len > max {
        return Err(IdError::TooLong { kind, len, max });
    }
    if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(IdError::InvalidCharacter { kind });
    }
    Ok(())
}
