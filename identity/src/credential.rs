//! Credential verification policy.
//!
//! The core does not define what makes a credential valid; that policy lives
//! entirely in the [`CredentialVerifier`] plugged into the gate.

use std::ops::RangeInclusive;
use votedao_types::WalletId;

/// A pluggable eligibility policy.
pub trait CredentialVerifier: Send + Sync {
    /// Human-readable name of this policy.
    fn name(&self) -> &str;

    /// Whether `credential` qualifies `wallet` to vote.
    fn verify(&self, wallet: &WalletId, credential: &str) -> bool;
}

/// Accepts a college email on an allowed domain, or a student id.
///
/// - Email: `local@domain` where `domain` equals an allowed domain or is a
///   subdomain of one (case-insensitive).
/// - Student id: ASCII alphanumerics only, length within `student_id_len`,
///   at least one digit.
#[derive(Clone, Debug)]
pub struct InstitutionalVerifier {
    allowed_domains: Vec<String>,
    student_id_len: RangeInclusive<usize>,
}

impl InstitutionalVerifier {
    pub fn new(allowed_domains: Vec<String>, student_id_len: RangeInclusive<usize>) -> Self {
        Self {
            allowed_domains: allowed_domains
                .into_iter()
                .map(|d| d.trim().trim_start_matches('@').to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            student_id_len,
        }
    }

    fn email_allowed(&self, email: &str) -> bool {
        let Some((local, domain)) = email.rsplit_once('@') else {
            return false;
        };
        if local.is_empty() || domain.is_empty() {
            return false;
        }
        let domain = domain.to_ascii_lowercase();
        self.allowed_domains
            .iter()
            .any(|allowed| domain == *allowed || domain.ends_with(&format!(".{allowed}")))
    }

    fn student_id_allowed(&self, id: &str) -> bool {
        self.student_id_len.contains(&id.len())
            && id.chars().all(|c| c.is_ascii_alphanumeric())
            && id.chars().any(|c| c.is_ascii_digit())
    }
}

impl Default for InstitutionalVerifier {
    fn default() -> Self {
        Self::new(vec!["university.edu".to_string()], 6..=12)
    }
}

impl CredentialVerifier for InstitutionalVerifier {
    fn name(&self) -> &str {
        "institutional"
    }

    fn verify(&self, _wallet: &WalletId, credential: &str) -> bool {
        let credential = credential.trim();
        if credential.contains('@') {
            self.email_allowed(credential)
        } else {
            self.student_id_allowed(credential)
        }
    }
}
