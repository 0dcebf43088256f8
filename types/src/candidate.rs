//! Candidates standing in the election.

use crate::error::{validate_id, IdError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key of a candidate.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CandidateId(String);

impl CandidateId {
    pub const MAX_LEN: usize = 64;

    pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
        let s = raw.into();
        validate_id("candidate id", &s, Self::MAX_LEN)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CandidateId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<CandidateId> for String {
    fn from(id: CandidateId) -> Self {
        id.0
    }
}

/// A candidate and its display metadata. Immutable for the election's duration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    /// Office the candidate is running for.
    pub position: String,
    pub slogan: String,
    /// CSS colour used by the presentation layer (e.g. `#6366f1`).
    pub display_color: String,
}

impl Candidate {
    pub fn new(
        id: CandidateId,
        name: impl Into<String>,
        position: impl Into<String>,
        slogan: impl Into<String>,
        display_color: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position: position.into(),
            slogan: slogan.into(),
            display_color: display_color.into(),
        }
    }

    /// The student-council ballot the election ships with.
    pub fn campus_defaults() -> Vec<Candidate> {
        [
            ("candidate1", "Sarah Chen", "President", "Innovation & Unity", "#6366f1"),
            ("candidate2", "Marcus Rivera", "Vice President", "Voice for All", "#8b5cf6"),
            ("candidate3", "Aisha Patel", "Secretary", "Transparency First", "#ec4899"),
            ("candidate4", "James Wilson", "Treasurer", "Fiscal Responsibility", "#14b8a6"),
        ]
        .into_iter()
        .map(|(id, name, position, slogan, color)| Candidate {
            id: CandidateId(id.to_string()),
            name: name.to_string(),
            position: position.to_string(),
            slogan: slogan.to_string(),
            display_color: color.to_string(),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campus_defaults_have_unique_valid_ids() {
        let candidates = Candidate::campus_defaults();
        assert_eq!(candidates.len(), 4);
        for c in &candidates {
            assert!(CandidateId::parse(c.id.as_str()).is_ok());
        }
        let mut ids: Vec<_> = candidates.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert_eq!(candidates[0].name, "Sarah Chen");
    }
}
