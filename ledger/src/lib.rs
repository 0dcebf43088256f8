//! The vote ledger: the single source of truth for who voted and how the
//! tally stands.
//!
//! Key guarantees:
//! - at most one [`VoteRecord`](votedao_types::VoteRecord) per wallet, checked
//!   and written as one unit even under concurrent attempts;
//! - a record and its tally increment are applied together or not at all;
//! - `tally().total()` always equals the number of records.
//!
//! Results ([`results`]) and the audit trail ([`audit`]) are read-only
//! projections layered on top.

pub mod audit;
pub mod error;
pub mod ledger;
pub mod proof;
pub mod results;
pub mod tally;

pub use audit::{audit_trail, AuditEntry};
pub use error::LedgerError;
pub use ledger::{VoteLedger, VoteTicket};
pub use proof::{HashProofIssuer, ProofError, ProofIssuer, ProofRequest};
pub use results::{format_share, standings, Standing};
pub use tally::{TallyBoard, TallyEntry};
