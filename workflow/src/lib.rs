//! Election workflow: the per-voter state machine.
//!
//! A workflow walks one wallet through the election:
//! `Anonymous → WalletConnected → Verified → Browsing → ConfirmingChoice → VoteSubmitted`.
//! Each transition may consult the [`IdentityGate`](votedao_identity::IdentityGate)
//! or the [`VoteLedger`](votedao_ledger::VoteLedger). A failed transition keeps
//! the current state and reports a [`WorkflowError`].

pub mod error;
pub mod state;
pub mod workflow;

pub use error::WorkflowError;
pub use state::{WorkflowEvent, WorkflowState};
pub use workflow::{normalize_credential, ElectionWorkflow, MAX_CREDENTIAL_LEN};
