use std::fmt;

use serde::Serialize;
use votedao_types::{CandidateId, VoteRecord, WalletId};

/// Where a voter stands in the election. Each state carries exactly the data
/// it needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    Anonymous,
    WalletConnected {
        wallet: WalletId,
    },
    Verified {
        wallet: WalletId,
    },
    Browsing {
        wallet: WalletId,
    },
    ConfirmingChoice {
        wallet: WalletId,
        candidate: CandidateId,
    },
    /// Terminal. Either this workflow cast the vote or the wallet had voted before.
    VoteSubmitted {
        wallet: WalletId,
        record: VoteRecord,
    },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::WalletConnected { .. } => "wallet_connected",
            Self::Verified { .. } => "verified",
            Self::Browsing { .. } => "browsing",
            Self::ConfirmingChoice { .. } => "confirming_choice",
            Self::VoteSubmitted { .. } => "vote_submitted",
        }
    }

    /// The connected wallet, once there is one.
    pub fn wallet(&self) -> Option<&WalletId> {
        match self {
            Self::Anonymous => None,
            Self::WalletConnected { wallet }
            | Self::Verified { wallet }
            | Self::Browsing { wallet }
            | Self::ConfirmingChoice { wallet, .. }
            | Self::VoteSubmitted { wallet, .. } => Some(wallet),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::VoteSubmitted { .. })
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs that drive a workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowEvent {
    ConnectWallet,
    SubmitCredential,
    EnterBallot,
    SelectCandidate,
    Confirm,
    Cancel,
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ConnectWallet => "connect_wallet",
            Self::SubmitCredential => "submit_credential",
            Self::EnterBallot => "enter_ballot",
            Self::SelectCandidate => "select_candidate",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
        })
    }
}
