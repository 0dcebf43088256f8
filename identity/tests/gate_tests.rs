//! Identity gate behaviour against the nullable collaborators.

use std::sync::Arc;
use std::time::Duration;

use votedao_identity::{EligibilityCheck, IdentityError, IdentityGate};
use votedao_nullables::{NullClock, NullCredentialVerifier, NullWalletProvider};
use votedao_types::{Timestamp, WalletId};

fn gate_with(
    wallets: NullWalletProvider,
    verifier: Arc<NullCredentialVerifier>,
) -> IdentityGate {
    IdentityGate::new(Arc::new(wallets), verifier, Arc::new(NullClock::new(1_000)))
}

#[test]
fn connect_registers_unverified_voter() {
    let gate = gate_with(
        NullWalletProvider::new(["0xw1"]),
        Arc::new(NullCredentialVerifier::accept_all()),
    );
    let wallet = gate.connect().unwrap();

    assert_eq!(wallet.as_str(), "0xw1");
    let voter = gate.voter(&wallet).unwrap();
    assert!(!voter.verified);
    assert_eq!(voter.connected_at, Timestamp::new(1_000));
    assert!(!gate.is_eligible(&wallet));
}

#[test]
fn provider_failure_is_connection_error() {
    let gate = gate_with(
        NullWalletProvider::failing("user rejected request"),
        Arc::new(NullCredentialVerifier::accept_all()),
    );
    let err = gate.connect().unwrap_err();
    assert!(matches!(err, IdentityError::Connection(_)));
    assert_eq!(gate.connected_count(), 0);
}

#[test]
fn verification_sets_flag_once_and_is_idempotent() {
    let verifier = Arc::new(NullCredentialVerifier::accepting(["student@university.edu"]));
    let gate = gate_with(NullWalletProvider::new(["0xw1"]), Arc::clone(&verifier));
    let wallet = gate.connect().unwrap();

    assert_eq!(gate.verify_eligibility(&wallet, "student@university.edu"), Ok(true));
    assert!(gate.is_verified(&wallet));
    assert_eq!(verifier.calls(), 1);

    // already verified: the verifier is not consulted again, even with junk
    assert_eq!(gate.verify_eligibility(&wallet, "anything"), Ok(true));
    assert_eq!(verifier.calls(), 1);
}

#[test]
fn rejected_credential_changes_nothing() {
    let gate = gate_with(
        NullWalletProvider::new(["0xw1"]),
        Arc::new(NullCredentialVerifier::reject_all()),
    );
    let wallet = gate.connect().unwrap();

    let err = gate.verify_eligibility(&wallet, "nobody@example.com").unwrap_err();
    assert!(matches!(err, IdentityError::Verification(_)));
    assert!(!gate.is_verified(&wallet));
}

#[test]
fn verifying_unknown_wallet_fails() {
    let gate = gate_with(
        NullWalletProvider::new(["0xw1"]),
        Arc::new(NullCredentialVerifier::accept_all()),
    );
    let stranger = WalletId::parse("0xstranger").unwrap();
    assert!(matches!(
        gate.verify_eligibility(&stranger, "student@university.edu"),
        Err(IdentityError::Verification(_))
    ));
}

#[test]
fn reconnect_keeps_verification() {
    let gate = gate_with(
        NullWalletProvider::new(["0xw1", "0xw1"]),
        Arc::new(NullCredentialVerifier::accept_all()),
    );
    let wallet = gate.connect().unwrap();
    gate.verify_eligibility(&wallet, "S2024001").unwrap();

    let again = gate.connect().unwrap();
    assert_eq!(again, wallet);
    assert!(gate.is_verified(&again));
    assert_eq!(gate.connected_count(), 1);
}

#[tokio::test]
async fn connect_within_returns_wallet() {
    let gate = gate_with(
        NullWalletProvider::new(["0xw9"]),
        Arc::new(NullCredentialVerifier::accept_all()),
    );
    let wallet = gate.connect_within(Duration::from_secs(5)).await.unwrap();
    assert_eq!(wallet.as_str(), "0xw9");
    assert!(gate.voter(&wallet).is_some());
}

#[tokio::test]
async fn slow_provider_times_out_without_registering() {
    let gate = gate_with(
        NullWalletProvider::new(["0xslow"]).with_delay(Duration::from_millis(500)),
        Arc::new(NullCredentialVerifier::accept_all()),
    );
    let err = gate
        .connect_within(Duration::from_millis(20))
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::Connection(_)));
    assert_eq!(gate.connected_count(), 0);
}

#[test]
fn disconnect_forgets_verification() {
    let gate = gate_with(
        NullWalletProvider::new(["0xw1", "0xw1"]),
        Arc::new(NullCredentialVerifier::accept_all()),
    );
    let wallet = gate.connect().unwrap();
    gate.verify_eligibility(&wallet, "S2024001").unwrap();

    assert!(gate.disconnect(&wallet));
    assert!(!gate.disconnect(&wallet));
    assert!(!gate.is_eligible(&wallet));

    gate.connect().unwrap();
    assert!(!gate.is_verified(&wallet));
}
