//! Integration tests for the Transfer Engine.

mod common;

use common::{date, setup};
use rust_decimal_macros::dec;
use tesoro_core::ledger::{AccountStatus, MovementKind, TransferInput};
use tesoro_core::{ErrorKind, LedgerError};

fn transfer(
    source: tesoro_shared::types::AccountId,
    destination: tesoro_shared::types::AccountId,
    amount: rust_decimal::Decimal,
) -> TransferInput {
    TransferInput {
        source,
        destination,
        amount,
        reference: Some("Monthly funding".to_string()),
        recorded_by: Some("treasurer".to_string()),
    }
}

#[tokio::test]
async fn test_transfer_posts_both_legs_with_shared_correlation() {
    let ledger = setup().await;
    let source = ledger.open_account("001-0001").await;
    let destination = ledger.open_account("001-0002").await;
    ledger.deposit(source, dec!(100.00), date(2024, 3, 1)).await;

    let correlation_id = ledger
        .transfers()
        .transfer(transfer(source, destination, dec!(40.00)))
        .await
        .expect("Failed to transfer");

    assert_eq!(ledger.balance(source).await, dec!(60.00));
    assert_eq!(ledger.balance(destination).await, dec!(40.00));

    let outgoing = ledger.statement(source).await.pop().expect("outgoing leg");
    let incoming = ledger.statement(destination).await.pop().expect("incoming leg");
    assert_eq!(outgoing.kind, MovementKind::TransferOut);
    assert_eq!(incoming.kind, MovementKind::TransferIn);
    assert_eq!(outgoing.correlation_id, Some(correlation_id));
    assert_eq!(incoming.correlation_id, Some(correlation_id));
    assert_eq!(outgoing.reference, incoming.reference);
    assert_eq!(outgoing.recorded_by.as_deref(), Some("treasurer"));
}

#[tokio::test]
async fn test_transfer_beyond_balance_posts_nothing() {
    let ledger = setup().await;
    let source = ledger.open_account("001-0001").await;
    let destination = ledger.open_account("001-0002").await;
    ledger.deposit(source, dec!(30.00), date(2024, 3, 1)).await;

    let err = ledger
        .transfers()
        .transfer(transfer(source, destination, dec!(50.00)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert!(err.to_string().contains("balance 30.00"));
    assert_eq!(ledger.statement(source).await.len(), 1);
    assert!(ledger.statement(destination).await.is_empty());
}

#[tokio::test]
async fn test_transfer_to_same_account_is_conflict() {
    let ledger = setup().await;
    let account = ledger.open_account("001-0001").await;
    ledger.deposit(account, dec!(30.00), date(2024, 3, 1)).await;

    let err = ledger
        .transfers()
        .transfer(transfer(account, account, dec!(10.00)))
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::SameAccountTransfer(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_transfer_to_inactive_destination_posts_nothing() {
    let ledger = setup().await;
    let source = ledger.open_account("001-0001").await;
    let destination = ledger.open_account("001-0002").await;
    ledger.deposit(source, dec!(100.00), date(2024, 3, 1)).await;
    ledger
        .accounts()
        .set_status(destination, AccountStatus::Inactive)
        .await
        .expect("Failed to change status");

    let err = ledger
        .transfers()
        .transfer(transfer(source, destination, dec!(10.00)))
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::AccountNotActive { account_id, .. } if account_id == destination.into_inner()));
    assert_eq!(ledger.statement(source).await.len(), 1);
    assert_eq!(ledger.balance(source).await, dec!(100.00));
}
