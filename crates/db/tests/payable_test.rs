//! Integration tests for supplier invoices and payments.

mod common;

use common::{TestLedger, date, insert_supplier, setup};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tesoro_core::payable::{InvoiceStatus, NewInvoiceInput, PayInvoiceInput, PaymentForm};
use tesoro_core::{ErrorKind, LedgerError};
use tesoro_db::repositories::PayablesFilter;
use tesoro_shared::types::{AccountId, InvoiceId, SupplierId};

async fn create_invoice(
    ledger: &TestLedger,
    supplier_id: SupplierId,
    number: &str,
    total: Decimal,
    due_on: Option<chrono::NaiveDate>,
) -> InvoiceId {
    ledger
        .payables()
        .create_invoice(NewInvoiceInput {
            supplier_id,
            invoice_number: number.to_string(),
            currency_id: ledger.currency_id,
            total_amount: total,
            issued_on: date(2024, 5, 1),
            due_on,
        })
        .await
        .expect("Failed to create invoice")
}

fn payment(
    ledger: &TestLedger,
    account_id: AccountId,
    invoice_id: Option<InvoiceId>,
    amount: Decimal,
) -> PayInvoiceInput {
    PayInvoiceInput {
        supplier_id: ledger.supplier_id,
        invoice_id,
        account_id,
        amount,
        form: PaymentForm::Transfer,
        bank_reference: Some("WIRE-001".to_string()),
        notes: Some("May supplies".to_string()),
        recorded_by: Some("payables".to_string()),
    }
}

async fn funded_account(ledger: &TestLedger) -> AccountId {
    let account = ledger.open_account("001-0001").await;
    ledger.deposit(account, dec!(500.00), date(2024, 5, 1)).await;
    account
}

#[tokio::test]
async fn test_partial_then_full_payment_settles_invoice() {
    let ledger = setup().await;
    let account = funded_account(&ledger).await;
    let invoice = create_invoice(&ledger, ledger.supplier_id, "F-1001", dec!(100.00), None).await;

    let payment_id = ledger
        .payables()
        .pay_invoice(payment(&ledger, account, Some(invoice), dec!(40.00)))
        .await
        .expect("Failed to pay invoice");
    let partial = ledger.payables().get_invoice(invoice).await.expect("invoice");
    assert_eq!(partial.status, InvoiceStatus::Partial);
    assert_eq!(partial.outstanding_balance, dec!(60.00));

    let withdrawal = ledger.statement(account).await.pop().expect("payment movement");
    assert_eq!(withdrawal.payment_id, Some(payment_id));
    assert_eq!(withdrawal.external_reference, Some(payment_id.to_string()));
    assert!(withdrawal.reference.as_deref().is_some_and(|r| r.ends_with("Invoice: F-1001")));
    assert_eq!(withdrawal.description.as_deref(), Some("May supplies"));

    ledger
        .payables()
        .pay_invoice(payment(&ledger, account, Some(invoice), dec!(60.00)))
        .await
        .expect("Failed to pay invoice");
    let paid = ledger.payables().get_invoice(invoice).await.expect("invoice");
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert_eq!(paid.outstanding_balance, dec!(0));

    let err = ledger
        .payables()
        .pay_invoice(payment(&ledger, account, Some(invoice), dec!(10.00)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvoiceAlreadyPaid(_)));
    assert_eq!(ledger.balance(account).await, dec!(400.00));
}

#[tokio::test]
async fn test_overpayment_fails_and_posts_nothing() {
    let ledger = setup().await;
    let account = funded_account(&ledger).await;
    let invoice = create_invoice(&ledger, ledger.supplier_id, "F-1002", dec!(50.00), None).await;

    let err = ledger
        .payables()
        .pay_invoice(payment(&ledger, account, Some(invoice), dec!(60.00)))
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::PaymentExceedsOutstanding { .. }));
    assert_eq!(ledger.statement(account).await.len(), 1);
    let history = ledger
        .payables()
        .payment_history(PayablesFilter::default())
        .await
        .expect("Failed to read history");
    assert!(history.is_empty());
    let untouched = ledger.payables().get_invoice(invoice).await.expect("invoice");
    assert_eq!(untouched.status, InvoiceStatus::Pending);
}

#[tokio::test]
async fn test_payment_beyond_balance_is_rejected() {
    let ledger = setup().await;
    let account = ledger.open_account("001-0001").await;
    ledger.deposit(account, dec!(20.00), date(2024, 5, 1)).await;
    let invoice = create_invoice(&ledger, ledger.supplier_id, "F-1003", dec!(50.00), None).await;

    let err = ledger
        .payables()
        .pay_invoice(payment(&ledger, account, Some(invoice), dec!(50.00)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    let untouched = ledger.payables().get_invoice(invoice).await.expect("invoice");
    assert_eq!(untouched.outstanding_balance, dec!(50.00));
}

#[tokio::test]
async fn test_voided_invoice_rejects_payment_and_second_void() {
    let ledger = setup().await;
    let account = funded_account(&ledger).await;
    let invoice = create_invoice(&ledger, ledger.supplier_id, "F-1004", dec!(80.00), None).await;

    let voided = ledger.payables().void_invoice(invoice).await.expect("Failed to void");
    assert_eq!(voided.status, InvoiceStatus::Voided);

    let err = ledger
        .payables()
        .pay_invoice(payment(&ledger, account, Some(invoice), dec!(10.00)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvoiceVoided(_)));

    let err = ledger.payables().void_invoice(invoice).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
}

#[tokio::test]
async fn test_paid_invoice_cannot_be_voided() {
    let ledger = setup().await;
    let account = funded_account(&ledger).await;
    let invoice = create_invoice(&ledger, ledger.supplier_id, "F-1005", dec!(30.00), None).await;
    ledger
        .payables()
        .pay_invoice(payment(&ledger, account, Some(invoice), dec!(30.00)))
        .await
        .expect("Failed to pay invoice");

    let err = ledger.payables().void_invoice(invoice).await.unwrap_err();
    assert!(matches!(err, LedgerError::CannotVoidPaidInvoice(_)));
}

#[tokio::test]
async fn test_invoice_of_another_supplier_is_rejected() {
    let ledger = setup().await;
    let account = funded_account(&ledger).await;
    let other = insert_supplier(&ledger.db, "Other Supplier").await;
    let invoice = create_invoice(&ledger, other, "F-2001", dec!(30.00), None).await;

    let err = ledger
        .payables()
        .pay_invoice(payment(&ledger, account, Some(invoice), dec!(10.00)))
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::InvoiceSupplierMismatch { .. }));
    assert_eq!(ledger.balance(account).await, dec!(500.00));
}

#[tokio::test]
async fn test_payment_without_invoice_appears_in_history() {
    let ledger = setup().await;
    let account = funded_account(&ledger).await;

    let payment_id = ledger
        .payables()
        .pay_invoice(payment(&ledger, account, None, dec!(25.50)))
        .await
        .expect("Failed to pay supplier");

    let history = ledger
        .payables()
        .payment_history(PayablesFilter {
            supplier_id: Some(ledger.supplier_id),
            ..PayablesFilter::default()
        })
        .await
        .expect("Failed to read history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].payment_id, payment_id);
    assert_eq!(history[0].supplier_name.as_deref(), Some("ACME Supplies"));
    assert_eq!(history[0].invoice_id, None);

    let withdrawal = ledger.statement(account).await.pop().expect("payment movement");
    assert!(withdrawal.reference.as_deref().is_some_and(|r| r.ends_with("Invoice: N/A")));
    assert_eq!(ledger.balance(account).await, dec!(474.50));
}

#[tokio::test]
async fn test_open_invoices_sorted_by_due_date_with_undated_last() {
    let ledger = setup().await;
    let account = funded_account(&ledger).await;
    let supplier = ledger.supplier_id;

    create_invoice(&ledger, supplier, "F-3001", dec!(10.00), Some(date(2024, 5, 20))).await;
    create_invoice(&ledger, supplier, "F-3002", dec!(10.00), None).await;
    create_invoice(&ledger, supplier, "F-3003", dec!(10.00), Some(date(2024, 5, 10))).await;
    let settled = create_invoice(&ledger, supplier, "F-3004", dec!(10.00), Some(date(2024, 5, 1))).await;
    ledger
        .payables()
        .pay_invoice(payment(&ledger, account, Some(settled), dec!(10.00)))
        .await
        .expect("Failed to pay invoice");

    let open = ledger
        .payables()
        .open_invoices(supplier, None)
        .await
        .expect("Failed to list open invoices");
    let numbers: Vec<_> = open.iter().map(|i| i.invoice_number.as_str()).collect();
    assert_eq!(numbers, vec!["F-3003", "F-3001", "F-3002"]);

    let first = ledger
        .payables()
        .open_invoices(supplier, Some(1))
        .await
        .expect("Failed to list open invoices");
    assert_eq!(first.len(), 1);
}

#[tokio::test]
async fn test_paid_invoices_report_totals() {
    let ledger = setup().await;
    let account = funded_account(&ledger).await;
    let small = create_invoice(&ledger, ledger.supplier_id, "F-4001", dec!(20.00), None).await;
    let large = create_invoice(&ledger, ledger.supplier_id, "F-4002", dec!(90.00), None).await;

    for (invoice, amount) in [(small, dec!(20.00)), (large, dec!(45.00)), (large, dec!(45.00))] {
        ledger
            .payables()
            .pay_invoice(payment(&ledger, account, Some(invoice), amount))
            .await
            .expect("Failed to pay invoice");
    }

    let report = ledger
        .payables()
        .paid_invoices(PayablesFilter::default())
        .await
        .expect("Failed to read report");

    assert_eq!(report.len(), 2);
    assert_eq!(report[0].invoice_id, large);
    assert_eq!(report[0].total_paid, dec!(90.00));
    assert!(report[0].last_payment_at.is_some());
    assert_eq!(report[1].invoice_id, small);
    assert_eq!(report[1].supplier_name.as_deref(), Some("ACME Supplies"));

    let none_in_range = ledger
        .payables()
        .paid_invoices(PayablesFilter {
            to: Some(date(2024, 1, 1)),
            ..PayablesFilter::default()
        })
        .await
        .expect("Failed to read report");
    assert!(none_in_range.is_empty());
}

#[tokio::test]
async fn test_duplicate_invoice_number_is_conflict() {
    let ledger = setup().await;
    create_invoice(&ledger, ledger.supplier_id, "F-5001", dec!(10.00), None).await;

    let err = ledger
        .payables()
        .create_invoice(NewInvoiceInput {
            supplier_id: ledger.supplier_id,
            invoice_number: "F-5001".to_string(),
            currency_id: ledger.currency_id,
            total_amount: dec!(12.00),
            issued_on: date(2024, 5, 2),
            due_on: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::DuplicateInvoiceNumber { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}
