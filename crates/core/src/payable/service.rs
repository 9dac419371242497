//! Invoice and payment rules.

use rust_decimal::Decimal;
use tesoro_shared::types::{CorrelationId, PaymentId, SupplierId, has_money_scale, round_money};

use super::types::{InvoiceSnapshot, InvoiceStatus, NewInvoiceInput, PayInvoiceInput};
use crate::ledger::error::LedgerError;
use crate::ledger::types::{MovementKind, MovementMetadata, NewMovement};

/// New outstanding balance and state of an invoice after a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentApplication {
    /// Remaining amount to pay.
    pub outstanding: Decimal,
    /// Derived state.
    pub status: InvoiceStatus,
}

/// Stateless service for payables rules.
pub struct PayablesService;

impl PayablesService {
    /// Validates a new invoice and returns its total with a two-digit scale.
    pub fn validate_new_invoice(input: &NewInvoiceInput) -> Result<Decimal, LedgerError> {
        if input.invoice_number.trim().is_empty() {
            return Err(LedgerError::Validation("invoice number is required".into()));
        }
        if input.total_amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(input.total_amount));
        }
        if !has_money_scale(input.total_amount) {
            return Err(LedgerError::InvalidScale(input.total_amount));
        }
        if input.due_on.is_some_and(|due| due < input.issued_on) {
            return Err(LedgerError::Validation(
                "due date precedes issue date".into(),
            ));
        }
        Ok(round_money(input.total_amount))
    }

    /// Checks that `amount` may be applied to the invoice by `supplier_id`.
    pub fn validate_payment(
        invoice: &InvoiceSnapshot,
        supplier_id: SupplierId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let invoice_id = invoice.id.into_inner();
        if invoice.supplier_id != supplier_id {
            return Err(LedgerError::InvoiceSupplierMismatch {
                invoice_id,
                supplier_id: supplier_id.into_inner(),
            });
        }
        if invoice.status == InvoiceStatus::Voided {
            return Err(LedgerError::InvoiceVoided(invoice_id));
        }
        if invoice.outstanding <= Decimal::ZERO {
            return Err(LedgerError::InvoiceAlreadyPaid(invoice_id));
        }
        if amount > invoice.outstanding {
            return Err(LedgerError::PaymentExceedsOutstanding {
                invoice_id,
                amount,
                outstanding: invoice.outstanding,
            });
        }
        Ok(())
    }

    /// Reduces the outstanding balance and derives the new state.
    ///
    /// Must be called on an invoice read under a row lock.
    pub fn apply_payment(
        invoice: &InvoiceSnapshot,
        amount: Decimal,
    ) -> Result<PaymentApplication, LedgerError> {
        Self::validate_payment(invoice, invoice.supplier_id, amount)?;
        let outstanding = round_money(invoice.outstanding - amount);
        let status = if outstanding.is_zero() {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::Partial
        };
        Ok(PaymentApplication {
            outstanding,
            status,
        })
    }

    /// Checks that the invoice may be voided.
    pub fn void(invoice: &InvoiceSnapshot) -> Result<InvoiceStatus, LedgerError> {
        match invoice.status {
            InvoiceStatus::Pending | InvoiceStatus::Partial => Ok(InvoiceStatus::Voided),
            InvoiceStatus::Paid => Err(LedgerError::CannotVoidPaidInvoice(invoice.id.into_inner())),
            InvoiceStatus::Voided => Err(LedgerError::InvoiceVoided(invoice.id.into_inner())),
        }
    }

    /// Builds the WITHDRAWAL paired with a supplier payment.
    #[must_use]
    pub fn payment_movement(
        payment_id: PaymentId,
        input: &PayInvoiceInput,
        amount: Decimal,
        invoice_number: Option<&str>,
        correlation_id: CorrelationId,
    ) -> NewMovement {
        let mut metadata = MovementMetadata::default()
            .with_reference(format!(
                "Payment to supplier {} - Invoice: {}",
                input.supplier_id,
                invoice_number.unwrap_or("N/A")
            ))
            .with_external_reference(payment_id.to_string());
        metadata.description.clone_from(&input.notes);
        metadata.recorded_by.clone_from(&input.recorded_by);

        let mut movement =
            NewMovement::new(input.account_id, MovementKind::Withdrawal, amount, metadata)
                .correlated(correlation_id);
        movement.payment_id = Some(payment_id);
        movement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use tesoro_shared::types::{AccountId, CurrencyId, InvoiceId};

    use crate::payable::types::PaymentForm;

    fn invoice(status: InvoiceStatus, outstanding: Decimal) -> InvoiceSnapshot {
        InvoiceSnapshot {
            id: InvoiceId::new(),
            supplier_id: SupplierId::new(),
            invoice_number: "F-001".into(),
            status,
            outstanding,
        }
    }

    #[test]
    fn test_partial_then_full_payment() {
        let open = invoice(InvoiceStatus::Pending, dec!(100.00));
        let first = PayablesService::apply_payment(&open, dec!(40.00)).unwrap();
        assert_eq!(first.outstanding, dec!(60.00));
        assert_eq!(first.status, InvoiceStatus::Partial);

        let partial = InvoiceSnapshot {
            status: first.status,
            outstanding: first.outstanding,
            ..open
        };
        let second = PayablesService::apply_payment(&partial, dec!(60.00)).unwrap();
        assert!(second.outstanding.is_zero());
        assert_eq!(second.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_payment_rejections() {
        let paid = invoice(InvoiceStatus::Paid, dec!(0));
        assert!(matches!(
            PayablesService::apply_payment(&paid, dec!(1)),
            Err(LedgerError::InvoiceAlreadyPaid(_))
        ));

        let voided = invoice(InvoiceStatus::Voided, dec!(50));
        assert!(matches!(
            PayablesService::apply_payment(&voided, dec!(1)),
            Err(LedgerError::InvoiceVoided(_))
        ));

        let open = invoice(InvoiceStatus::Partial, dec!(50));
        assert!(matches!(
            PayablesService::apply_payment(&open, dec!(50.01)),
            Err(LedgerError::PaymentExceedsOutstanding { .. })
        ));
        assert!(matches!(
            PayablesService::validate_payment(&open, SupplierId::new(), dec!(1)),
            Err(LedgerError::InvoiceSupplierMismatch { .. })
        ));
    }

    #[rstest]
    #[case(InvoiceStatus::Pending, true)]
    #[case(InvoiceStatus::Partial, true)]
    #[case(InvoiceStatus::Paid, false)]
    #[case(InvoiceStatus::Voided, false)]
    fn test_void_rules(#[case] status: InvoiceStatus, #[case] allowed: bool) {
        let result = PayablesService::void(&invoice(status, dec!(10)));
        assert_eq!(result.is_ok(), allowed);
        assert_eq!(status.is_open(), allowed);
    }

    #[test]
    fn test_validate_new_invoice() {
        let issued_on = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut input = NewInvoiceInput {
            supplier_id: SupplierId::new(),
            invoice_number: "F-9".into(),
            currency_id: CurrencyId::new(),
            total_amount: dec!(0),
            issued_on,
            due_on: None,
        };
        assert_eq!(PayablesService::validate_new_invoice(&input).unwrap(), dec!(0));

        input.total_amount = dec!(-1);
        assert!(PayablesService::validate_new_invoice(&input).is_err());

        input.total_amount = dec!(10);
        input.due_on = issued_on.pred_opt();
        assert!(matches!(
            PayablesService::validate_new_invoice(&input),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_payment_movement() {
        let input = PayInvoiceInput {
            supplier_id: SupplierId::new(),
            invoice_id: None,
            account_id: AccountId::new(),
            amount: dec!(15.00),
            form: PaymentForm::Transfer,
            bank_reference: None,
            notes: Some("March services".into()),
            recorded_by: None,
        };
        let payment_id = PaymentId::new();
        let movement = PayablesService::payment_movement(
            payment_id,
            &input,
            dec!(15.00),
            None,
            CorrelationId::new(),
        );
        assert_eq!(movement.kind, MovementKind::Withdrawal);
        assert_eq!(movement.payment_id, Some(payment_id));
        assert_eq!(movement.metadata.external_reference, Some(payment_id.to_string()));
        assert_eq!(movement.metadata.description.as_deref(), Some("March services"));
        assert!(
            movement
                .metadata
                .reference
                .as_deref()
                .is_some_and(|r| r.ends_with("Invoice: N/A"))
        );
    }
}
