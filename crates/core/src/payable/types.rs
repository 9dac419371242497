//! Payables domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tesoro_shared::types::{AccountId, CurrencyId, InvoiceId, SupplierId};

/// Lifecycle state of a purchase invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    /// Nothing paid yet.
    Pending,
    /// Partly paid.
    Partial,
    /// Fully paid (terminal).
    Paid,
    /// Voided (terminal).
    Voided,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Partial => "PARTIAL",
            Self::Paid => "PAID",
            Self::Voided => "VOIDED",
        }
    }

    /// Returns true while the invoice still expects payments.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Partial)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a supplier was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentForm {
    /// Bank transfer.
    Transfer,
    /// Deposit into the supplier's account.
    Deposit,
    /// Check.
    Check,
}

impl PaymentForm {
    /// Returns the string representation of the form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transfer => "TRANSFER",
            Self::Deposit => "DEPOSIT",
            Self::Check => "CHECK",
        }
    }
}

impl fmt::Display for PaymentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The fields of a stored invoice the payment rules need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSnapshot {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Issuing supplier.
    pub supplier_id: SupplierId,
    /// Invoice number.
    pub invoice_number: String,
    /// Current state.
    pub status: InvoiceStatus,
    /// Remaining amount to pay.
    pub outstanding: Decimal,
}

/// Input for registering a purchase invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoiceInput {
    /// Issuing supplier.
    pub supplier_id: SupplierId,
    /// Invoice number, unique per supplier.
    pub invoice_number: String,
    /// Currency of the invoice.
    pub currency_id: CurrencyId,
    /// Total amount.
    pub total_amount: Decimal,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Due date.
    pub due_on: Option<NaiveDate>,
}

/// Input for paying a supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayInvoiceInput {
    /// Supplier paid.
    pub supplier_id: SupplierId,
    /// Invoice settled by the payment, if any.
    pub invoice_id: Option<InvoiceId>,
    /// Paying account.
    pub account_id: AccountId,
    /// Amount.
    pub amount: Decimal,
    /// Payment form.
    pub form: PaymentForm,
    /// Bank-side reference of the payment.
    pub bank_reference: Option<String>,
    /// Notes; copied to the movement description.
    pub notes: Option<String>,
    /// Caller identity.
    pub recorded_by: Option<String>,
}
