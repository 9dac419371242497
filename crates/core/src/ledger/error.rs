//! Error taxonomy of the posting engine.
//!
//! Every engine operation fails with one `LedgerError`. Each variant belongs to
//! exactly one [`ErrorKind`], which the boundary layer maps to a transport status.

use rust_decimal::Decimal;
use tesoro_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::check::types::CheckStatus;
use crate::ledger::types::AccountStatus;

/// Error classes of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,
    /// A referenced row does not exist.
    NotFound,
    /// The target is in a state that forbids the operation.
    PreconditionFailed,
    /// Balance below the requested amount.
    InsufficientFunds,
    /// Duplicate unique key.
    Conflict,
    /// Data-integrity violation or storage failure.
    Internal,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount is zero or negative.
    #[error("Amount must be greater than zero, got {0}")]
    InvalidAmount(Decimal),

    /// Amount carries more than two fractional digits.
    #[error("Amount {0} has more than two decimal places")]
    InvalidScale(Decimal),

    /// Other malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    // ========== Not Found ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Bank not found.
    #[error("Bank not found: {0}")]
    BankNotFound(Uuid),

    /// Check not found.
    #[error("Check not found: {0}")]
    CheckNotFound(Uuid),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Supplier not found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(Uuid),

    /// A reference catalog row (account type, currency, check type) is missing.
    #[error("{catalog} not found: {id}")]
    CatalogEntryNotFound {
        /// Catalog name.
        catalog: &'static str,
        /// Requested id.
        id: Uuid,
    },

    // ========== Precondition Errors ==========
    /// Account is not in state ACTIVE.
    #[error("Account {account_id} is not active (status {status})")]
    AccountNotActive {
        /// The account ID.
        account_id: Uuid,
        /// Its current status.
        status: AccountStatus,
    },

    /// Closed accounts never change state.
    #[error("Account {0} is closed")]
    AccountClosed(Uuid),

    /// Bank is inactive.
    #[error("Bank {0} is inactive")]
    BankInactive(Uuid),

    /// Check lifecycle does not allow the transition.
    #[error("Check {check_id} cannot move from {from} to {to}")]
    InvalidCheckTransition {
        /// The check ID.
        check_id: Uuid,
        /// The current status.
        from: CheckStatus,
        /// The attempted target status.
        to: CheckStatus,
    },

    /// Invoice has been voided.
    #[error("Invoice {0} is voided")]
    InvoiceVoided(Uuid),

    /// Invoice has no outstanding balance left.
    #[error("Invoice {0} is already paid")]
    InvoiceAlreadyPaid(Uuid),

    /// Paid invoices cannot be voided.
    #[error("Invoice {0} is paid and cannot be voided")]
    CannotVoidPaidInvoice(Uuid),

    /// Invoice belongs to another supplier.
    #[error("Invoice {invoice_id} does not belong to supplier {supplier_id}")]
    InvoiceSupplierMismatch {
        /// The invoice ID.
        invoice_id: Uuid,
        /// The supplier named by the caller.
        supplier_id: Uuid,
    },

    /// Payment is larger than what is left to pay.
    #[error("Payment of {amount} exceeds outstanding balance {outstanding} of invoice {invoice_id}")]
    PaymentExceedsOutstanding {
        /// The invoice ID.
        invoice_id: Uuid,
        /// Requested payment.
        amount: Decimal,
        /// Outstanding balance.
        outstanding: Decimal,
    },

    // ========== Funds ==========
    /// Balance below the requested amount.
    #[error("Insufficient funds in account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The account ID.
        account_id: Uuid,
        /// Current balance.
        balance: Decimal,
        /// Requested amount.
        requested: Decimal,
    },

    // ========== Conflicts ==========
    /// Transfer source and destination are the same account.
    #[error("Cannot transfer from account {0} to itself")]
    SameAccountTransfer(Uuid),

    /// Account number already used in the bank.
    #[error("Account number {account_number} already exists in bank {bank_id}")]
    DuplicateAccountNumber {
        /// The bank ID.
        bank_id: Uuid,
        /// The duplicated number.
        account_number: String,
    },

    /// Check number already used on the account.
    #[error("Check number {check_number} already exists on account {account_id}")]
    DuplicateCheckNumber {
        /// The account ID.
        account_id: Uuid,
        /// The duplicated number.
        check_number: String,
    },

    /// Invoice number already used by the supplier.
    #[error("Invoice number {invoice_number} already exists for supplier {supplier_id}")]
    DuplicateInvoiceNumber {
        /// The supplier ID.
        supplier_id: Uuid,
        /// The duplicated number.
        invoice_number: String,
    },

    /// Storage-level uniqueness violation, e.g. a racing duplicate movement.
    #[error("Conflict: {0}")]
    Conflict(String),

    // ========== Internal Errors ==========
    /// A check's originating movement is gone.
    #[error("Originating movement of check {0} is missing")]
    MissingCheckMovement(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the taxonomy class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount(_) | Self::InvalidScale(_) | Self::Validation(_) => {
                ErrorKind::Validation
            }
            Self::AccountNotFound(_)
            | Self::BankNotFound(_)
            | Self::CheckNotFound(_)
            | Self::InvoiceNotFound(_)
            | Self::SupplierNotFound(_)
            | Self::CatalogEntryNotFound { .. } => ErrorKind::NotFound,
            Self::AccountNotActive { .. }
            | Self::AccountClosed(_)
            | Self::BankInactive(_)
            | Self::InvalidCheckTransition { .. }
            | Self::InvoiceVoided(_)
            | Self::InvoiceAlreadyPaid(_)
            | Self::CannotVoidPaidInvoice(_)
            | Self::InvoiceSupplierMismatch { .. }
            | Self::PaymentExceedsOutstanding { .. } => ErrorKind::PreconditionFailed,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::SameAccountTransfer(_)
            | Self::DuplicateAccountNumber { .. }
            | Self::DuplicateCheckNumber { .. }
            | Self::DuplicateInvoiceNumber { .. }
            | Self::Conflict(_) => ErrorKind::Conflict,
            Self::MissingCheckMovement(_) | Self::Database(_) | Self::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidScale(_) => "INVALID_AMOUNT_SCALE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::BankNotFound(_) => "BANK_NOT_FOUND",
            Self::CheckNotFound(_) => "CHECK_NOT_FOUND",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::SupplierNotFound(_) => "SUPPLIER_NOT_FOUND",
            Self::CatalogEntryNotFound { .. } => "CATALOG_ENTRY_NOT_FOUND",
            Self::AccountNotActive { .. } => "ACCOUNT_NOT_ACTIVE",
            Self::AccountClosed(_) => "ACCOUNT_CLOSED",
            Self::BankInactive(_) => "BANK_INACTIVE",
            Self::InvalidCheckTransition { .. } => "INVALID_CHECK_STATE",
            Self::InvoiceVoided(_) => "INVOICE_VOIDED",
            Self::InvoiceAlreadyPaid(_) => "INVOICE_ALREADY_PAID",
            Self::CannotVoidPaidInvoice(_) => "INVOICE_PAID",
            Self::InvoiceSupplierMismatch { .. } => "INVOICE_SUPPLIER_MISMATCH",
            Self::PaymentExceedsOutstanding { .. } => "PAYMENT_EXCEEDS_OUTSTANDING",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::SameAccountTransfer(_) => "SAME_ACCOUNT_TRANSFER",
            Self::DuplicateAccountNumber { .. } => "DUPLICATE_ACCOUNT_NUMBER",
            Self::DuplicateCheckNumber { .. } => "DUPLICATE_CHECK_NUMBER",
            Self::DuplicateInvoiceNumber { .. } => "DUPLICATE_INVOICE_NUMBER",
            Self::Conflict(_) => "CONFLICT",
            Self::MissingCheckMovement(_) => "MISSING_CHECK_MOVEMENT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::PreconditionFailed | ErrorKind::InsufficientFunds => 422,
            ErrorKind::Internal => 500,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::PreconditionFailed => Self::PreconditionFailed(message),
            ErrorKind::InsufficientFunds => Self::InsufficientFunds(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Internal if matches!(err, LedgerError::Database(_)) => {
                Self::Database(message)
            }
            ErrorKind::Internal => Self::Internal(message),
        }
    }
}
