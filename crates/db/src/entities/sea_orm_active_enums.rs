//! Text-backed enumerations and their mapping to the core domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tesoro_core::check::CheckStatus as CoreCheckStatus;
use tesoro_core::ledger::{AccountStatus as CoreAccountStatus, MovementKind as CoreMovementKind};
use tesoro_core::payable::{InvoiceStatus as CoreInvoiceStatus, PaymentForm as CorePaymentForm};

/// Stored movement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum MovementKind {
    #[sea_orm(string_value = "DEPOSIT")]
    Deposit,
    #[sea_orm(string_value = "WITHDRAWAL")]
    Withdrawal,
    #[sea_orm(string_value = "TRANSFER_IN")]
    TransferIn,
    #[sea_orm(string_value = "TRANSFER_OUT")]
    TransferOut,
    #[sea_orm(string_value = "CHECK_ISSUED")]
    CheckIssued,
    #[sea_orm(string_value = "CHECK_CLEARED")]
    CheckCleared,
}

/// Stored account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum AccountStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

/// Stored check status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum CheckStatus {
    #[sea_orm(string_value = "ISSUED")]
    Issued,
    #[sea_orm(string_value = "CLEARED")]
    Cleared,
    #[sea_orm(string_value = "VOIDED")]
    Voided,
}

/// Stored invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PARTIAL")]
    Partial,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "VOIDED")]
    Voided,
}

/// Stored payment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PaymentForm {
    #[sea_orm(string_value = "TRANSFER")]
    Transfer,
    #[sea_orm(string_value = "DEPOSIT")]
    Deposit,
    #[sea_orm(string_value = "CHECK")]
    Check,
}

impl From<MovementKind> for CoreMovementKind {
    fn from(kind: MovementKind) -> Self {
        match kind {
            MovementKind::Deposit => Self::Deposit,
            MovementKind::Withdrawal => Self::Withdrawal,
            MovementKind::TransferIn => Self::TransferIn,
            MovementKind::TransferOut => Self::TransferOut,
            MovementKind::CheckIssued => Self::CheckIssued,
            MovementKind::CheckCleared => Self::CheckCleared,
        }
    }
}

impl From<CoreMovementKind> for MovementKind {
    fn from(kind: CoreMovementKind) -> Self {
        match kind {
            CoreMovementKind::Deposit => Self::Deposit,
            CoreMovementKind::Withdrawal => Self::Withdrawal,
            CoreMovementKind::TransferIn => Self::TransferIn,
            CoreMovementKind::TransferOut => Self::TransferOut,
            CoreMovementKind::CheckIssued => Self::CheckIssued,
            CoreMovementKind::CheckCleared => Self::CheckCleared,
        }
    }
}

impl From<AccountStatus> for CoreAccountStatus {
    fn from(status: AccountStatus) -> Self {
        match status {
            AccountStatus::Active => Self::Active,
            AccountStatus::Inactive => Self::Inactive,
            AccountStatus::Closed => Self::Closed,
        }
    }
}

impl From<CoreAccountStatus> for AccountStatus {
    fn from(status: CoreAccountStatus) -> Self {
        match status {
            CoreAccountStatus::Active => Self::Active,
            CoreAccountStatus::Inactive => Self::Inactive,
            CoreAccountStatus::Closed => Self::Closed,
        }
    }
}

impl From<CheckStatus> for CoreCheckStatus {
    fn from(status: CheckStatus) -> Self {
        match status {
            CheckStatus::Issued => Self::Issued,
            CheckStatus::Cleared => Self::Cleared,
            CheckStatus::Voided => Self::Voided,
        }
    }
}

impl From<CoreCheckStatus> for CheckStatus {
    fn from(status: CoreCheckStatus) -> Self {
        match status {
            CoreCheckStatus::Issued => Self::Issued,
            CoreCheckStatus::Cleared => Self::Cleared,
            CoreCheckStatus::Voided => Self::Voided,
        }
    }
}

impl From<InvoiceStatus> for CoreInvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Pending => Self::Pending,
            InvoiceStatus::Partial => Self::Partial,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Voided => Self::Voided,
        }
    }
}

impl From<CoreInvoiceStatus> for InvoiceStatus {
    fn from(status: CoreInvoiceStatus) -> Self {
        match status {
            CoreInvoiceStatus::Pending => Self::Pending,
            CoreInvoiceStatus::Partial => Self::Partial,
            CoreInvoiceStatus::Paid => Self::Paid,
            CoreInvoiceStatus::Voided => Self::Voided,
        }
    }
}

impl From<PaymentForm> for CorePaymentForm {
    fn from(form: PaymentForm) -> Self {
        match form {
            PaymentForm::Transfer => Self::Transfer,
            PaymentForm::Deposit => Self::Deposit,
            PaymentForm::Check => Self::Check,
        }
    }
}

impl From<CorePaymentForm> for PaymentForm {
    fn from(form: CorePaymentForm) -> Self {
        match form {
            CorePaymentForm::Transfer => Self::Transfer,
            CorePaymentForm::Deposit => Self::Deposit,
            CorePaymentForm::Check => Self::Check,
        }
    }
}
