//! Reconciliation result records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoro_shared::types::{CheckId, MovementId};

use crate::check::types::CheckStatus;
use crate::ledger::types::MovementKind;

/// Book and bank figures at a cut-off date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationFigures {
    /// Last calendar date included.
    pub cutoff_date: NaiveDate,
    /// Balance reported by the bank.
    pub bank_balance: Decimal,
    /// Book balance over every movement up to the cut-off.
    pub book_balance_total: Decimal,
    /// Book balance over the unreconciled movements only.
    pub book_balance_unreconciled: Decimal,
    /// `bank_balance - book_balance_total`, rounded half-up.
    pub difference: Decimal,
}

/// A movement not yet matched against the bank statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingMovement {
    /// Movement ID.
    pub movement_id: MovementId,
    /// Timestamp.
    pub recorded_at: DateTime<Utc>,
    /// Kind.
    pub kind: MovementKind,
    /// Positive amount.
    pub amount: Decimal,
    /// Reconciled flag.
    pub reconciled: bool,
    /// Reference.
    pub reference: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// An issued check the bank has not paid yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingCheck {
    /// Check ID.
    pub check_id: CheckId,
    /// Check number.
    pub check_number: String,
    /// Payee.
    pub beneficiary: String,
    /// Amount.
    pub amount: Decimal,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Current state.
    pub status: CheckStatus,
}

/// Items explaining a book-versus-bank gap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingItems {
    /// Unreconciled non-check movements.
    pub movements: Vec<OutstandingMovement>,
    /// Issued checks.
    pub checks: Vec<OutstandingCheck>,
    /// Signed sum of `movements`.
    pub movements_total: Decimal,
    /// Sum of check amounts.
    pub checks_total: Decimal,
}
