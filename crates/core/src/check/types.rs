//! Check domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tesoro_shared::types::{AccountId, CheckId, CheckTypeId};

/// Lifecycle state of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    /// Written and handed out; the amount is already debited.
    Issued,
    /// Presented and paid by the bank (terminal).
    Cleared,
    /// Cancelled; the amount was credited back (terminal).
    Voided,
}

impl CheckStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issued => "ISSUED",
            Self::Cleared => "CLEARED",
            Self::Voided => "VOIDED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ISSUED" => Some(Self::Issued),
            "CLEARED" => Some(Self::Cleared),
            "VOIDED" => Some(Self::Voided),
            _ => None,
        }
    }

    /// Returns true if no transition leaves this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cleared | Self::Voided)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for issuing a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCheckInput {
    /// Account the check is drawn on.
    pub account_id: AccountId,
    /// Check type catalog entry.
    pub check_type_id: CheckTypeId,
    /// Number printed on the check, unique per account.
    pub check_number: String,
    /// Payee.
    pub beneficiary: String,
    /// Amount.
    pub amount: Decimal,
    /// Movement reference; defaults to `Check {number} to {beneficiary}`.
    pub reference: Option<String>,
    /// Issue date; defaults to today.
    pub issued_on: Option<NaiveDate>,
    /// Caller identity.
    pub recorded_by: Option<String>,
}

/// The fields of a stored check the lifecycle rules need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    /// Check ID.
    pub id: CheckId,
    /// Issuing account.
    pub account_id: AccountId,
    /// Check number.
    pub check_number: String,
    /// Amount.
    pub amount: Decimal,
    /// Current state.
    pub status: CheckStatus,
}
