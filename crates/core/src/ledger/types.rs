//! Domain types for ledger postings.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tesoro_shared::types::{AccountId, CheckId, CorrelationId, PaymentId};

/// The side of the balance a movement lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Increases the balance.
    Credit,
    /// Decreases the balance.
    Debit,
}

/// Kind of a ledger movement. The kind alone decides the sign.
///
/// Credit kinds: `Deposit`, `TransferIn`, `CheckCleared`.
/// Debit kinds: `Withdrawal`, `TransferOut`, `CheckIssued`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Money paid into the account.
    Deposit,
    /// Money taken out of the account.
    Withdrawal,
    /// Incoming leg of an internal transfer.
    TransferIn,
    /// Outgoing leg of an internal transfer.
    TransferOut,
    /// A check written against the account.
    CheckIssued,
    /// A check credited to the account.
    CheckCleared,
}

impl MovementKind {
    /// Every movement kind.
    pub const ALL: [Self; 6] = [
        Self::Deposit,
        Self::Withdrawal,
        Self::TransferIn,
        Self::TransferOut,
        Self::CheckIssued,
        Self::CheckCleared,
    ];

    /// Returns the balance direction of this kind.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Deposit | Self::TransferIn | Self::CheckCleared => Direction::Credit,
            Self::Withdrawal | Self::TransferOut | Self::CheckIssued => Direction::Debit,
        }
    }

    /// Returns true for kinds that take money out of the account.
    #[must_use]
    pub const fn is_debit(self) -> bool {
        matches!(self.direction(), Direction::Debit)
    }

    /// Returns true for the kinds owned by the check lifecycle.
    #[must_use]
    pub const fn is_check_movement(self) -> bool {
        matches!(self, Self::CheckIssued | Self::CheckCleared)
    }

    /// Applies the kind's sign to a stored (always positive) amount.
    #[must_use]
    pub fn signed_amount(self, amount: Decimal) -> Decimal {
        match self.direction() {
            Direction::Credit => amount,
            Direction::Debit => -amount,
        }
    }

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::TransferIn => "TRANSFER_IN",
            Self::TransferOut => "TRANSFER_OUT",
            Self::CheckIssued => "CHECK_ISSUED",
            Self::CheckCleared => "CHECK_CLEARED",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    /// The account accepts postings.
    Active,
    /// Postings are suspended.
    Inactive,
    /// The account is closed for good.
    Closed,
}

impl AccountStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Closed => "CLOSED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "INACTIVE" => Some(Self::Inactive),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Returns true if the account accepts postings.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// A closed account never changes state again.
    #[must_use]
    pub const fn can_change(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive fields attached to a posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementMetadata {
    /// Short human-readable reference.
    pub reference: Option<String>,
    /// Longer free-text description.
    pub description: Option<String>,
    /// Idempotency key and link to the originating business event.
    pub external_reference: Option<String>,
    /// Caller identity recorded on the movement.
    pub recorded_by: Option<String>,
    /// Timestamp of the movement. Defaults to the time of posting.
    pub recorded_at: Option<DateTime<Utc>>,
}

impl MovementMetadata {
    /// Sets the reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the external reference used for idempotent appends.
    #[must_use]
    pub fn with_external_reference(mut self, external_reference: impl Into<String>) -> Self {
        self.external_reference = Some(external_reference.into());
        self
    }

    /// Sets the recording actor.
    #[must_use]
    pub fn recorded_by(mut self, actor: impl Into<String>) -> Self {
        self.recorded_by = Some(actor.into());
        self
    }

    /// Pins the movement timestamp.
    #[must_use]
    pub fn at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }
}

/// A movement ready to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    /// Owning account.
    pub account_id: AccountId,
    /// Movement kind.
    pub kind: MovementKind,
    /// Positive amount; the kind carries the sign.
    pub amount: Decimal,
    /// Reference, description, idempotency key and actor.
    pub metadata: MovementMetadata,
    /// Links the legs of a multi-leg operation.
    pub correlation_id: Option<CorrelationId>,
    /// Whether the movement is born reconciled.
    pub reconciled: bool,
    /// Check that originated this movement.
    pub check_id: Option<CheckId>,
    /// Supplier payment that originated this movement.
    pub payment_id: Option<PaymentId>,
}

impl NewMovement {
    /// Creates an unreconciled movement without links.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        kind: MovementKind,
        amount: Decimal,
        metadata: MovementMetadata,
    ) -> Self {
        Self {
            account_id,
            kind,
            amount,
            metadata,
            correlation_id: None,
            reconciled: false,
            check_id: None,
            payment_id: None,
        }
    }

    /// Sets the correlation id.
    #[must_use]
    pub fn correlated(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// The slice of a stored movement the balance calculator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementLine {
    /// Movement kind.
    pub kind: MovementKind,
    /// Positive amount.
    pub amount: Decimal,
    /// Calendar date (UTC) of the movement.
    pub recorded_on: NaiveDate,
    /// Reconciled flag.
    pub reconciled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(MovementKind::Deposit, dec!(10.00))]
    #[case(MovementKind::TransferIn, dec!(10.00))]
    #[case(MovementKind::CheckCleared, dec!(10.00))]
    #[case(MovementKind::Withdrawal, dec!(-10.00))]
    #[case(MovementKind::TransferOut, dec!(-10.00))]
    #[case(MovementKind::CheckIssued, dec!(-10.00))]
    fn test_signed_amount(#[case] kind: MovementKind, #[case] expected: Decimal) {
        assert_eq!(kind.signed_amount(dec!(10.00)), expected);
    }

    #[test]
    fn test_kind_parse_round_trips() {
        for kind in MovementKind::ALL {
            assert_eq!(MovementKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MovementKind::parse("transfer_in"), Some(MovementKind::TransferIn));
        assert_eq!(MovementKind::parse("REFUND"), None);
    }

    #[test]
    fn test_check_movements() {
        let check_kinds: Vec<_> = MovementKind::ALL
            .into_iter()
            .filter(|kind| kind.is_check_movement())
            .collect();
        assert_eq!(
            check_kinds,
            vec![MovementKind::CheckIssued, MovementKind::CheckCleared]
        );
    }

    #[test]
    fn test_account_status() {
        assert!(AccountStatus::Active.is_active());
        assert!(!AccountStatus::Inactive.is_active());
        assert!(AccountStatus::Inactive.can_change());
        assert!(!AccountStatus::Closed.can_change());
        assert_eq!(AccountStatus::parse("closed"), Some(AccountStatus::Closed));
        assert_eq!(AccountStatus::Active.to_string(), "ACTIVE");
    }

    #[test]
    fn test_metadata_builder() {
        let metadata = MovementMetadata::default()
            .with_reference("REF-1")
            .with_external_reference("EXT-1")
            .recorded_by("teller");
        assert_eq!(metadata.reference.as_deref(), Some("REF-1"));
        assert_eq!(metadata.external_reference.as_deref(), Some("EXT-1"));
        assert_eq!(metadata.recorded_by.as_deref(), Some("teller"));
        assert!(metadata.description.is_none());
    }
}
