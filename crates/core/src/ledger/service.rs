//! Ledger service for posting validation and transfer planning.
//!
//! This module provides the rules applied before a movement is persisted. The
//! database layer calls them inside the posting transaction, after it has read
//! (and locked) the account rows.

use chrono::Utc;
use rust_decimal::Decimal;
use tesoro_shared::types::{AccountId, CorrelationId, has_money_scale, round_money};

use super::error::LedgerError;
use super::types::{AccountStatus, MovementKind, MovementMetadata, NewMovement};

/// Information about an account needed for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// Lifecycle state.
    pub status: AccountStatus,
}

/// Input of an internal transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInput {
    /// Account debited.
    pub source: AccountId,
    /// Account credited.
    pub destination: AccountId,
    /// Amount moved.
    pub amount: Decimal,
    /// Reference copied onto both legs.
    pub reference: Option<String>,
    /// Caller identity.
    pub recorded_by: Option<String>,
}

/// Both legs of a transfer, ready to be appended in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    /// Shared by both legs.
    pub correlation_id: CorrelationId,
    /// TRANSFER_OUT on the source.
    pub outgoing: NewMovement,
    /// TRANSFER_IN on the destination.
    pub incoming: NewMovement,
}

/// Ledger service for posting validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validates a posting amount and returns it with a two-digit scale.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` if not positive, `InvalidScale` if it has more than two
    /// fractional digits.
    pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if !has_money_scale(amount) {
            return Err(LedgerError::InvalidScale(amount));
        }
        Ok(round_money(amount))
    }

    /// Fails unless the account accepts postings.
    pub fn ensure_active(account: AccountInfo) -> Result<(), LedgerError> {
        if account.status.is_active() {
            Ok(())
        } else {
            Err(LedgerError::AccountNotActive {
                account_id: account.id.into_inner(),
                status: account.status,
            })
        }
    }

    /// Fails if `requested` exceeds `balance`; the error echoes the balance.
    pub fn ensure_sufficient_funds(
        account_id: AccountId,
        balance: Decimal,
        requested: Decimal,
    ) -> Result<(), LedgerError> {
        if balance < requested {
            return Err(LedgerError::InsufficientFunds {
                account_id: account_id.into_inner(),
                balance: round_money(balance),
                requested: round_money(requested),
            });
        }
        Ok(())
    }

    /// Returns true if appending `kind` requires a sufficient-funds check.
    #[must_use]
    pub const fn needs_funds_check(kind: MovementKind, allow_overdraft: bool) -> bool {
        kind.is_debit() && !allow_overdraft
    }

    /// Fails if a transfer would go from an account to itself.
    pub fn ensure_distinct_accounts(
        source: AccountId,
        destination: AccountId,
    ) -> Result<(), LedgerError> {
        if source == destination {
            return Err(LedgerError::SameAccountTransfer(source.into_inner()));
        }
        Ok(())
    }

    /// Validates a transfer and builds both legs.
    ///
    /// Account state and funds are checked later by the caller, against rows
    /// read inside the posting transaction.
    pub fn plan_transfer(input: &TransferInput) -> Result<TransferPlan, LedgerError> {
        let amount = Self::validate_amount(input.amount)?;
        Self::ensure_distinct_accounts(input.source, input.destination)?;

        let correlation_id = CorrelationId::new();
        let now = Utc::now();
        let leg = |description: String| {
            let mut metadata = MovementMetadata::default()
                .with_description(description)
                .at(now);
            metadata.reference.clone_from(&input.reference);
            metadata.recorded_by.clone_from(&input.recorded_by);
            metadata
        };

        let outgoing = NewMovement::new(
            input.source,
            MovementKind::TransferOut,
            amount,
            leg(format!("Transfer to account {}", input.destination)),
        )
        .correlated(correlation_id);
        let incoming = NewMovement::new(
            input.destination,
            MovementKind::TransferIn,
            amount,
            leg(format!("Transfer from account {}", input.source)),
        )
        .correlated(correlation_id);

        Ok(TransferPlan {
            correlation_id,
            outgoing,
            incoming,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-5.00))]
    fn test_non_positive_amount_rejected(#[case] amount: Decimal) {
        assert!(matches!(
            LedgerService::validate_amount(amount),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_amount_scale() {
        assert_eq!(LedgerService::validate_amount(dec!(12.5)).unwrap().to_string(), "12.50");
        assert!(matches!(
            LedgerService::validate_amount(dec!(0.001)),
            Err(LedgerError::InvalidScale(_))
        ));
    }

    #[rstest]
    #[case(AccountStatus::Inactive)]
    #[case(AccountStatus::Closed)]
    fn test_inactive_account_rejected(#[case] status: AccountStatus) {
        let account = AccountInfo {
            id: AccountId::new(),
            status,
        };
        let err = LedgerService::ensure_active(account).unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotActive { status: s, .. } if s == status));
    }

    #[test]
    fn test_sufficient_funds() {
        let id = AccountId::new();
        assert!(LedgerService::ensure_sufficient_funds(id, dec!(70), dec!(70)).is_ok());
        let err = LedgerService::ensure_sufficient_funds(id, dec!(70), dec!(80)).unwrap_err();
        assert!(err.to_string().contains("balance 70.00"));
    }

    #[test]
    fn test_funds_check_only_for_debits() {
        assert!(LedgerService::needs_funds_check(MovementKind::Withdrawal, false));
        assert!(LedgerService::needs_funds_check(MovementKind::CheckIssued, false));
        assert!(!LedgerService::needs_funds_check(MovementKind::Deposit, false));
        assert!(!LedgerService::needs_funds_check(MovementKind::Withdrawal, true));
    }

    #[test]
    fn test_same_account_transfer_rejected() {
        let id = AccountId::new();
        let input = TransferInput {
            source: id,
            destination: id,
            amount: dec!(10),
            reference: None,
            recorded_by: None,
        };
        assert!(matches!(
            LedgerService::plan_transfer(&input),
            Err(LedgerError::SameAccountTransfer(_))
        ));
    }

    #[test]
    fn test_transfer_plan_mirrors_legs() {
        let input = TransferInput {
            source: AccountId::new(),
            destination: AccountId::new(),
            amount: dec!(25.00),
            reference: Some("TRF-7".into()),
            recorded_by: Some("treasurer".into()),
        };
        let plan = LedgerService::plan_transfer(&input).unwrap();

        assert_eq!(plan.outgoing.kind, MovementKind::TransferOut);
        assert_eq!(plan.incoming.kind, MovementKind::TransferIn);
        assert_eq!(plan.outgoing.account_id, input.source);
        assert_eq!(plan.incoming.account_id, input.destination);
        assert_eq!(plan.outgoing.correlation_id, Some(plan.correlation_id));
        assert_eq!(plan.incoming.correlation_id, Some(plan.correlation_id));
        assert_eq!(plan.outgoing.metadata.reference.as_deref(), Some("TRF-7"));
        assert_eq!(
            plan.outgoing.metadata.description,
            Some(format!("Transfer to account {}", input.destination))
        );
        assert_eq!(
            plan.incoming.metadata.description,
            Some(format!("Transfer from account {}", input.source))
        );
        assert_eq!(plan.outgoing.metadata.recorded_at, plan.incoming.metadata.recorded_at);
    }
}
