//! State machine and postings of the check lifecycle.

use rust_decimal::Decimal;
use tesoro_shared::types::{CheckId, CorrelationId};

use super::types::{CheckRecord, CheckStatus, IssueCheckInput};
use crate::ledger::error::LedgerError;
use crate::ledger::service::LedgerService;
use crate::ledger::types::{MovementKind, MovementMetadata, NewMovement};

/// Stateless service for check transitions.
pub struct CheckLifecycle;

impl CheckLifecycle {
    /// Validates an issue request and returns the normalized amount.
    pub fn validate_issue(input: &IssueCheckInput) -> Result<Decimal, LedgerError> {
        if input.check_number.trim().is_empty() {
            return Err(LedgerError::Validation("check number is required".into()));
        }
        if input.beneficiary.trim().is_empty() {
            return Err(LedgerError::Validation("beneficiary is required".into()));
        }
        LedgerService::validate_amount(input.amount)
    }

    /// Issued → Cleared.
    pub fn clear(check: &CheckRecord) -> Result<CheckStatus, LedgerError> {
        Self::transition(check, CheckStatus::Cleared)
    }

    /// Issued → Voided.
    pub fn void(check: &CheckRecord) -> Result<CheckStatus, LedgerError> {
        Self::transition(check, CheckStatus::Voided)
    }

    fn transition(check: &CheckRecord, to: CheckStatus) -> Result<CheckStatus, LedgerError> {
        match check.status {
            CheckStatus::Issued => Ok(to),
            from @ (CheckStatus::Cleared | CheckStatus::Voided) => {
                Err(LedgerError::InvalidCheckTransition {
                    check_id: check.id.into_inner(),
                    from,
                    to,
                })
            }
        }
    }

    /// External reference carried by the originating CHECK_ISSUED movement.
    #[must_use]
    pub fn issue_external_reference(check_id: CheckId) -> String {
        check_id.to_string()
    }

    /// External reference of the void reversal. It never equals an issue reference.
    #[must_use]
    pub fn void_external_reference(check_id: CheckId) -> String {
        format!("VOID-{check_id}")
    }

    /// Builds the CHECK_ISSUED movement of a new check.
    #[must_use]
    pub fn issue_movement(
        check_id: CheckId,
        input: &IssueCheckInput,
        amount: Decimal,
        correlation_id: CorrelationId,
    ) -> NewMovement {
        let reference = input.reference.clone().unwrap_or_else(|| {
            format!("Check {} to {}", input.check_number, input.beneficiary)
        });
        let mut metadata = MovementMetadata::default()
            .with_reference(reference)
            .with_external_reference(Self::issue_external_reference(check_id));
        metadata.recorded_by.clone_from(&input.recorded_by);

        let mut movement =
            NewMovement::new(input.account_id, MovementKind::CheckIssued, amount, metadata)
                .correlated(correlation_id);
        movement.check_id = Some(check_id);
        movement
    }

    /// Builds the DEPOSIT that reverses a voided check.
    ///
    /// The reversal is unreconciled; the original movement is marked
    /// reconciled separately.
    #[must_use]
    pub fn void_movement(
        check: &CheckRecord,
        reason: Option<String>,
        recorded_by: Option<String>,
        correlation_id: Option<CorrelationId>,
    ) -> NewMovement {
        let mut metadata = MovementMetadata::default()
            .with_reference(format!("Reversal of voided check {}", check.check_number))
            .with_description(reason.unwrap_or_else(|| "Check voided".to_string()))
            .with_external_reference(Self::void_external_reference(check.id));
        metadata.recorded_by = recorded_by;

        let mut movement =
            NewMovement::new(check.account_id, MovementKind::Deposit, check.amount, metadata);
        movement.correlation_id = correlation_id;
        movement.check_id = Some(check.id);
        movement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use tesoro_shared::types::{AccountId, CheckTypeId};

    fn check(status: CheckStatus) -> CheckRecord {
        CheckRecord {
            id: CheckId::new(),
            account_id: AccountId::new(),
            check_number: "000123".into(),
            amount: dec!(80.00),
            status,
        }
    }

    fn issue_input() -> IssueCheckInput {
        IssueCheckInput {
            account_id: AccountId::new(),
            check_type_id: CheckTypeId::new(),
            check_number: "000123".into(),
            beneficiary: "ACME Ltd".into(),
            amount: dec!(80.00),
            reference: None,
            issued_on: None,
            recorded_by: Some("clerk".into()),
        }
    }

    #[test]
    fn test_issued_check_can_clear_or_void() {
        assert_eq!(
            CheckLifecycle::clear(&check(CheckStatus::Issued)).unwrap(),
            CheckStatus::Cleared
        );
        assert_eq!(
            CheckLifecycle::void(&check(CheckStatus::Issued)).unwrap(),
            CheckStatus::Voided
        );
    }

    #[rstest]
    #[case(CheckStatus::Cleared)]
    #[case(CheckStatus::Voided)]
    fn test_terminal_states_reject_transitions(#[case] status: CheckStatus) {
        assert!(status.is_terminal());
        let err = CheckLifecycle::clear(&check(status)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidCheckTransition { from, to: CheckStatus::Cleared, .. } if from == status
        ));
        assert!(CheckLifecycle::void(&check(status)).is_err());
    }

    #[test]
    fn test_validate_issue() {
        assert_eq!(CheckLifecycle::validate_issue(&issue_input()).unwrap(), dec!(80.00));

        let mut input = issue_input();
        input.check_number = "  ".into();
        assert!(matches!(
            CheckLifecycle::validate_issue(&input),
            Err(LedgerError::Validation(_))
        ));

        let mut input = issue_input();
        input.amount = dec!(0);
        assert!(matches!(
            CheckLifecycle::validate_issue(&input),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_issue_movement() {
        let input = issue_input();
        let check_id = CheckId::new();
        let correlation = CorrelationId::new();
        let movement = CheckLifecycle::issue_movement(check_id, &input, dec!(80.00), correlation);

        assert_eq!(movement.kind, MovementKind::CheckIssued);
        assert_eq!(movement.check_id, Some(check_id));
        assert_eq!(movement.correlation_id, Some(correlation));
        assert_eq!(movement.metadata.reference.as_deref(), Some("Check 000123 to ACME Ltd"));
        assert_eq!(movement.metadata.external_reference, Some(check_id.to_string()));
        assert_eq!(movement.metadata.recorded_by.as_deref(), Some("clerk"));
        assert!(!movement.reconciled);
    }

    #[test]
    fn test_void_movement_reverses_issue() {
        let voided = check(CheckStatus::Issued);
        let movement = CheckLifecycle::void_movement(&voided, None, None, None);

        assert_eq!(movement.kind, MovementKind::Deposit);
        assert_eq!(movement.amount, voided.amount);
        assert_eq!(movement.account_id, voided.account_id);
        assert_eq!(movement.metadata.description.as_deref(), Some("Check voided"));
        assert_eq!(
            movement.metadata.reference.as_deref(),
            Some("Reversal of voided check 000123")
        );
        assert_ne!(
            movement.metadata.external_reference,
            Some(CheckLifecycle::issue_external_reference(voided.id))
        );
        assert!(!movement.reconciled);
    }
}
