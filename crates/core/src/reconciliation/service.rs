//! Reconciliation math and outstanding-item rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tesoro_shared::types::round_money;

use super::types::{OutstandingCheck, OutstandingItems, OutstandingMovement, ReconciliationFigures};
use crate::check::types::CheckStatus;
use crate::ledger::balance::{BalanceQuery, compute_balance};
use crate::ledger::types::MovementLine;

/// Stateless service for reconciliation.
pub struct ReconciliationService;

impl ReconciliationService {
    /// `bank - book`, rounded half-up to two decimals.
    #[must_use]
    pub fn difference(bank_balance: Decimal, book_balance: Decimal) -> Decimal {
        round_money(bank_balance - book_balance)
    }

    /// Computes the preview figures from the account's movement log.
    #[must_use]
    pub fn project(
        lines: &[MovementLine],
        cutoff_date: NaiveDate,
        bank_balance: Decimal,
    ) -> ReconciliationFigures {
        let query = BalanceQuery::as_of(cutoff_date);
        let book_balance_total = compute_balance(lines, query);
        let book_balance_unreconciled = compute_balance(lines, query.unreconciled());
        ReconciliationFigures {
            cutoff_date,
            bank_balance: round_money(bank_balance),
            book_balance_total,
            book_balance_unreconciled,
            difference: Self::difference(bank_balance, book_balance_total),
        }
    }

    /// A movement is pending when unreconciled, on or before the cut-off, and
    /// not owned by the check lifecycle.
    #[must_use]
    pub fn is_pending_movement(movement: &OutstandingMovement, cutoff_date: NaiveDate) -> bool {
        !movement.reconciled
            && movement.recorded_at.date_naive() <= cutoff_date
            && !movement.kind.is_check_movement()
    }

    /// A check is pending while issued on or before the cut-off.
    #[must_use]
    pub fn is_pending_check(check: &OutstandingCheck, cutoff_date: NaiveDate) -> bool {
        check.status == CheckStatus::Issued && check.issued_on <= cutoff_date
    }

    /// Filters candidate rows down to the outstanding items and totals them.
    #[must_use]
    pub fn outstanding(
        cutoff_date: NaiveDate,
        movements: Vec<OutstandingMovement>,
        checks: Vec<OutstandingCheck>,
    ) -> OutstandingItems {
        let movements: Vec<_> = movements
            .into_iter()
            .filter(|m| Self::is_pending_movement(m, cutoff_date))
            .collect();
        let checks: Vec<_> = checks
            .into_iter()
            .filter(|c| Self::is_pending_check(c, cutoff_date))
            .collect();
        let movements_total = round_money(
            movements
                .iter()
                .map(|m| m.kind.signed_amount(m.amount))
                .sum(),
        );
        let checks_total = round_money(checks.iter().map(|c| c.amount).sum());
        OutstandingItems {
            movements,
            checks,
            movements_total,
            checks_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use tesoro_shared::types::{CheckId, MovementId};

    use crate::ledger::types::MovementKind;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn movement(kind: MovementKind, amount: Decimal, day: u32, reconciled: bool) -> OutstandingMovement {
        OutstandingMovement {
            movement_id: MovementId::new(),
            recorded_at: Utc.with_ymd_and_hms(2024, 6, day, 23, 59, 59).unwrap(),
            kind,
            amount,
            reconciled,
            reference: None,
            description: None,
        }
    }

    fn check(status: CheckStatus, day: u32) -> OutstandingCheck {
        OutstandingCheck {
            check_id: CheckId::new(),
            check_number: format!("{day:04}"),
            beneficiary: "Supplier".into(),
            amount: dec!(20.00),
            issued_on: date(day),
            status,
        }
    }

    #[test]
    fn test_difference_rounds_half_up() {
        assert_eq!(ReconciliationService::difference(dec!(100.005), dec!(0)), dec!(100.01));
        assert_eq!(ReconciliationService::difference(dec!(50.00), dec!(70.00)), dec!(-20.00));
    }

    #[test]
    fn test_project() {
        let lines = [
            MovementLine {
                kind: MovementKind::Deposit,
                amount: dec!(100.00),
                recorded_on: date(1),
                reconciled: true,
            },
            MovementLine {
                kind: MovementKind::Withdrawal,
                amount: dec!(30.00),
                recorded_on: date(2),
                reconciled: false,
            },
            MovementLine {
                kind: MovementKind::Deposit,
                amount: dec!(500.00),
                recorded_on: date(20),
                reconciled: false,
            },
        ];
        let figures = ReconciliationService::project(&lines, date(10), dec!(75.00));
        assert_eq!(figures.book_balance_total, dec!(70.00));
        assert_eq!(figures.book_balance_unreconciled, dec!(-30.00));
        assert_eq!(figures.difference, dec!(5.00));
    }

    #[test]
    fn test_outstanding_excludes_checks_and_reconciled() {
        let items = ReconciliationService::outstanding(
            date(10),
            vec![
                movement(MovementKind::Deposit, dec!(50.00), 3, false),
                movement(MovementKind::Withdrawal, dec!(20.00), 4, false),
                movement(MovementKind::Deposit, dec!(99.00), 5, true),
                movement(MovementKind::CheckIssued, dec!(20.00), 5, false),
                movement(MovementKind::Deposit, dec!(10.00), 11, false),
            ],
            vec![
                check(CheckStatus::Issued, 5),
                check(CheckStatus::Cleared, 5),
                check(CheckStatus::Issued, 12),
            ],
        );
        assert_eq!(items.movements.len(), 2);
        assert_eq!(items.movements_total, dec!(30.00));
        assert_eq!(items.checks.len(), 1);
        assert_eq!(items.checks_total, dec!(20.00));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// **Property 4.1: Bank balance equals book balance plus difference**
        #[test]
        fn prop_difference_closes_gap(
            bank in (-10_000_000i64..10_000_000i64).prop_map(|c| Decimal::new(c, 2)),
            book in (-10_000_000i64..10_000_000i64).prop_map(|c| Decimal::new(c, 2)),
        ) {
            let difference = ReconciliationService::difference(bank, book);
            prop_assert_eq!(book + difference, bank);
        }
    }
}
