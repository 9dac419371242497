//! Account balance calculations.
//!
//! A balance is never stored: it is recomputed from the movement log every time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoro_shared::types::round_money;

use super::types::{Direction, MovementKind, MovementLine};

/// Which movements a balance covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceQuery {
    /// Last calendar date included.
    pub as_of: NaiveDate,
    /// Only count movements not yet reconciled.
    pub only_unreconciled: bool,
}

impl BalanceQuery {
    /// All movements up to and including `as_of`.
    #[must_use]
    pub const fn as_of(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            only_unreconciled: false,
        }
    }

    /// Restricts the query to unreconciled movements.
    #[must_use]
    pub const fn unreconciled(self) -> Self {
        Self {
            only_unreconciled: true,
            ..self
        }
    }

    /// Returns true if the line falls inside this query.
    #[must_use]
    pub fn includes(&self, line: &MovementLine) -> bool {
        line.recorded_on <= self.as_of && !(self.only_unreconciled && line.reconciled)
    }
}

/// Credit and debit totals of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Sum of credit-kind amounts.
    pub credit_total: Decimal,
    /// Sum of debit-kind amounts.
    pub debit_total: Decimal,
}

impl AccountBalance {
    /// Creates an empty balance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one movement.
    pub fn apply(&mut self, kind: MovementKind, amount: Decimal) {
        match kind.direction() {
            Direction::Credit => self.credit_total += amount,
            Direction::Debit => self.debit_total += amount,
        }
    }

    /// Net balance, rounded to two decimals.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        round_money(self.credit_total - self.debit_total)
    }
}

/// Sums credit kinds minus debit kinds over the lines the query selects.
///
/// Returns zero when nothing matches.
pub fn compute_balance<'a, I>(lines: I, query: BalanceQuery) -> Decimal
where
    I: IntoIterator<Item = &'a MovementLine>,
{
    lines
        .into_iter()
        .filter(|line| query.includes(line))
        .fold(AccountBalance::new(), |mut totals, line| {
            totals.apply(line.kind, line.amount);
            totals
        })
        .balance()
}
