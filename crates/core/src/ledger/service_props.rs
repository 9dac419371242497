//! Property-based tests for LedgerService.
//!
//! - Property 2: Transfer legs cancel out
//! - Property 3: Sufficient-funds rule

use proptest::prelude::*;
use rust_decimal::Decimal;
use tesoro_shared::types::AccountId;

use super::error::LedgerError;
use super::service::{LedgerService, TransferInput};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 2.1: The two legs of a transfer sum to zero**
    #[test]
    fn prop_transfer_legs_cancel(amount in positive_amount()) {
        let input = TransferInput {
            source: AccountId::new(),
            destination: AccountId::new(),
            amount,
            reference: None,
            recorded_by: None,
        };
        let plan = LedgerService::plan_transfer(&input).unwrap();
        let net = plan.outgoing.kind.signed_amount(plan.outgoing.amount)
            + plan.incoming.kind.signed_amount(plan.incoming.amount);
        prop_assert_eq!(net, Decimal::ZERO);
        prop_assert_eq!(plan.outgoing.amount, amount);
    }

    /// **Property 3.1: A posting passes the funds check iff it fits the balance**
    #[test]
    fn prop_funds_check_matches_comparison(
        balance in (-1_000_000i64..1_000_000i64).prop_map(|c| Decimal::new(c, 2)),
        requested in positive_amount(),
    ) {
        let result = LedgerService::ensure_sufficient_funds(AccountId::new(), balance, requested);
        if balance >= requested {
            prop_assert!(result.is_ok());
        } else {
            let is_insufficient = matches!(result, Err(LedgerError::InsufficientFunds { .. }));
            prop_assert!(is_insufficient);
        }
    }
}
