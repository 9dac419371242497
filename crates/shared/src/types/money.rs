//! Money helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every stored amount is a `rust_decimal::Decimal` with two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for every monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount half away from zero to [`MONEY_SCALE`] digits and pads
/// the scale, so `70` renders as `70.00`.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Returns true if the amount carries no more than [`MONEY_SCALE`] significant
/// fractional digits.
#[must_use]
pub fn has_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}
