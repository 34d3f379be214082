//! Monetary types for sales and cost representation.

use rust_decimal::Decimal;

/// Sales amount in dollars, represented as a Decimal for precision.
pub type Sales = Decimal;

/// Service cost in US dollars.
pub type Usd = Decimal;

/// Round to `dp` decimal places (banker's rounding) and pin the scale so the
/// value always renders with exactly `dp` decimals.
#[must_use]
pub fn round_fixed(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp(dp);
    rounded.rescale(dp);
    rounded
}
