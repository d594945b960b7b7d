use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Price value - uses Decimal so 4dp rounding is exact
pub type Price = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Identifier of a tradable instrument (e.g. "EURUSD")
pub type Symbol = String;

/// Number of decimal places every quoted price is rounded to
pub const PRICE_DP: u32 = 4;

/// Round a price to [`PRICE_DP`] places, half away from zero.
///
/// On positive prices this commutes with shifting by whole ticks, which the
/// random walk relies on to keep `ask > bid`. Half-to-even does not:
/// `0.89015` and `0.89025` would both land on `0.8902`.
pub fn round_price(value: Price) -> Price {
    value.round_dp_with_strategy(PRICE_DP, RoundingStrategy::MidpointAwayFromZero)
}
