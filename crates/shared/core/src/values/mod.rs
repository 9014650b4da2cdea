/// Price of one permit unit.
///
/// Plain `f64`: a valuation may legitimately be NaN or infinite to signal
/// "no order this period", and the engine reports NaN as the closing price
/// before the first trade.
pub type Price = f64;

/// Permit units (whole units, may go negative only through external bookkeeping)
pub type Quota = i64;

/// Cash amount
pub type Money = f64;

/// Simulated period index (one clearing cycle per period)
pub type Period = u32;

/// Round a price to two decimal places (cents).
pub fn round_price(value: Price) -> Price {
    (value * 100.0).round() / 100.0
}
