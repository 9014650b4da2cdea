use quota_core::{Price, round_price};

/// Bid and ask derived from one reservation price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotePrices {
    pub bid: Price,
    pub ask: Price,
}

/// Which sides a trader may quote in a generation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteSides {
    pub ask: bool,
    pub bid: bool,
}

impl QuoteSides {
    pub const BOTH: Self = Self { ask: true, bid: true };
    pub const BID_ONLY: Self = Self { ask: false, bid: true };
    pub const ASK_ONLY: Self = Self { ask: true, bid: false };
}

/// Spread a reservation price into a bid and an ask.
///
/// The ask never drops below `markup` and always sits at least `epsilon`
/// above the bid, so a trader's own quotes never cross even at zero markup.
pub fn quote_prices(reservation: Price, markup: f64, epsilon: f64) -> QuotePrices {
    let bid = round_price(reservation * (1.0 - markup));
    let ask = round_price((reservation * (1.0 + markup)).max(markup)).max(bid + epsilon);
    QuotePrices { bid, ask }
}
