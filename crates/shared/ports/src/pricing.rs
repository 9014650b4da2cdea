use quota_core::Price;

/// Port for execution pricing
///
/// Maps the crossing quotes (and the runner-up quotes still on the book, if
/// any) to an execution price. Implementations must return a price within
/// `[best_ask, best_bid]`; the engine treats anything else as fatal.
///
/// Different implementations support various pricing rules:
/// - Seller's ask / buyer's bid
/// - Midpoint
/// - k-double auction
/// - etc.
pub trait PricingPolicy {
    /// Execution price for a crossing `best_ask <= best_bid`
    fn trade_price(
        &self,
        best_ask: Price,
        best_bid: Price,
        second_best_ask: Option<Price>,
        second_best_bid: Option<Price>,
    ) -> Price;

    /// Get the name of the policy
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> PricingPolicy for F
where
    F: Fn(Price, Price, Option<Price>, Option<Price>) -> Price,
{
    fn trade_price(
        &self,
        best_ask: Price,
        best_bid: Price,
        second_best_ask: Option<Price>,
        second_best_bid: Option<Price>,
    ) -> Price {
        self(best_ask, best_bid, second_best_ask, second_best_bid)
    }
}
