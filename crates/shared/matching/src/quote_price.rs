use quota_core::Price;
use quota_ports::PricingPolicy;

/// Trade at the seller's quote
///
/// The buyer captures the whole surplus between the crossing quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AskPricePolicy;

impl PricingPolicy for AskPricePolicy {
    fn trade_price(
        &self,
        best_ask: Price,
        _best_bid: Price,
        _second_best_ask: Option<Price>,
        _second_best_bid: Option<Price>,
    ) -> Price {
        best_ask
    }

    fn name(&self) -> &str {
        "Ask Price"
    }
}

/// Trade at the buyer's quote
#[derive(Debug, Clone, Copy, Default)]
pub struct BidPricePolicy;

impl PricingPolicy for BidPricePolicy {
    fn trade_price(
        &self,
        _best_ask: Price,
        best_bid: Price,
        _second_best_ask: Option<Price>,
        _second_best_bid: Option<Price>,
    ) -> Price {
        best_bid
    }

    fn name(&self) -> &str {
        "Bid Price"
    }
}
