use quota_core::Price;
use quota_ports::{MarketError, MarketResult, PricingPolicy};

/// Split the surplus evenly
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointPolicy;

impl PricingPolicy for MidpointPolicy {
    fn trade_price(
        &self,
        best_ask: Price,
        best_bid: Price,
        _second_best_ask: Option<Price>,
        _second_best_bid: Option<Price>,
    ) -> Price {
        (best_ask + best_bid) / 2.0
    }

    fn name(&self) -> &str {
        "Midpoint"
    }
}

/// k-double auction: the buyer's quote gets weight `k`, the seller's `1 - k`
#[derive(Debug, Clone, Copy)]
pub struct KDoublePolicy {
    k: f64,
}

impl KDoublePolicy {
    pub fn new(k: f64) -> MarketResult<Self> {
        if !(0.0..=1.0).contains(&k) {
            return Err(MarketError::InvalidConfiguration(format!(
                "k-double weight must be within [0, 1], got {k}"
            )));
        }
        Ok(Self { k })
    }

    pub fn k(&self) -> f64 {
        self.k
    }
}

impl PricingPolicy for KDoublePolicy {
    fn trade_price(
        &self,
        best_ask: Price,
        best_bid: Price,
        _second_best_ask: Option<Price>,
        _second_best_bid: Option<Price>,
    ) -> Price {
        let price = self.k * best_bid + (1.0 - self.k) * best_ask;
        // floating-point blend can land an ulp outside the quotes
        price.clamp(best_ask, best_bid)
    }

    fn name(&self) -> &str {
        "k-Double Auction"
    }
}
