use quota_core::Price;
use quota_ports::PricingPolicy;

/// Price at the midpoint of the runner-up quotes
///
/// The runner-up quotes approximate where the next trade would clear, so
/// their midpoint is used when both exist, clamped into the crossing quotes.
/// Falls back to the midpoint of the crossing quotes otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerUpPolicy;

impl PricingPolicy for RunnerUpPolicy {
    fn trade_price(
        &self,
        best_ask: Price,
        best_bid: Price,
        second_best_ask: Option<Price>,
        second_best_bid: Option<Price>,
    ) -> Price {
        match (second_best_ask, second_best_bid) {
            (Some(ask), Some(bid)) => ((ask + bid) / 2.0).clamp(best_ask, best_bid),
            _ => (best_ask + best_bid) / 2.0,
        }
    }

    fn name(&self) -> &str {
        "Runner-Up Midpoint"
    }
}
