use quota_core::{Money, Price, Quota, Trade};
use serde::{Deserialize, Serialize};

/// Counters for one simulated day, reset at the start of every step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Number of trades executed
    pub matches: u64,
    /// Permit units that changed hands
    pub quota_volume: Quota,
    /// Cash that changed hands
    pub money_volume: Money,
}

impl DailyStats {
    pub fn record(&mut self, trade: &Trade) {
        self.matches += 1;
        self.quota_volume += trade.quantity;
        self.money_volume += trade.notional();
    }

    /// Volume-weighted price of the day, NaN when nothing traded
    pub fn average_price(&self) -> Price {
        if self.quota_volume == 0 {
            return f64::NAN;
        }
        self.money_volume / self.quota_volume as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quota_core::{PermitId, TraderId};

    fn trade(price: Price) -> Trade {
        Trade {
            id: 0,
            period: 0,
            permit: PermitId(0),
            buyer: TraderId(1),
            seller: TraderId(2),
            price,
            quantity: 100,
            ask_price: price,
            bid_price: price,
        }
    }

    #[test]
    fn test_empty_day_has_nan_average() {
        assert!(DailyStats::default().average_price().is_nan());
    }

    #[test]
    fn test_average_is_volume_weighted() {
        let mut stats = DailyStats::default();
        stats.record(&trade(100.01));
        stats.record(&trade(200.01));
        assert_eq!(stats.matches, 2);
        assert_eq!(stats.quota_volume, 200);
        assert_relative_eq!(stats.average_price(), 150.01, epsilon = 1e-9);
    }
}
