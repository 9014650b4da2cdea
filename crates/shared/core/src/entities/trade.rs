use serde::{Deserialize, Serialize};

use super::{PermitId, TraderId};
use crate::values::{Money, Period, Price, Quota};

/// Sequential trade number within one market
pub type TradeId = u64;

/// Executed transfer of one lot of quota between two traders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub period: Period,
    pub permit: PermitId,
    pub buyer: TraderId,
    pub seller: TraderId,
    /// Execution price per unit
    pub price: Price,
    /// Units transferred (one lot)
    pub quantity: Quota,
    /// The crossing ask that was filled
    pub ask_price: Price,
    /// The crossing bid that was filled
    pub bid_price: Price,
}

impl Trade {
    /// Returns the notional value of the trade (price * quantity)
    pub fn notional(&self) -> Money {
        self.price * self.quantity as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notional() {
        let trade = Trade {
            id: 0,
            period: 1,
            permit: PermitId(0),
            buyer: TraderId(1),
            seller: TraderId(2),
            price: 9.45,
            quantity: 100,
            ask_price: 9.45,
            bid_price: 9.5,
        };
        assert!((trade.notional() - 945.0).abs() < 1e-9);
    }
}
