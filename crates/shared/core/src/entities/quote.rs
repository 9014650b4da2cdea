use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

use super::{Side, TraderId};
use crate::values::Price;

/// Rejected quote construction
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum QuoteError {
    #[error("Negative quote price {price} from {trader}")]
    NegativePrice { price: Price, trader: TraderId },

    #[error("Non-finite quote price {price} from {trader}")]
    NonFinitePrice { price: Price, trader: TraderId },
}

/// One side of an order: a price, the trader behind it and its insertion sequence.
///
/// Quotes only exist for the period they were posted in. The sequence number
/// identifies the quote and breaks price ties (first submitted wins).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quote {
    pub side: Side,
    pub price: Price,
    pub trader: TraderId,
    pub sequence: u64,
}

/// Priority ordering: the greater quote is the better one.
///
/// Bids: higher price first. Asks: lower price first.
/// Both sides: lower sequence first at equal price.
impl Ord for Quote {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_price = match self.side {
            // Bids: higher price is better (natural order)
            Side::Bid => self.price.total_cmp(&other.price),
            // Asks: lower price is better (reverse order)
            Side::Ask => other.price.total_cmp(&self.price),
        };
        by_price.then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Quote {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Quote {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Quote {}

/// Monotonic quote counter owned by one market.
///
/// Shared by both sides and never reset, so independent markets never
/// interfere with each other's tie-breaking.
#[derive(Debug, Default)]
pub struct QuoteSequence {
    next: u64,
}

impl QuoteSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next quote will receive
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Build a quote, assigning it the next sequence number.
    ///
    /// Rejected prices do not consume a sequence number.
    pub fn issue(
        &mut self,
        side: Side,
        price: Price,
        trader: TraderId,
    ) -> Result<Quote, QuoteError> {
        if !price.is_finite() {
            return Err(QuoteError::NonFinitePrice { price, trader });
        }
        if price < 0.0 {
            return Err(QuoteError::NegativePrice { price, trader });
        }

        let sequence = self.next;
        self.next += 1;

        Ok(Quote {
            side,
            price,
            trader,
            sequence,
        })
    }
}
