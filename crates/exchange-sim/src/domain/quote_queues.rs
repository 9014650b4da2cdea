use priority_queue::PriorityQueue;
use quota_core::{Quote, Side};

/// The two priority queues of a period: asks and bids
///
/// Quotes are keyed by their sequence number and prioritised by the quote
/// itself, whose ordering already encodes price-time priority per side.
#[derive(Debug, Default)]
pub struct QuoteQueues {
    asks: PriorityQueue<u64, Quote>,
    bids: PriorityQueue<u64, Quote>,
}

impl QuoteQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, quote: Quote) {
        match quote.side {
            Side::Ask => self.asks.push(quote.sequence, quote),
            Side::Bid => self.bids.push(quote.sequence, quote),
        };
    }

    /// Best ask (lowest price, earliest first)
    pub fn best_ask(&self) -> Option<&Quote> {
        self.asks.peek().map(|(_, quote)| quote)
    }

    /// Best bid (highest price, earliest first)
    pub fn best_bid(&self) -> Option<&Quote> {
        self.bids.peek().map(|(_, quote)| quote)
    }

    /// Pop the best ask and best bid together, or nothing if either side is empty
    pub fn pop_best_pair(&mut self) -> Option<(Quote, Quote)> {
        if self.asks.is_empty() || self.bids.is_empty() {
            return None;
        }
        let (_, ask) = self.asks.pop()?;
        let (_, bid) = self.bids.pop()?;
        Some((ask, bid))
    }

    pub fn ask_count(&self) -> usize {
        self.asks.len()
    }

    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }

    /// Discard every quote on both sides
    pub fn clear(&mut self) {
        self.asks.clear();
        self.bids.clear();
    }
}
