mod markup;
mod penalty_box;
mod quote_queues;
mod stats;

pub use markup::{QuotePrices, QuoteSides, quote_prices};
pub use penalty_box::PenaltyBox;
pub use quote_queues::QuoteQueues;
pub use stats::DailyStats;
