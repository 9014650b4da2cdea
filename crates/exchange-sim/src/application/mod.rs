mod order_book;

pub use order_book::{BookPhase, QuotaOrderBook};
