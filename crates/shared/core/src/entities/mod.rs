mod quote;
mod side;
mod trade;
mod trader;

pub use quote::{Quote, QuoteError, QuoteSequence};
pub use side::Side;
pub use trade::{Trade, TradeId};
pub use trader::{PermitId, TraderId};
