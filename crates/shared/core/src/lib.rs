//! Quota Core Domain
//!
//! Pure domain types for the quota trading market.
//! This crate contains no I/O and no randomness, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    PermitId, Quote, QuoteError, QuoteSequence, Side, Trade, TradeId, TraderId,
};
pub use values::{Money, Period, Price, Quota, round_price};
