//! Quota Exchange
//!
//! A periodic continuous double auction for one tradable permit type.
//! Traders are asked for a reservation price once per period; the book
//! turns it into a bid and an ask, clears crossing pairs one lot at a time
//! under price-time priority, and discards everything left at period end.

// Application layer
pub mod application;

// Domain layer
pub mod domain;

// Cross-cutting concerns
pub mod config;
pub mod model;

// Re-export main types for convenience
pub use application::{BookPhase, QuotaOrderBook};
pub use config::MarketConfig;
pub use domain::{DailyStats, PenaltyBox, QuotePrices, QuoteQueues, QuoteSides, quote_prices};
