//! Quota Ports
//!
//! Port definitions (traits) for the quota trading market.
//! These define the boundaries between the matching engine and the
//! simulation that owns the traders and their valuations.

mod error;
mod pricing;
mod trader;
mod valuation;

pub use error::{MarketError, MarketResult};
pub use pricing::PricingPolicy;
pub use trader::{QuotaAccount, TraderDirectory};
pub use valuation::{ValuationContext, ValuationSource};
