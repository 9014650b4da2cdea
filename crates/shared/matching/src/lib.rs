//! Quota Matching Policies
//!
//! Execution pricing rules for crossing quotes. Every policy returns a price
//! inside `[best_ask, best_bid]`.

mod config;
mod quote_price;
mod runner_up;
mod split;

pub use config::PricingPolicyConfig;
pub use quote_price::{AskPricePolicy, BidPricePolicy};
pub use runner_up::RunnerUpPolicy;
pub use split::{KDoublePolicy, MidpointPolicy};

// Re-export the trait from ports for convenience
pub use quota_ports::{MarketError, MarketResult, PricingPolicy};

/// Factory function to create pricing policies from configuration
pub fn create_pricing_policy(config: &PricingPolicyConfig) -> MarketResult<Box<dyn PricingPolicy>> {
    config.validate()?;
    Ok(match *config {
        PricingPolicyConfig::AskPrice => Box::new(AskPricePolicy),
        PricingPolicyConfig::BidPrice => Box::new(BidPricePolicy),
        PricingPolicyConfig::Midpoint => Box::new(MidpointPolicy),
        PricingPolicyConfig::KDouble { k } => Box::new(KDoublePolicy::new(k)?),
        PricingPolicyConfig::RunnerUp => Box::new(RunnerUpPolicy),
    })
}
