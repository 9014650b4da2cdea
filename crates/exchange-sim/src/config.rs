//! Market configuration
//!
//! Loaded from JSON alongside the rest of the simulation configuration.
//! Every field has a default, so partial documents are valid.

use quota_core::{Period, Quota};
use quota_matching::PricingPolicyConfig;
use quota_ports::{MarketError, MarketResult};
use serde::{Deserialize, Serialize};

/// Parameters of one quota market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Fractional spread applied around the reservation price
    pub markup: f64,

    /// Lot size: units transferred by a single trade
    pub units_traded_per_match: Quota,

    /// Periods a buyer is barred from selling after a purchase (0 disables)
    pub penalty_duration: i64,

    /// Let traders re-quote after each of their trades within a period
    pub allow_multiple_trades_per_period: bool,

    /// First period in which the market collects and clears quotes
    pub activation_period: Period,

    /// Minimum gap kept between a trader's ask and bid
    pub epsilon: f64,

    /// Execution pricing rule
    pub pricing: PricingPolicyConfig,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            markup: 0.05,
            units_traded_per_match: 100,
            penalty_duration: 0,
            allow_multiple_trades_per_period: false,
            activation_period: 0,
            epsilon: 0.01,
            pricing: PricingPolicyConfig::default(),
        }
    }
}

impl MarketConfig {
    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> MarketResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MarketError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MarketResult<()> {
        self.validate_market()?;
        self.pricing.validate()
    }

    /// Check everything except the pricing policy choice
    pub(crate) fn validate_market(&self) -> MarketResult<()> {
        validate_markup(self.markup)?;
        validate_lot_size(self.units_traded_per_match)?;

        if self.penalty_duration < 0 {
            return Err(MarketError::InvalidConfiguration(format!(
                "penalty duration must be non-negative, got {}",
                self.penalty_duration
            )));
        }

        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(MarketError::InvalidConfiguration(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }

        Ok(())
    }
}

/// Markup must be finite and non-negative.
///
/// Above 1 every positive valuation yields a negative bid, which is
/// rejected as an invalid quote when the book generates it.
pub(crate) fn validate_markup(markup: f64) -> MarketResult<()> {
    if !markup.is_finite() || markup < 0.0 {
        return Err(MarketError::InvalidConfiguration(format!(
            "markup must be finite and non-negative, got {markup}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_lot_size(units: Quota) -> MarketResult<()> {
    if units <= 0 {
        return Err(MarketError::InvalidConfiguration(format!(
            "units traded per match must be positive, got {units}"
        )));
    }
    Ok(())
}
