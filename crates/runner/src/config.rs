//! Configuration loading for quota market simulations
//!
//! A single JSON document describes:
//! - The run (seed, number of days, season length)
//! - One market per permit type
//! - Traders with their cash, yearly allotments and valuations

use quota_core::{Money, Period, PermitId, Price, Quota, TraderId};
use quota_exchange::MarketConfig;
use quota_ports::ValuationSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

use crate::fleet::{Fleet, TraderAccount};
use crate::valuation::{ExhaustionRiskValuation, FixedValuation, ScriptedValuation};

/// Root configuration of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed of the generator every market shares
    pub seed: u64,

    /// Days to simulate
    pub days: Period,

    /// Days per season; quotas are restored at the start of each one
    pub season_length: Period,

    /// Markets, one per permit type
    pub markets: Vec<MarketSetup>,

    /// Trader accounts
    pub traders: Vec<TraderSetup>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            days: 365,
            season_length: 365,
            markets: Vec::new(),
            traders: Vec::new(),
        }
    }
}

/// A market and the permit it trades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSetup {
    pub permit: PermitId,
    #[serde(default)]
    pub config: MarketConfig,
}

/// A trader account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderSetup {
    pub id: TraderId,
    #[serde(default)]
    pub cash: Money,
    #[serde(default)]
    pub allotments: Vec<AllotmentSetup>,
}

/// Yearly quota of one permit, and how the trader values it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllotmentSetup {
    pub permit: PermitId,
    pub yearly: Quota,
    /// Traders without a valuation hold quota but never quote
    #[serde(default)]
    pub valuation: Option<ValuationConfig>,
}

/// Serializable choice of valuation source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValuationConfig {
    Fixed {
        price: Price,
    },
    Scripted {
        prices: Vec<Price>,
    },
    ExhaustionRisk {
        unit_value: Price,
        daily_mean: f64,
        daily_sd: f64,
    },
}

impl ValuationConfig {
    fn validate(&self) -> Result<(), String> {
        match self {
            ValuationConfig::Fixed { price } if price.is_nan() => {
                Err("fixed valuation price is NaN".to_string())
            }
            ValuationConfig::Scripted { prices } if prices.is_empty() => {
                Err("scripted valuation has no prices".to_string())
            }
            ValuationConfig::ExhaustionRisk {
                unit_value,
                daily_mean,
                daily_sd,
            } => {
                let all_valid = [*unit_value, *daily_mean, *daily_sd]
                    .iter()
                    .all(|v| v.is_finite() && *v >= 0.0);
                if all_valid {
                    Ok(())
                } else {
                    Err(format!(
                        "exhaustion risk parameters must be finite and non-negative, got \
                         unit_value={unit_value}, daily_mean={daily_mean}, daily_sd={daily_sd}"
                    ))
                }
            }
            _ => Ok(()),
        }
    }

    /// Build the valuation source this entry describes
    pub fn build(&self, season_length: Period) -> Box<dyn ValuationSource> {
        match self {
            ValuationConfig::Fixed { price } => Box::new(FixedValuation(*price)),
            ValuationConfig::Scripted { prices } => {
                Box::new(ScriptedValuation::new(prices.iter().copied()))
            }
            ValuationConfig::ExhaustionRisk {
                unit_value,
                daily_mean,
                daily_sd,
            } => Box::new(ExhaustionRiskValuation {
                unit_value: *unit_value,
                daily_mean: *daily_mean,
                daily_sd: *daily_sd,
                season_length,
            }),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.season_length == 0 {
            return Err(ConfigError::Invalid(
                "season length must be at least one day".to_string(),
            ));
        }

        let mut permits = BTreeSet::new();
        for market in &self.markets {
            if !permits.insert(market.permit) {
                return Err(ConfigError::Invalid(format!(
                    "{} has more than one market",
                    market.permit
                )));
            }
            market
                .config
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("{}: {}", market.permit, e)))?;
        }

        let mut ids = BTreeSet::new();
        for trader in &self.traders {
            if !ids.insert(trader.id) {
                return Err(ConfigError::Invalid(format!(
                    "{} is configured more than once",
                    trader.id
                )));
            }
            if !trader.cash.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{} has non-finite cash",
                    trader.id
                )));
            }

            let mut held = BTreeSet::new();
            for allotment in &trader.allotments {
                if !permits.contains(&allotment.permit) {
                    return Err(ConfigError::Invalid(format!(
                        "{} holds {} but no market trades it",
                        trader.id, allotment.permit
                    )));
                }
                if !held.insert(allotment.permit) {
                    return Err(ConfigError::Invalid(format!(
                        "{} has two allotments of {}",
                        trader.id, allotment.permit
                    )));
                }
                if allotment.yearly < 0 {
                    return Err(ConfigError::Invalid(format!(
                        "{} has a negative allotment of {}",
                        trader.id, allotment.permit
                    )));
                }
                if let Some(valuation) = &allotment.valuation {
                    valuation.validate().map_err(|e| {
                        ConfigError::Invalid(format!("{} on {}: {}", trader.id, allotment.permit, e))
                    })?;
                }
            }
        }

        Ok(())
    }

    /// Accounts for every configured trader, allotments full
    pub fn build_fleet(&self) -> Fleet {
        let mut fleet = Fleet::new();
        for trader in &self.traders {
            let account = trader
                .allotments
                .iter()
                .fold(TraderAccount::new(trader.id, trader.cash), |account, allotment| {
                    account.with_quota(allotment.permit, allotment.yearly)
                });
            fleet.insert(account);
        }
        fleet
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use quota_exchange::model::PricingPolicyConfig;
    use quota_ports::QuotaAccount;

    const SAMPLE: &str = r#"{
        "seed": 11,
        "days": 30,
        "season_length": 10,
        "markets": [
            { "permit": 0, "config": { "markup": 0.1, "penalty_duration": 2 } },
            { "permit": 1, "config": { "pricing": { "type": "k_double", "k": 0.25 } } }
        ],
        "traders": [
            {
                "id": 1,
                "cash": 100.0,
                "allotments": [
                    { "permit": 0, "yearly": 300, "valuation": { "type": "fixed", "price": 12.5 } },
                    { "permit": 1, "yearly": 100 }
                ]
            },
            {
                "id": 2,
                "allotments": [
                    {
                        "permit": 0,
                        "yearly": 100,
                        "valuation": {
                            "type": "exhaustion_risk",
                            "unit_value": 20.0,
                            "daily_mean": 10.0,
                            "daily_sd": 3.0
                        }
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let config = SimulationConfig::from_json(SAMPLE).unwrap();
        assert_eq!(config.seed, 11);
        assert_eq!(config.season_length, 10);
        assert_eq!(config.markets.len(), 2);
        assert_eq!(config.markets[0].config.markup, 0.1);
        assert_eq!(config.markets[0].config.units_traded_per_match, 100);
        assert_eq!(
            config.markets[1].config.pricing,
            PricingPolicyConfig::KDouble { k: 0.25 }
        );
        assert_eq!(
            config.traders[0].allotments[0].valuation,
            Some(ValuationConfig::Fixed { price: 12.5 })
        );
        assert_eq!(config.traders[0].allotments[1].valuation, None);
        assert_eq!(config.traders[1].cash, 0.0);
    }

    #[test]
    fn test_defaults_for_empty_document() {
        let config = SimulationConfig::from_json("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_build_fleet() {
        let fleet = SimulationConfig::from_json(SAMPLE).unwrap().build_fleet();
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet.total_quota(PermitId(0)), 400);
        let first = fleet.get(TraderId(1)).unwrap();
        assert_eq!(first.quota_remaining(PermitId(1)), Some(100));
        assert_eq!(first.cash(), 100.0);
    }

    #[test]
    fn test_unknown_permit_rejected() {
        let json = r#"{
            "markets": [{ "permit": 0 }],
            "traders": [{ "id": 1, "allotments": [{ "permit": 3, "yearly": 10 }] }]
        }"#;
        assert!(matches!(
            SimulationConfig::from_json(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_duplicate_trader_rejected() {
        let json = r#"{ "traders": [{ "id": 1 }, { "id": 1 }] }"#;
        assert!(matches!(
            SimulationConfig::from_json(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_bad_market_config_rejected() {
        let json = r#"{ "markets": [{ "permit": 0, "config": { "markup": -1.0 } }] }"#;
        assert!(matches!(
            SimulationConfig::from_json(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_zero_season_rejected() {
        assert!(SimulationConfig::from_json(r#"{ "season_length": 0 }"#).is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            SimulationConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            SimulationConfig::from_file("/nonexistent/quota-sim.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
