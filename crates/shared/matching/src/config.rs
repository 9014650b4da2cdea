use quota_ports::{MarketError, MarketResult};
use serde::{Deserialize, Serialize};

/// Serializable choice of pricing policy
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PricingPolicyConfig {
    /// Trade at the seller's ask
    #[default]
    AskPrice,
    /// Trade at the buyer's bid
    BidPrice,
    /// Trade halfway between ask and bid
    Midpoint,
    /// Trade at `k * bid + (1 - k) * ask`
    KDouble { k: f64 },
    /// Trade at the runner-up midpoint, clamped to the crossing quotes
    RunnerUp,
}

impl PricingPolicyConfig {
    pub fn validate(&self) -> MarketResult<()> {
        match *self {
            PricingPolicyConfig::KDouble { k } if !(0.0..=1.0).contains(&k) => {
                Err(MarketError::InvalidConfiguration(format!(
                    "k-double weight must be within [0, 1], got {k}"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_config() {
        let config: PricingPolicyConfig =
            serde_json::from_str(r#"{"type": "k_double", "k": 0.5}"#).unwrap();
        assert_eq!(config, PricingPolicyConfig::KDouble { k: 0.5 });

        let config: PricingPolicyConfig = serde_json::from_str(r#"{"type": "midpoint"}"#).unwrap();
        assert_eq!(config, PricingPolicyConfig::Midpoint);
    }

    #[test]
    fn test_nan_k_is_invalid() {
        assert!(PricingPolicyConfig::KDouble { k: f64::NAN }.validate().is_err());
    }
}
