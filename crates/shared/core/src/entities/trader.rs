use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a trader.
///
/// Traders are ordered by this id, never by reference, so that the
/// sort-then-shuffle scheduling order is reproducible across runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TraderId(pub u32);

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trader-{}", self.0)
    }
}

/// Identifier of the permit type (quota species) an engine trades
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PermitId(pub u32);

impl fmt::Display for PermitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "permit-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trader_ids_order_by_value() {
        let mut ids = vec![TraderId(7), TraderId(2), TraderId(5)];
        ids.sort();
        assert_eq!(ids, vec![TraderId(2), TraderId(5), TraderId(7)]);
    }

    #[test]
    fn test_ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_string(&TraderId(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&PermitId(1)).unwrap(), "1");
    }
}
