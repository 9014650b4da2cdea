use quota_core::{Period, PermitId, Price, Quota, QuoteError, TraderId};
use thiserror::Error;

/// Domain-level errors for the quota market
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid quote: {0}")]
    InvalidQuote(#[from] QuoteError),

    #[error(
        "Pricing policy returned {price} in period {period}, outside [{best_ask}, {best_bid}]"
    )]
    PricingContractViolation {
        period: Period,
        price: Price,
        best_ask: Price,
        best_bid: Price,
    },

    #[error("{trader} has no quota balance for {permit}")]
    UnsupportedTraderState { trader: TraderId, permit: PermitId },

    #[error("{0} is not known to the trader directory")]
    UnknownTrader(TraderId),

    #[error("{trader} holds {available} units, cannot deliver a lot of {required}")]
    InsufficientQuota {
        trader: TraderId,
        available: Quota,
        required: Quota,
    },
}

pub type MarketResult<T> = std::result::Result<T, MarketError>;
