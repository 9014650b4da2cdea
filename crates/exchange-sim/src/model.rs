// Re-export domain types from quota-core and the ports they plug into,
// so simulation code can depend on this crate alone
pub use quota_core::{
    Money, Period, PermitId, Price, Quota, Quote, QuoteError, QuoteSequence, Side, Trade,
    TradeId, TraderId, round_price,
};

pub use quota_ports::{
    MarketError, MarketResult, PricingPolicy, QuotaAccount, TraderDirectory, ValuationContext,
    ValuationSource,
};

pub use quota_matching::{
    AskPricePolicy, BidPricePolicy, KDoublePolicy, MidpointPolicy, PricingPolicyConfig,
    RunnerUpPolicy, create_pricing_policy,
};
