use quota_core::{Period, PermitId, Price};

use crate::QuotaAccount;

/// What a valuation source may look at when pricing quota
pub struct ValuationContext<'a> {
    /// The trader being valued
    pub trader: &'a dyn QuotaAccount,
    /// The permit the market trades
    pub permit: PermitId,
    /// The period being cleared
    pub period: Period,
}

/// Port for a trader's reservation price ("shadow price" of one more unit)
///
/// Called once per period per registered trader, and again after each of
/// its trades when multiple trades per period are allowed. A non-finite
/// result (NaN or infinity) means "no order this period" and is not an error.
pub trait ValuationSource {
    fn compute_reservation_price(&mut self, ctx: &ValuationContext<'_>) -> Price;
}

impl<F> ValuationSource for F
where
    F: FnMut(&ValuationContext<'_>) -> Price,
{
    fn compute_reservation_price(&mut self, ctx: &ValuationContext<'_>) -> Price {
        self(ctx)
    }
}
