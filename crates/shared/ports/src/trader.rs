use quota_core::{Money, PermitId, Quota, TraderId};
use std::collections::{BTreeMap, HashMap};

/// Port for a trader's regulatory quota and cash balances
///
/// The engine only reads the quota balance and moves quota and cash
/// through these methods; everything else about the trader is owned by
/// the simulation.
pub trait QuotaAccount {
    /// Stable identity of the trader
    fn id(&self) -> TraderId;

    /// Remaining quota for a permit, `None` if the trader's regulation does
    /// not track that permit
    fn quota_remaining(&self, permit: PermitId) -> Option<Quota>;

    /// Add `delta` (may be negative) to the quota balance of a permit
    fn adjust_quota(&mut self, permit: PermitId, delta: Quota);

    /// Receive cash
    fn earn(&mut self, amount: Money);

    /// Pay cash
    fn spend(&mut self, amount: Money);

    /// Current cash balance
    fn cash(&self) -> Money;
}

/// Port resolving trader identities to their accounts
pub trait TraderDirectory {
    fn account(&self, id: TraderId) -> Option<&dyn QuotaAccount>;

    fn account_mut(&mut self, id: TraderId) -> Option<&mut dyn QuotaAccount>;
}

impl<T: QuotaAccount> TraderDirectory for BTreeMap<TraderId, T> {
    fn account(&self, id: TraderId) -> Option<&dyn QuotaAccount> {
        self.get(&id).map(|account| account as &dyn QuotaAccount)
    }

    fn account_mut(&mut self, id: TraderId) -> Option<&mut dyn QuotaAccount> {
        self.get_mut(&id).map(|account| account as &mut dyn QuotaAccount)
    }
}

impl<T: QuotaAccount> TraderDirectory for HashMap<TraderId, T> {
    fn account(&self, id: TraderId) -> Option<&dyn QuotaAccount> {
        self.get(&id).map(|account| account as &dyn QuotaAccount)
    }

    fn account_mut(&mut self, id: TraderId) -> Option<&mut dyn QuotaAccount> {
        self.get_mut(&id).map(|account| account as &mut dyn QuotaAccount)
    }
}
