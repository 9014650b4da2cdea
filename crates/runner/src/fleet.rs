//! Fleet - Trader accounts and the directory the markets trade against
//!
//! Each account holds cash and, per permit, a yearly quota allotment plus
//! what is left of it this season. Markets only see accounts through the
//! `QuotaAccount` port.

use quota_core::{Money, PermitId, Quota, TraderId};
use quota_ports::{QuotaAccount, TraderDirectory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One permit's balance in a trader's account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaBalance {
    pub permit: PermitId,
    /// Allotment restored at the start of every season
    pub yearly: Quota,
    /// Units left to land (or sell) this season
    pub remaining: Quota,
}

/// Cash and quota holdings of one trader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderAccount {
    id: TraderId,
    cash: Money,
    quotas: BTreeMap<PermitId, QuotaBalance>,
}

impl TraderAccount {
    pub fn new(id: TraderId, cash: Money) -> Self {
        Self {
            id,
            cash,
            quotas: BTreeMap::new(),
        }
    }

    /// Grant a yearly allotment for a permit, starting full
    pub fn with_quota(mut self, permit: PermitId, yearly: Quota) -> Self {
        self.quotas.insert(
            permit,
            QuotaBalance {
                permit,
                yearly,
                remaining: yearly,
            },
        );
        self
    }

    pub fn yearly_quota(&self, permit: PermitId) -> Option<Quota> {
        self.quotas.get(&permit).map(|balance| balance.yearly)
    }

    pub fn balances(&self) -> impl Iterator<Item = &QuotaBalance> {
        self.quotas.values()
    }

    /// Restore every permit balance to its yearly allotment
    pub fn reset_quotas(&mut self) {
        for balance in self.quotas.values_mut() {
            balance.remaining = balance.yearly;
        }
    }
}

impl QuotaAccount for TraderAccount {
    fn id(&self) -> TraderId {
        self.id
    }

    fn quota_remaining(&self, permit: PermitId) -> Option<Quota> {
        self.quotas.get(&permit).map(|balance| balance.remaining)
    }

    fn adjust_quota(&mut self, permit: PermitId, delta: Quota) {
        // markets check the balance exists before moving quota
        if let Some(balance) = self.quotas.get_mut(&permit) {
            balance.remaining += delta;
        }
    }

    fn earn(&mut self, amount: Money) {
        self.cash += amount;
    }

    fn spend(&mut self, amount: Money) {
        self.cash -= amount;
    }

    fn cash(&self) -> Money {
        self.cash
    }
}

/// Every trader in the simulation, in identity order
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    accounts: BTreeMap<TraderId, TraderAccount>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account, handing back any account it replaces
    pub fn insert(&mut self, account: TraderAccount) -> Option<TraderAccount> {
        self.accounts.insert(account.id, account)
    }

    pub fn get(&self, id: TraderId) -> Option<&TraderAccount> {
        self.accounts.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraderAccount> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Start of a new season for every trader
    pub fn reset_quotas(&mut self) {
        for account in self.accounts.values_mut() {
            account.reset_quotas();
        }
    }

    pub fn total_quota(&self, permit: PermitId) -> Quota {
        self.accounts
            .values()
            .filter_map(|account| account.quota_remaining(permit))
            .sum()
    }

    pub fn total_cash(&self) -> Money {
        self.accounts.values().map(|account| account.cash).sum()
    }
}

impl TraderDirectory for Fleet {
    fn account(&self, id: TraderId) -> Option<&dyn QuotaAccount> {
        self.accounts.account(id)
    }

    fn account_mut(&mut self, id: TraderId) -> Option<&mut dyn QuotaAccount> {
        self.accounts.account_mut(id)
    }
}
