//! Reporting sink - per-day market summaries and the full trade history

use quota_core::{Money, Period, PermitId, Price, Quota, Trade, TraderId};
use quota_exchange::QuotaOrderBook;
use quota_ports::QuotaAccount;
use serde::Serialize;

use crate::fleet::{Fleet, QuotaBalance};

/// One market's activity on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub day: Period,
    pub permit: PermitId,
    pub matches: u64,
    pub quota_volume: Quota,
    pub money_volume: Money,
    /// Volume-weighted price, absent when nothing traded
    pub average_price: Option<Price>,
    /// Price of the market's latest trade on any day so far
    pub last_closing_price: Option<Price>,
}

impl DailyReport {
    pub fn from_book(day: Period, book: &QuotaOrderBook) -> Self {
        let stats = book.daily_stats();
        Self {
            day,
            permit: book.permit(),
            matches: stats.matches,
            quota_volume: stats.quota_volume,
            money_volume: stats.money_volume,
            average_price: finite(stats.average_price()),
            last_closing_price: finite(book.last_closing_price()),
        }
    }
}

/// Closing balances of one trader
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountReport {
    pub trader: TraderId,
    pub cash: Money,
    pub quotas: Vec<QuotaBalance>,
}

/// Everything a simulation run produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationReport {
    pub days: Vec<DailyReport>,
    pub trades: Vec<Trade>,
    pub accounts: Vec<AccountReport>,
}

impl SimulationReport {
    /// Record the day that `book` just cleared
    pub fn record_day(&mut self, day: Period, book: &QuotaOrderBook) {
        self.days.push(DailyReport::from_book(day, book));
        self.trades.extend_from_slice(book.daily_trades());
    }

    /// Snapshot every account's balances, replacing any earlier snapshot
    pub fn record_accounts(&mut self, fleet: &Fleet) {
        self.accounts = fleet
            .iter()
            .map(|account| AccountReport {
                trader: account.id(),
                cash: account.cash(),
                quotas: account.balances().copied().collect(),
            })
            .collect();
    }

    pub fn total_matches(&self) -> u64 {
        self.days.iter().map(|day| day.matches).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn finite(price: Price) -> Option<Price> {
    price.is_finite().then_some(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::TraderAccount;
    use quota_exchange::MarketConfig;

    #[test]
    fn test_untraded_day_has_no_prices() {
        let book = QuotaOrderBook::new(PermitId(2), MarketConfig::default()).unwrap();
        let report = DailyReport::from_book(4, &book);

        assert_eq!(report.day, 4);
        assert_eq!(report.permit, PermitId(2));
        assert_eq!(report.matches, 0);
        assert_eq!(report.average_price, None);
        assert_eq!(report.last_closing_price, None);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["average_price"].is_null());
    }

    #[test]
    fn test_account_snapshot() {
        let mut fleet = Fleet::new();
        fleet.insert(TraderAccount::new(TraderId(3), 12.0).with_quota(PermitId(0), 100));

        let mut report = SimulationReport::default();
        report.record_accounts(&fleet);
        report.record_accounts(&fleet);

        assert_eq!(report.accounts.len(), 1);
        assert_eq!(report.accounts[0].trader, TraderId(3));
        assert_eq!(report.accounts[0].quotas[0].remaining, 100);
        assert!(report.to_json().unwrap().contains("\"remaining\": 100"));
    }
}
