use log::{debug, error, info, trace, warn};
use quota_core::{
    Period, PermitId, Price, Quota, Quote, QuoteSequence, Side, Trade, TradeId, TraderId,
};
use quota_matching::create_pricing_policy;
use quota_ports::{
    MarketError, MarketResult, PricingPolicy, TraderDirectory, ValuationContext, ValuationSource,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

use crate::config::{MarketConfig, validate_lot_size, validate_markup};
use crate::domain::{DailyStats, PenaltyBox, QuoteQueues, QuoteSides, quote_prices};

/// Where a clearing cycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookPhase {
    Idle,
    Collecting,
    Matching,
    Draining,
}

/// Periodic double-auction market for one permit type
///
/// Every period the book asks each registered trader for a reservation
/// price, turns it into a bid and (when allowed) an ask, and matches the
/// best crossing pairs one lot at a time until nothing crosses. Quotes
/// never survive the period they were posted in.
pub struct QuotaOrderBook {
    permit: PermitId,
    config: MarketConfig,
    /// Valuation per registered trader, iterated in identity order
    pricers: BTreeMap<TraderId, Box<dyn ValuationSource>>,
    pricing: Box<dyn PricingPolicy>,
    queues: QuoteQueues,
    sequence: QuoteSequence,
    penalty_box: PenaltyBox,
    /// Buyers of the running period, boxed once matching is over
    to_penalize: Vec<TraderId>,
    phase: BookPhase,
    daily: DailyStats,
    trades: Vec<Trade>,
    next_trade_id: TradeId,
    last_closing_price: Price,
}

impl std::fmt::Debug for QuotaOrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaOrderBook")
            .field("permit", &self.permit)
            .field("traders", &self.pricers.len())
            .field("asks_count", &self.queues.ask_count())
            .field("bids_count", &self.queues.bid_count())
            .field("penalized", &self.penalty_box.len())
            .field("phase", &self.phase)
            .field("pricing", &self.pricing.name())
            .field("last_closing_price", &self.last_closing_price)
            .finish()
    }
}

impl QuotaOrderBook {
    /// Create a market using the pricing policy named in the configuration
    pub fn new(permit: PermitId, config: MarketConfig) -> MarketResult<Self> {
        config.validate()?;
        let pricing = create_pricing_policy(&config.pricing)?;
        Self::with_pricing_policy(permit, config, pricing)
    }

    /// Create a market with a custom pricing policy
    ///
    /// `config.pricing` is neither used nor validated.
    pub fn with_pricing_policy(
        permit: PermitId,
        config: MarketConfig,
        pricing: Box<dyn PricingPolicy>,
    ) -> MarketResult<Self> {
        config.validate_market()?;
        let penalty_box = PenaltyBox::new(config.penalty_duration)?;

        Ok(Self {
            permit,
            config,
            pricers: BTreeMap::new(),
            pricing,
            queues: QuoteQueues::new(),
            sequence: QuoteSequence::new(),
            penalty_box,
            to_penalize: Vec::new(),
            phase: BookPhase::Idle,
            daily: DailyStats::default(),
            trades: Vec::new(),
            next_trade_id: 0,
            last_closing_price: f64::NAN,
        })
    }

    pub fn permit(&self) -> PermitId {
        self.permit
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn phase(&self) -> BookPhase {
        self.phase
    }

    pub fn pricing_policy_name(&self) -> &str {
        self.pricing.name()
    }

    /// Register a trader's valuation. A second registration replaces the
    /// first one and hands it back.
    pub fn register_trader(
        &mut self,
        trader: TraderId,
        source: Box<dyn ValuationSource>,
    ) -> Option<Box<dyn ValuationSource>> {
        let previous = self.pricers.insert(trader, source);
        if previous.is_some() {
            warn!("{}: replaced valuation of {}", self.permit, trader);
        } else {
            info!("{}: registered {}", self.permit, trader);
        }
        previous
    }

    pub fn is_registered(&self, trader: TraderId) -> bool {
        self.pricers.contains_key(&trader)
    }

    /// Registered traders in identity order
    pub fn registered_traders(&self) -> impl Iterator<Item = TraderId> + '_ {
        self.pricers.keys().copied()
    }

    pub fn in_penalty_box(&self, trader: TraderId) -> bool {
        self.penalty_box.has(trader)
    }

    pub fn penalty_box(&self) -> &PenaltyBox {
        &self.penalty_box
    }

    /// Price of the most recent trade ever, NaN before the first one
    pub fn last_closing_price(&self) -> Price {
        self.last_closing_price
    }

    /// Counters of the last stepped period
    pub fn daily_stats(&self) -> DailyStats {
        self.daily
    }

    /// Trades of the last stepped period, in execution order
    pub fn daily_trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn is_active(&self, period: Period) -> bool {
        period >= self.config.activation_period
    }

    pub fn set_markup(&mut self, markup: f64) -> MarketResult<()> {
        validate_markup(markup)?;
        self.config.markup = markup;
        Ok(())
    }

    pub fn set_units_traded_per_match(&mut self, units: Quota) -> MarketResult<()> {
        validate_lot_size(units)?;
        self.config.units_traded_per_match = units;
        Ok(())
    }

    pub fn set_allow_multiple_trades(&mut self, allow: bool) {
        self.config.allow_multiple_trades_per_period = allow;
    }

    pub fn set_pricing_policy(&mut self, pricing: Box<dyn PricingPolicy>) {
        self.pricing = pricing;
    }

    /// Run one clearing cycle.
    ///
    /// Draws exactly one `u64` from `rng` when the market is active and
    /// nothing otherwise. On error the period is abandoned: queues are
    /// drained, trades already executed stand and their buyers are boxed.
    pub fn step<D, R>(
        &mut self,
        period: Period,
        directory: &mut D,
        rng: &mut R,
    ) -> MarketResult<DailyStats>
    where
        D: TraderDirectory + ?Sized,
        R: Rng,
    {
        self.daily = DailyStats::default();
        self.trades.clear();

        if !self.is_active(period) {
            trace!(
                "{}: inactive in period {} (opens in period {})",
                self.permit, period, self.config.activation_period
            );
            return Ok(self.daily);
        }

        self.penalty_box.tick();

        let outcome = self.collect_and_clear(period, directory, rng);

        self.phase = BookPhase::Draining;
        let discarded = self.queues.ask_count() + self.queues.bid_count();
        self.queues.clear();
        for trader in self.to_penalize.drain(..) {
            self.penalty_box.register(trader);
        }
        self.phase = BookPhase::Idle;

        match outcome {
            Ok(()) => {
                debug!(
                    "{}: period {} cleared {} matches, {} units, {:.2} money, {} quotes discarded",
                    self.permit,
                    period,
                    self.daily.matches,
                    self.daily.quota_volume,
                    self.daily.money_volume,
                    discarded
                );
                Ok(self.daily)
            }
            Err(e) => {
                error!("{}: period {} aborted: {}", self.permit, period, e);
                Err(e)
            }
        }
    }

    fn collect_and_clear<D, R>(
        &mut self,
        period: Period,
        directory: &mut D,
        rng: &mut R,
    ) -> MarketResult<()>
    where
        D: TraderDirectory + ?Sized,
        R: Rng,
    {
        self.phase = BookPhase::Collecting;

        // Sort by identity before shuffling, or the same seed could yield a different order
        let mut traders: Vec<TraderId> = self.pricers.keys().copied().collect();
        let mut shuffler = StdRng::seed_from_u64(rng.r#gen::<u64>());
        traders.shuffle(&mut shuffler);

        for trader in traders {
            self.generate_quotes(trader, period, &*directory, QuoteSides::BOTH)?;
        }

        trace!(
            "{}: {} asks, {} bids on the book",
            self.permit,
            self.queues.ask_count(),
            self.queues.bid_count()
        );

        self.phase = BookPhase::Matching;
        self.clear_quotes(period, directory)
    }

    /// Ask a trader for a reservation price and post the resulting quotes.
    fn generate_quotes<D>(
        &mut self,
        trader: TraderId,
        period: Period,
        directory: &D,
        sides: QuoteSides,
    ) -> MarketResult<()>
    where
        D: TraderDirectory + ?Sized,
    {
        let account = directory
            .account(trader)
            .ok_or(MarketError::UnknownTrader(trader))?;
        let quota = account
            .quota_remaining(self.permit)
            .ok_or(MarketError::UnsupportedTraderState {
                trader,
                permit: self.permit,
            })?;

        let Some(source) = self.pricers.get_mut(&trader) else {
            return Ok(());
        };
        let reservation = source.compute_reservation_price(&ValuationContext {
            trader: account,
            permit: self.permit,
            period,
        });

        if !reservation.is_finite() {
            trace!("{}: {} abstains in period {}", self.permit, trader, period);
            return Ok(());
        }

        let prices = quote_prices(reservation, self.config.markup, self.config.epsilon);

        if sides.bid && reservation > 0.0 {
            let bid = self.sequence.issue(Side::Bid, prices.bid, trader)?;
            trace!("{}: {} bids {}", self.permit, trader, bid.price);
            self.queues.push(bid);
        }

        if sides.ask
            && quota >= self.config.units_traded_per_match
            && !self.penalty_box.has(trader)
        {
            let ask = self.sequence.issue(Side::Ask, prices.ask, trader)?;
            trace!("{}: {} asks {}", self.permit, trader, ask.price);
            self.queues.push(ask);
        }

        Ok(())
    }

    /// Match best ask against best bid until they stop crossing.
    fn clear_quotes<D>(&mut self, period: Period, directory: &mut D) -> MarketResult<()>
    where
        D: TraderDirectory + ?Sized,
    {
        // Each pass removes at least one quote for good, so this terminates
        while let Some((ask, bid)) = self.queues.pop_best_pair() {
            if ask.price > bid.price {
                trace!(
                    "{}: best ask {} above best bid {}, done",
                    self.permit, ask.price, bid.price
                );
                return Ok(());
            }

            if ask.trader == bid.trader {
                // A trader never fills their own bid. After a re-quote either a fresh
                // bid tops the trader's older ask or a fresh ask undercuts their older
                // bid; in both cases the ask is withdrawn
                debug!(
                    "{}: withdrawing ask {} of {}, crossed by their own bid {}",
                    self.permit, ask.price, ask.trader, bid.price
                );
                self.queues.push(bid);
                continue;
            }

            let second_best_ask = self.queues.best_ask().map(|quote| quote.price);
            let second_best_bid = self.queues.best_bid().map(|quote| quote.price);
            let price =
                self.pricing
                    .trade_price(ask.price, bid.price, second_best_ask, second_best_bid);

            if !(ask.price <= price && price <= bid.price) {
                return Err(MarketError::PricingContractViolation {
                    period,
                    price,
                    best_ask: ask.price,
                    best_bid: bid.price,
                });
            }

            self.execute_trade(period, &ask, &bid, price, directory)?;

            if self.config.allow_multiple_trades_per_period {
                self.generate_quotes(bid.trader, period, &*directory, QuoteSides::BID_ONLY)?;
                self.generate_quotes(ask.trader, period, &*directory, QuoteSides::ASK_ONLY)?;
            }
        }

        Ok(())
    }

    /// Move one lot from seller to buyer and the matching cash the other way.
    ///
    /// Both accounts are checked before either is touched.
    fn execute_trade<D>(
        &mut self,
        period: Period,
        ask: &Quote,
        bid: &Quote,
        price: Price,
        directory: &mut D,
    ) -> MarketResult<()>
    where
        D: TraderDirectory + ?Sized,
    {
        let lot = self.config.units_traded_per_match;
        let (seller, buyer) = (ask.trader, bid.trader);

        let seller_quota = self.quota_of(&*directory, seller)?;
        self.quota_of(&*directory, buyer)?;
        if seller_quota < lot {
            return Err(MarketError::InsufficientQuota {
                trader: seller,
                available: seller_quota,
                required: lot,
            });
        }

        let amount = price * lot as f64;

        let seller_account = directory
            .account_mut(seller)
            .ok_or(MarketError::UnknownTrader(seller))?;
        seller_account.adjust_quota(self.permit, -lot);
        seller_account.earn(amount);

        let buyer_account = directory
            .account_mut(buyer)
            .ok_or(MarketError::UnknownTrader(buyer))?;
        buyer_account.adjust_quota(self.permit, lot);
        buyer_account.spend(amount);

        let trade = Trade {
            id: self.next_trade_id,
            period,
            permit: self.permit,
            buyer,
            seller,
            price,
            quantity: lot,
            ask_price: ask.price,
            bid_price: bid.price,
        };
        self.next_trade_id += 1;

        debug!(
            "{}: {} bought {} units from {} at {} (ask {}, bid {})",
            self.permit, buyer, lot, seller, price, ask.price, bid.price
        );

        self.daily.record(&trade);
        self.trades.push(trade);
        self.last_closing_price = price;
        self.to_penalize.push(buyer);

        Ok(())
    }

    fn quota_of<D>(&self, directory: &D, trader: TraderId) -> MarketResult<Quota>
    where
        D: TraderDirectory + ?Sized,
    {
        directory
            .account(trader)
            .ok_or(MarketError::UnknownTrader(trader))?
            .quota_remaining(self.permit)
            .ok_or(MarketError::UnsupportedTraderState {
                trader,
                permit: self.permit,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quota_core::Money;
    use quota_matching::{BidPricePolicy, PricingPolicyConfig};
    use quota_ports::QuotaAccount;
    use std::cell::Cell;

    struct Account {
        id: TraderId,
        quota: Option<Quota>,
        cash: Money,
        /// Balance reported from the second read on, as if spent elsewhere
        drained_to: Option<Quota>,
        reads: Cell<u32>,
    }

    impl QuotaAccount for Account {
        fn id(&self) -> TraderId {
            self.id
        }

        fn quota_remaining(&self, _permit: PermitId) -> Option<Quota> {
            self.reads.set(self.reads.get() + 1);
            match self.drained_to {
                Some(drained) if self.reads.get() > 1 => Some(drained),
                _ => self.quota,
            }
        }

        fn adjust_quota(&mut self, _permit: PermitId, delta: Quota) {
            if let Some(quota) = self.quota.as_mut() {
                *quota += delta;
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

    struct Fixed(Price);

    impl ValuationSource for Fixed {
        fn compute_reservation_price(&mut self, _ctx: &ValuationContext<'_>) -> Price {
            self.0
        }
    }

    fn directory(entries: &[(u32, Option<Quota>)]) -> BTreeMap<TraderId, Account> {
        entries
            .iter()
            .map(|&(id, quota)| {
                (
                    TraderId(id),
                    Account {
                        id: TraderId(id),
                        quota,
                        cash: 0.0,
                        drained_to: None,
                        reads: Cell::new(0),
                    },
                )
            })
            .collect()
    }

    fn book(config: MarketConfig) -> QuotaOrderBook {
        QuotaOrderBook::new(PermitId(0), config).unwrap()
    }

    #[test]
    fn test_new_book_is_idle_and_untraded() {
        let book = book(MarketConfig::default());
        assert_eq!(book.phase(), BookPhase::Idle);
        assert!(book.last_closing_price().is_nan());
        assert_eq!(book.daily_stats(), DailyStats::default());
        assert_eq!(book.pricing_policy_name(), "Ask Price");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = QuotaOrderBook::new(
            PermitId(0),
            MarketConfig {
                units_traded_per_match: -5,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(MarketError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_reregistration_replaces_valuation() {
        let mut book = book(MarketConfig::default());
        assert!(book.register_trader(TraderId(1), Box::new(Fixed(10.0))).is_none());
        assert!(book.register_trader(TraderId(1), Box::new(Fixed(20.0))).is_some());
        assert_eq!(book.registered_traders().collect::<Vec<_>>(), vec![TraderId(1)]);
    }

    #[test]
    fn test_setters_validate() {
        let mut book = book(MarketConfig::default());
        assert!(book.set_markup(-0.1).is_err());
        assert!(book.set_units_traded_per_match(0).is_err());

        book.set_markup(0.1).unwrap();
        book.set_units_traded_per_match(50).unwrap();
        book.set_allow_multiple_trades(true);
        assert_eq!(book.config().markup, 0.1);
        assert_eq!(book.config().units_traded_per_match, 50);
        assert!(book.config().allow_multiple_trades_per_period);
    }

    #[test]
    fn test_phase_returns_to_idle_and_queues_drained() {
        let mut book = book(MarketConfig::default());
        let mut traders = directory(&[(1, Some(100)), (2, Some(100))]);
        book.register_trader(TraderId(1), Box::new(Fixed(10.0)));
        book.register_trader(TraderId(2), Box::new(Fixed(10.0)));

        let mut rng = StdRng::seed_from_u64(1);
        book.step(0, &mut traders, &mut rng).unwrap();

        assert_eq!(book.phase(), BookPhase::Idle);
        assert_eq!(book.queues.ask_count(), 0);
        assert_eq!(book.queues.bid_count(), 0);
    }

    #[test]
    fn test_missing_quota_balance_fails_fast() {
        let mut book = book(MarketConfig::default());
        let mut traders = directory(&[(1, Some(100)), (2, None)]);
        book.register_trader(TraderId(1), Box::new(Fixed(10.0)));
        book.register_trader(TraderId(2), Box::new(Fixed(10.0)));

        let mut rng = StdRng::seed_from_u64(1);
        let err = book.step(0, &mut traders, &mut rng).unwrap_err();
        assert_eq!(
            err,
            MarketError::UnsupportedTraderState {
                trader: TraderId(2),
                permit: PermitId(0)
            }
        );
        assert_eq!(book.phase(), BookPhase::Idle);
    }

    #[test]
    fn test_unknown_trader_fails_fast() {
        let mut book = book(MarketConfig::default());
        let mut traders = directory(&[(1, Some(100))]);
        book.register_trader(TraderId(1), Box::new(Fixed(10.0)));
        book.register_trader(TraderId(9), Box::new(Fixed(10.0)));

        let mut rng = StdRng::seed_from_u64(1);
        let err = book.step(0, &mut traders, &mut rng).unwrap_err();
        assert_eq!(err, MarketError::UnknownTrader(TraderId(9)));
    }

    #[test]
    fn test_non_finite_valuation_abstains() {
        let mut book = book(MarketConfig::default());
        let mut traders = directory(&[(1, Some(100)), (2, Some(100))]);
        book.register_trader(TraderId(1), Box::new(Fixed(f64::NAN)));
        book.register_trader(TraderId(2), Box::new(Fixed(f64::INFINITY)));

        let mut rng = StdRng::seed_from_u64(1);
        let stats = book.step(0, &mut traders, &mut rng).unwrap();
        assert_eq!(stats.matches, 0);
    }

    #[test]
    fn test_custom_policy_skips_pricing_config() {
        let config = MarketConfig {
            pricing: PricingPolicyConfig::KDouble { k: 2.0 },
            ..Default::default()
        };
        assert!(QuotaOrderBook::new(PermitId(0), config.clone()).is_err());

        let book =
            QuotaOrderBook::with_pricing_policy(PermitId(0), config, Box::new(BidPricePolicy))
                .unwrap();
        assert_eq!(book.pricing_policy_name(), "Bid Price");
    }

    #[test]
    fn test_markup_above_one_fails_as_invalid_quote() {
        let mut book = book(MarketConfig {
            markup: 1.5,
            ..Default::default()
        });
        let mut traders = directory(&[(1, Some(100))]);
        book.register_trader(TraderId(1), Box::new(Fixed(10.0)));

        let mut rng = StdRng::seed_from_u64(1);
        let err = book.step(0, &mut traders, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            MarketError::InvalidQuote(quota_core::QuoteError::NegativePrice { .. })
        ));
        assert_eq!(book.phase(), BookPhase::Idle);
    }

    #[test]
    fn test_markup_of_one_bids_zero() {
        let mut book = book(MarketConfig {
            markup: 1.0,
            ..Default::default()
        });
        // bids 0, asks 20 and bids 0, asks 10: no crossing, but no error either
        let mut traders = directory(&[(1, Some(100)), (2, Some(100))]);
        book.register_trader(TraderId(1), Box::new(Fixed(10.0)));
        book.register_trader(TraderId(2), Box::new(Fixed(5.0)));

        let mut rng = StdRng::seed_from_u64(1);
        let stats = book.step(0, &mut traders, &mut rng).unwrap();
        assert_eq!(stats.matches, 0);
    }

    #[test]
    fn test_seller_short_of_a_lot_at_execution_fails_before_transfer() {
        let mut book = book(MarketConfig::default());
        let mut traders = directory(&[(1, Some(100)), (2, Some(100))]);
        if let Some(seller) = traders.get_mut(&TraderId(2)) {
            seller.drained_to = Some(50);
        }
        book.register_trader(TraderId(1), Box::new(Fixed(20.0)));
        book.register_trader(TraderId(2), Box::new(Fixed(10.0)));

        let mut rng = StdRng::seed_from_u64(1);
        let err = book.step(0, &mut traders, &mut rng).unwrap_err();
        assert_eq!(
            err,
            MarketError::InsufficientQuota {
                trader: TraderId(2),
                available: 50,
                required: 100
            }
        );

        assert_eq!(traders[&TraderId(1)].quota, Some(100));
        assert_eq!(traders[&TraderId(2)].quota, Some(100));
        assert_eq!(traders[&TraderId(1)].cash, 0.0);
        assert_eq!(traders[&TraderId(2)].cash, 0.0);
        assert!(book.daily_trades().is_empty());
        assert!(book.last_closing_price().is_nan());
    }

    #[test]
    fn test_pricing_policy_swapped_between_periods() {
        let mut book = book(MarketConfig::default());
        let mut traders = directory(&[(1, Some(100)), (2, Some(200))]);
        book.register_trader(TraderId(1), Box::new(Fixed(20.0)));
        book.register_trader(TraderId(2), Box::new(Fixed(10.0)));
        let mut rng = StdRng::seed_from_u64(1);

        // trader 2 asks 10.5 against trader 1's bid of 19
        book.step(0, &mut traders, &mut rng).unwrap();
        assert_eq!(book.last_closing_price(), 10.5);

        book.set_pricing_policy(Box::new(BidPricePolicy));
        assert_eq!(book.pricing_policy_name(), "Bid Price");
        book.step(1, &mut traders, &mut rng).unwrap();
        assert_eq!(book.last_closing_price(), 19.0);
        assert_eq!(traders[&TraderId(1)].quota, Some(300));
        assert_eq!(traders[&TraderId(2)].quota, Some(0));
    }
}
