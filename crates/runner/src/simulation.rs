//! Simulation - Daily scheduling of quota markets
//!
//! Each simulated day runs, in order:
//! - The seasonal quota reset (first day of every season)
//! - Every market's clearing cycle, in permit order, sharing one seeded generator
//! - The reporting sink

use log::{debug, info};
use quota_core::{Period, PermitId, TraderId};
use quota_exchange::QuotaOrderBook;
use quota_ports::{MarketError, ValuationSource};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::{ConfigError, SimulationConfig};
use crate::fleet::Fleet;
use crate::report::SimulationReport;

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("market {permit} failed on day {day}: {source}")]
    Market {
        day: Period,
        permit: PermitId,
        #[source]
        source: MarketError,
    },
}

pub type SimulationResult<T> = Result<T, SimulationError>;

/// A fleet of traders and the markets they trade quota in
pub struct QuotaMarketSimulation {
    /// Next day to simulate
    day: Period,
    days: Period,
    season_length: Period,
    fleet: Fleet,
    /// Markets stepped in ascending permit order
    markets: BTreeMap<PermitId, QuotaOrderBook>,
    rng: StdRng,
    report: SimulationReport,
}

impl std::fmt::Debug for QuotaMarketSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaMarketSimulation")
            .field("day", &self.day)
            .field("days", &self.days)
            .field("season_length", &self.season_length)
            .field("traders", &self.fleet.len())
            .field("markets", &self.markets.len())
            .finish()
    }
}

impl QuotaMarketSimulation {
    /// Empty simulation; add markets and register traders before running
    pub fn new(
        seed: u64,
        days: Period,
        season_length: Period,
        fleet: Fleet,
    ) -> SimulationResult<Self> {
        if season_length == 0 {
            let reason = "season length must be at least one day".to_string();
            return Err(ConfigError::Invalid(reason).into());
        }

        Ok(Self {
            day: 0,
            days,
            season_length,
            fleet,
            markets: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed),
            report: SimulationReport::default(),
        })
    }

    /// Build markets, accounts and valuations from a validated configuration
    pub fn from_config(config: &SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;

        let mut simulation = Self::new(
            config.seed,
            config.days,
            config.season_length,
            config.build_fleet(),
        )?;

        for setup in &config.markets {
            let book = QuotaOrderBook::new(setup.permit, setup.config.clone())
                .map_err(|e| ConfigError::Invalid(format!("{}: {}", setup.permit, e)))?;
            simulation.add_market(book);
        }

        for trader in &config.traders {
            for allotment in &trader.allotments {
                if let Some(valuation) = &allotment.valuation {
                    simulation.register_trader(
                        allotment.permit,
                        trader.id,
                        valuation.build(config.season_length),
                    )?;
                }
            }
        }

        info!(
            "simulation ready: {} traders, {} markets, {} days",
            simulation.fleet.len(),
            simulation.markets.len(),
            simulation.days
        );

        Ok(simulation)
    }

    /// Add a market, handing back any market it replaces for the same permit
    pub fn add_market(&mut self, book: QuotaOrderBook) -> Option<QuotaOrderBook> {
        info!("adding market for {}", book.permit());
        self.markets.insert(book.permit(), book)
    }

    /// Register a trader's valuation in the market for `permit`
    pub fn register_trader(
        &mut self,
        permit: PermitId,
        trader: TraderId,
        source: Box<dyn ValuationSource>,
    ) -> SimulationResult<()> {
        let book = self.markets.get_mut(&permit).ok_or_else(|| {
            ConfigError::Invalid(format!("{trader} registered for {permit}, which has no market"))
        })?;
        book.register_trader(trader, source);
        Ok(())
    }

    pub fn market(&self, permit: PermitId) -> Option<&QuotaOrderBook> {
        self.markets.get(&permit)
    }

    pub fn market_mut(&mut self, permit: PermitId) -> Option<&mut QuotaOrderBook> {
        self.markets.get_mut(&permit)
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Next day to be simulated
    pub fn day(&self) -> Period {
        self.day
    }

    pub fn is_finished(&self) -> bool {
        self.day >= self.days
    }

    pub fn report(&self) -> &SimulationReport {
        &self.report
    }

    pub fn into_report(self) -> SimulationReport {
        self.report
    }

    /// Simulate one day.
    ///
    /// A failing market aborts the day; markets stepped before it keep
    /// their results and the day counter does not advance.
    pub fn step_day(&mut self) -> SimulationResult<()> {
        let day = self.day;

        if day % self.season_length == 0 {
            self.fleet.reset_quotas();
            info!("day {day}: new season, quotas restored");
        }

        for (&permit, book) in self.markets.iter_mut() {
            book.step(day, &mut self.fleet, &mut self.rng)
                .map_err(|source| SimulationError::Market {
                    day,
                    permit,
                    source,
                })?;
            self.report.record_day(day, book);
        }

        debug!("day {day} done");
        self.day += 1;
        Ok(())
    }

    /// Simulate every remaining day, then snapshot the accounts
    pub fn run(&mut self) -> SimulationResult<&SimulationReport> {
        while !self.is_finished() {
            self.step_day()?;
        }
        self.report.record_accounts(&self.fleet);

        info!(
            "simulation finished after {} days: {} trades",
            self.day,
            self.report.trades.len()
        );
        Ok(&self.report)
    }
}
