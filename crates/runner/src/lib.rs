//! Quota Runner - Multi-Market Quota Trading Simulation
//!
//! Drives one or more quota markets over simulated days:
//!
//! - **Fleet**: Trader accounts with cash and seasonal quota allotments
//! - **Valuation**: Reference reservation-price generators
//! - **Config**: JSON description of a run
//! - **Simulation**: Day-by-day scheduling of every market
//! - **Report**: Per-day summaries, trade history and closing balances
//!
//! ## Architecture
//!
//! ```text
//!        ┌──────────────────────┐
//!        │  SimulationConfig    │
//!        └──────────┬───────────┘
//!                   │ builds
//!                   ▼
//! ┌─────────────────────────────────────────┐
//! │          QuotaMarketSimulation          │
//! │                                         │
//! │  day start: season reset ──► Fleet      │
//! │                                         │
//! │  ┌──────────────┐    ┌──────────────┐   │
//! │  │ permit-0     │    │ permit-1     │   │
//! │  │ order book   │ ─► │ order book   │   │
//! │  └──────┬───────┘    └──────┬───────┘   │
//! │         │ shared StdRng     │           │
//! └─────────┼───────────────────┼───────────┘
//!           ▼                   ▼
//!        ┌──────────────────────────┐
//!        │    SimulationReport      │
//!        └──────────────────────────┘
//! ```

pub mod config;
pub mod fleet;
pub mod report;
pub mod simulation;
pub mod valuation;

// Re-export main types
pub use config::{
    AllotmentSetup, ConfigError, MarketSetup, SimulationConfig, TraderSetup, ValuationConfig,
};
pub use fleet::{Fleet, QuotaBalance, TraderAccount};
pub use report::{AccountReport, DailyReport, SimulationReport};
pub use simulation::{QuotaMarketSimulation, SimulationError, SimulationResult};
pub use valuation::{ExhaustionRiskValuation, FixedValuation, ScriptedValuation};
