//! Reference valuation sources
//!
//! Simple reservation-price generators for driving markets without a full
//! fishing model behind them.

use quota_core::{Period, Price};
use quota_ports::{ValuationContext, ValuationSource};
use std::collections::VecDeque;

/// Always quotes the same reservation price
#[derive(Debug, Clone, Copy)]
pub struct FixedValuation(pub Price);

impl ValuationSource for FixedValuation {
    fn compute_reservation_price(&mut self, _ctx: &ValuationContext<'_>) -> Price {
        self.0
    }
}

/// Plays back a queue of reservation prices, then repeats the last one
///
/// An empty script abstains forever.
#[derive(Debug, Clone)]
pub struct ScriptedValuation {
    script: VecDeque<Price>,
    last: Price,
}

impl ScriptedValuation {
    pub fn new(prices: impl IntoIterator<Item = Price>) -> Self {
        Self {
            script: prices.into_iter().collect(),
            last: f64::NAN,
        }
    }
}

impl ValuationSource for ScriptedValuation {
    fn compute_reservation_price(&mut self, _ctx: &ValuationContext<'_>) -> Price {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Shadow price of quota from the risk of running out before season end
///
/// Demand over the rest of the season is approximated as normal with mean
/// `daily_mean * days_left` and deviation `daily_sd * sqrt(days_left)`;
/// one more unit is worth `unit_value` times the chance that demand
/// exceeds the quota still held.
#[derive(Debug, Clone, Copy)]
pub struct ExhaustionRiskValuation {
    pub unit_value: Price,
    pub daily_mean: f64,
    pub daily_sd: f64,
    pub season_length: Period,
}

impl ExhaustionRiskValuation {
    /// Days of the season still to go, today included
    pub fn days_left(&self, period: Period) -> Period {
        if self.season_length == 0 {
            return 0;
        }
        self.season_length - period % self.season_length
    }

    /// Probability that demand over `days_left` days exceeds `quota`
    pub fn exhaustion_probability(&self, quota: f64, days_left: Period) -> f64 {
        let days = days_left as f64;
        let mean = self.daily_mean * days;
        let sd = self.daily_sd * days.sqrt();

        if sd <= 0.0 {
            return if mean > quota { 1.0 } else { 0.0 };
        }
        1.0 - normal_cdf((quota - mean) / sd)
    }
}

impl ValuationSource for ExhaustionRiskValuation {
    fn compute_reservation_price(&mut self, ctx: &ValuationContext<'_>) -> Price {
        let days_left = self.days_left(ctx.period);
        if days_left == 0 || self.daily_mean <= 0.0 {
            return f64::NAN;
        }
        let Some(quota) = ctx.trader.quota_remaining(ctx.permit) else {
            return f64::NAN;
        };

        self.unit_value * self.exhaustion_probability(quota as f64, days_left)
    }
}

/// Standard normal CDF (Abramowitz and Stegun 7.1.26)
fn normal_cdf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}
