use quota_core::TraderId;
use quota_ports::{MarketError, MarketResult};
use std::collections::HashMap;

/// Cool-down tracker for recent buyers
///
/// A trader registered here may not post asks, which keeps buyers from
/// reselling what they just bought and dampens bid-ask bounce. A duration
/// of zero disables the box entirely.
#[derive(Debug, Clone)]
pub struct PenaltyBox {
    duration: u32,
    /// Ticks each boxed trader still has to sit out
    remaining: HashMap<TraderId, u32>,
}

impl PenaltyBox {
    pub fn new(duration: i64) -> MarketResult<Self> {
        let duration = u32::try_from(duration).map_err(|_| {
            MarketError::InvalidConfiguration(format!(
                "penalty duration must be a non-negative period count, got {duration}"
            ))
        })?;

        Ok(Self {
            duration,
            remaining: HashMap::new(),
        })
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_enabled(&self) -> bool {
        self.duration > 0
    }

    pub fn has(&self, trader: TraderId) -> bool {
        self.remaining.contains_key(&trader)
    }

    /// Periods left before the trader may sell again
    pub fn remaining(&self, trader: TraderId) -> Option<u32> {
        self.remaining.get(&trader).copied()
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Box a trader for the full duration, resetting any running penalty.
    pub fn register(&mut self, trader: TraderId) {
        if !self.is_enabled() {
            return;
        }
        self.remaining.insert(trader, self.duration);
    }

    /// Advance one period.
    ///
    /// A trader registered with duration `d` stays boxed through the next
    /// `d` ticks and is released on the tick after.
    pub fn tick(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.remaining.retain(|_, left| {
            if *left == 0 {
                return false;
            }
            *left -= 1;
            true
        });
    }
}
