//! Tick-count bar building.
//!
//! Every `size` consecutive ticks form one [`TickBar`]. The bar starts at its
//! first tick and ends at the latest tick time seen, so durations vary.

use timebar_core::{Config, OfferSide, Result, TickBar, TickData, Timestamped, TimestampMs};
use tracing::trace;

use crate::bar_builder::BarInProgress;

/// Builder for fixed tick-count bars.
pub struct TickBarBuilder {
    size: u64,
    side: OfferSide,
    current: Option<TickBarInProgress>,
}

struct TickBarInProgress {
    start: TimestampMs,
    end: TimestampMs,
    ohlcv: BarInProgress,
}

impl TickBarInProgress {
    fn to_tick_bar(&self) -> Option<TickBar> {
        let bar = self.ohlcv.to_bar(self.start)?;
        Some(TickBar::new(bar, self.end, self.ohlcv.tick_count()))
    }
}

impl TickBarBuilder {
    /// Create a builder emitting one bar per `size` ticks. A size of zero is treated as one.
    pub fn new(size: u32, side: OfferSide) -> Self {
        Self {
            size: u64::from(size.max(1)),
            side,
            current: None,
        }
    }

    /// Create a builder from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.bars.tick_bar_size, config.bars.offer_side))
    }

    /// Add a tick, returning the bar it completes, if any.
    pub fn add_tick<T: TickData + ?Sized>(&mut self, tick: &T) -> Option<TickBar> {
        let time = tick.time();
        let current = self.current.get_or_insert_with(|| TickBarInProgress {
            start: time,
            end: time,
            ohlcv: BarInProgress::new(),
        });
        current.end = current.end.max(time);
        current.ohlcv.add(tick.price(self.side), tick.volume(self.side));

        if current.ohlcv.tick_count() < self.size {
            return None;
        }
        let completed = self.current.take()?.to_tick_bar();
        if let Some(bar) = &completed {
            trace!(start_ms = bar.time(), ticks = self.size, "tick bar complete");
        }
        completed
    }

    /// Add multiple ticks, returning every bar they complete.
    pub fn add_ticks<T: TickData>(&mut self, ticks: &[T]) -> Vec<TickBar> {
        ticks.iter().filter_map(|t| self.add_tick(t)).collect()
    }

    /// Emit the partial bar in progress, if any.
    pub fn flush(&mut self) -> Option<TickBar> {
        self.current.take()?.to_tick_bar()
    }

    /// Ticks collected toward the next bar.
    pub fn pending_ticks(&self) -> u64 {
        self.current.as_ref().map_or(0, |c| c.ohlcv.tick_count())
    }
}
