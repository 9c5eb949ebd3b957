//! Period bar building from ticks.
//!
//! Folds ticks into period-aligned OHLCV bars on one side of the book.

use std::collections::BTreeMap;

use timebar_core::{
    bucket_end, bucket_start, Bar, Config, OfferSide, Period, Result, TickData, Timestamped,
    TimestampMs,
};
use tracing::{debug, warn};

/// Builder for period bars from ticks.
pub struct BarBuilder {
    period: Period,
    side: OfferSide,
    /// Bars being built, keyed by bucket start.
    bars: BTreeMap<TimestampMs, BarInProgress>,
    /// Bars closed early by the pending limit, waiting to be handed out.
    evicted: Vec<Bar>,
    max_pending: usize,
    reject_out_of_order: bool,
    /// Start of the first bucket that has not been finalized yet.
    finalized_until: Option<TimestampMs>,
    dropped_ticks: u64,
}

/// OHLCV accumulator for a bar that's currently being built.
#[derive(Debug, Clone)]
pub(crate) struct BarInProgress {
    open: Option<f64>,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    tick_count: u64,
}

impl BarInProgress {
    pub(crate) fn new() -> Self {
        Self {
            open: None,
            high: f64::NEG_INFINITY,
            low: f64::INFINITY,
            close: 0.0,
            volume: 0.0,
            tick_count: 0,
        }
    }

    pub(crate) fn add(&mut self, price: f64, size: f64) {
        if self.open.is_none() {
            self.open = Some(price);
        }
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += size;
        self.tick_count += 1;
    }

    pub(crate) fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub(crate) fn to_bar(&self, time: TimestampMs) -> Option<Bar> {
        let open = self.open?;
        Some(Bar::new(time, open, self.high, self.low, self.close, self.volume))
    }
}

impl BarBuilder {
    /// Create a new bar builder with default buffering.
    ///
    /// With the tick period every distinct timestamp gets its own bar.
    pub fn new(period: Period, side: OfferSide) -> Self {
        let defaults = Config::default().ingestion;
        Self {
            period,
            side,
            bars: BTreeMap::new(),
            evicted: Vec::new(),
            max_pending: defaults.max_pending_bars,
            reject_out_of_order: defaults.reject_out_of_order,
            finalized_until: None,
            dropped_ticks: 0,
        }
    }

    /// Create a bar builder from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut builder = Self::new(config.bars.period, config.bars.offer_side);
        builder.max_pending = config.ingestion.max_pending_bars;
        builder.reject_out_of_order = config.ingestion.reject_out_of_order;
        Ok(builder)
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn side(&self) -> OfferSide {
        self.side
    }

    /// Add a tick. Returns `false` if it was dropped as out of order.
    pub fn add_tick<T: TickData + ?Sized>(&mut self, tick: &T) -> bool {
        let start = bucket_start(self.period, tick.time());

        if self.reject_out_of_order && self.finalized_until.is_some_and(|until| start < until) {
            self.dropped_ticks += 1;
            warn!(
                tick_ms = tick.time(),
                period = %self.period,
                "dropping tick for an already finalized bar"
            );
            return false;
        }

        self.bars
            .entry(start)
            .or_insert_with(BarInProgress::new)
            .add(tick.price(self.side), tick.volume(self.side));

        if self.bars.len() > self.max_pending {
            self.evict_oldest();
        }
        true
    }

    /// Add multiple ticks. Returns how many were accepted.
    pub fn add_ticks<T: TickData>(&mut self, ticks: &[T]) -> usize {
        let mut accepted = 0;
        for tick in ticks {
            if self.add_tick(tick) {
                accepted += 1;
            }
        }
        accepted
    }

    fn evict_oldest(&mut self) {
        if let Some((start, bar_in_progress)) = self.bars.pop_first() {
            debug!(bucket_ms = start, period = %self.period, "pending limit reached, closing bar early");
            self.mark_finalized(start);
            if let Some(bar) = bar_in_progress.to_bar(start) {
                self.evicted.push(bar);
            }
        }
    }

    fn mark_finalized(&mut self, start: TimestampMs) {
        let next = bucket_end(self.period, start).saturating_add(1);
        self.finalized_until = Some(self.finalized_until.map_or(next, |until| until.max(next)));
    }

    /// Finalize and return completed bars older than the given timestamp.
    ///
    /// A bar is complete once `current_ts_ms` lies in a later bucket. Returned
    /// bars are sorted by time and removed from the builder.
    pub fn finalize_before(&mut self, current_ts_ms: TimestampMs) -> Vec<Bar> {
        let current_start = bucket_start(self.period, current_ts_ms);
        let still_open = self.bars.split_off(&current_start);
        let done = std::mem::replace(&mut self.bars, still_open);

        let mut completed = std::mem::take(&mut self.evicted);
        if let Some(&last) = done.keys().next_back() {
            self.mark_finalized(last);
        }
        completed.extend(done.iter().filter_map(|(&start, b)| b.to_bar(start)));
        completed.sort_by_key(|b| b.time());

        if !completed.is_empty() {
            debug!(count = completed.len(), period = %self.period, "finalized bars");
        }
        completed
    }

    /// Force finalize the bar for a specific bucket, even if not complete.
    pub fn force_finalize(&mut self, bucket_start_ms: TimestampMs) -> Option<Bar> {
        let bar_in_progress = self.bars.remove(&bucket_start_ms)?;
        self.mark_finalized(bucket_start_ms);
        bar_in_progress.to_bar(bucket_start_ms)
    }

    /// Get the number of bars currently being built.
    pub fn pending_bar_count(&self) -> usize {
        self.bars.len()
    }

    /// Number of ticks dropped because their bar was already finalized.
    pub fn dropped_tick_count(&self) -> u64 {
        self.dropped_ticks
    }

    /// Clear all state.
    pub fn clear(&mut self) {
        self.bars.clear();
        self.evicted.clear();
        self.finalized_until = None;
        self.dropped_ticks = 0;
    }
}

/// Aggregate a whole tick sequence into period bars.
pub fn build_bars<T: TickData>(ticks: &[T], period: Period, side: OfferSide) -> Vec<Bar> {
    let mut builder = BarBuilder::new(period, side);
    builder.reject_out_of_order = false;
    builder.max_pending = usize::MAX;
    builder.add_ticks(ticks);
    builder.finalize_before(TimestampMs::MAX)
}
