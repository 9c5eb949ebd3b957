//! Core market data value types: ticks, bars and tick-count bars.
//!
//! Each concrete type implements a read-only capability trait ([`TickData`],
//! [`BarData`], [`TickBarData`]) and can be copy-constructed from any other
//! implementor of the same trait.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::ordering::Timestamped;

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// Which side of the book a price or volume is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferSide {
    Ask,
    #[default]
    Bid,
}

/// Read contract shared by every tick representation.
///
/// Ladder slices are ordered best level first and are never empty; the
/// single-price accessors read level 0.
pub trait TickData: Timestamped {
    fn asks(&self) -> &[f64];
    fn bids(&self) -> &[f64];
    fn ask_volumes(&self) -> &[f64];
    fn bid_volumes(&self) -> &[f64];

    /// Whether the source carries full ladders rather than top of book.
    ///
    /// Defaults to "more than one level on either side"; representations that
    /// can hold a one-level ladder override it.
    fn has_depth(&self) -> bool {
        self.asks().len() > 1 || self.bids().len() > 1
    }

    /// Best ask price.
    fn ask(&self) -> f64 {
        self.asks()[0]
    }

    /// Best bid price.
    fn bid(&self) -> f64 {
        self.bids()[0]
    }

    /// Volume at the best ask.
    fn ask_volume(&self) -> f64 {
        self.ask_volumes()[0]
    }

    /// Volume at the best bid.
    fn bid_volume(&self) -> f64 {
        self.bid_volumes()[0]
    }

    /// `ask - bid`.
    #[inline]
    fn spread(&self) -> f64 {
        self.ask() - self.bid()
    }

    #[inline]
    fn mid(&self) -> f64 {
        (self.ask() + self.bid()) / 2.0
    }

    fn price(&self, side: OfferSide) -> f64 {
        match side {
            OfferSide::Ask => self.ask(),
            OfferSide::Bid => self.bid(),
        }
    }

    fn volume(&self, side: OfferSide) -> f64 {
        match side {
            OfferSide::Ask => self.ask_volume(),
            OfferSide::Bid => self.bid_volume(),
        }
    }

    /// Sum of volumes over every ask level.
    fn total_ask_volume(&self) -> f64 {
        self.ask_volumes().iter().sum()
    }

    /// Sum of volumes over every bid level.
    fn total_bid_volume(&self) -> f64 {
        self.bid_volumes().iter().sum()
    }
}

/// Read contract shared by every bar representation.
pub trait BarData: Timestamped {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;
}

/// A bar whose length is set by a tick count rather than a period.
pub trait TickBarData: BarData {
    /// Time of the last constituent tick.
    fn end_time(&self) -> TimestampMs;

    /// Number of constituent ticks.
    fn tick_count(&self) -> u64;

    /// `[time, end_time]`; fails if the bar ends before it starts.
    fn span(&self) -> Result<Interval> {
        Interval::new(self.time(), self.end_time())
    }
}

/// Full depth-of-market ladders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDepth")]
pub struct DepthLadder {
    asks: Vec<f64>,
    bids: Vec<f64>,
    ask_volumes: Vec<f64>,
    bid_volumes: Vec<f64>,
}

#[derive(Deserialize)]
struct RawDepth {
    asks: Vec<f64>,
    bids: Vec<f64>,
    ask_volumes: Vec<f64>,
    bid_volumes: Vec<f64>,
}

impl TryFrom<RawDepth> for DepthLadder {
    type Error = Error;

    fn try_from(raw: RawDepth) -> Result<Self> {
        DepthLadder::new(raw.asks, raw.bids, raw.ask_volumes, raw.bid_volumes)
    }
}

impl DepthLadder {
    /// Build ladders, requiring at least one level per side and one volume per price.
    pub fn new(
        asks: Vec<f64>,
        bids: Vec<f64>,
        ask_volumes: Vec<f64>,
        bid_volumes: Vec<f64>,
    ) -> Result<Self> {
        if asks.is_empty() || bids.is_empty() {
            return Err(Error::invalid_depth("each side needs at least one level"));
        }
        if asks.len() != ask_volumes.len() {
            return Err(Error::invalid_depth(format!(
                "{} ask prices but {} ask volumes",
                asks.len(),
                ask_volumes.len()
            )));
        }
        if bids.len() != bid_volumes.len() {
            return Err(Error::invalid_depth(format!(
                "{} bid prices but {} bid volumes",
                bids.len(),
                bid_volumes.len()
            )));
        }
        Ok(Self {
            asks,
            bids,
            ask_volumes,
            bid_volumes,
        })
    }

    /// Number of levels on the deeper side.
    pub fn depth(&self) -> usize {
        self.asks.len().max(self.bids.len())
    }
}

/// Order book content carried by a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickBook {
    /// Best bid/offer only.
    Top {
        ask: f64,
        bid: f64,
        ask_volume: f64,
        bid_volume: f64,
    },
    /// Full ladders; level 0 is the best price.
    Depth(DepthLadder),
}

/// A single market observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    time: TimestampMs,
    book: TickBook,
}

impl Tick {
    /// Top-of-book tick.
    pub fn new(time: TimestampMs, ask: f64, bid: f64, ask_volume: f64, bid_volume: f64) -> Self {
        Self {
            time,
            book: TickBook::Top {
                ask,
                bid,
                ask_volume,
                bid_volume,
            },
        }
    }

    /// Tick carrying full depth.
    pub fn with_depth(time: TimestampMs, depth: DepthLadder) -> Self {
        Self {
            time,
            book: TickBook::Depth(depth),
        }
    }

    /// Time-only tick with zeroed prices, for searching time-ordered collections.
    pub fn at(time: TimestampMs) -> Self {
        Self::new(time, 0.0, 0.0, 0.0, 0.0)
    }

    /// Copy any tick representation.
    ///
    /// Depth sources keep their ladders, which are validated like
    /// [`DepthLadder::new`]. Top-of-book sources need one level per side.
    pub fn from_data<T: TickData + ?Sized>(other: &T) -> Result<Self> {
        if other.has_depth() {
            let depth = DepthLadder::new(
                other.asks().to_vec(),
                other.bids().to_vec(),
                other.ask_volumes().to_vec(),
                other.bid_volumes().to_vec(),
            )?;
            return Ok(Self::with_depth(other.time(), depth));
        }
        match (
            other.asks().first(),
            other.bids().first(),
            other.ask_volumes().first(),
            other.bid_volumes().first(),
        ) {
            (Some(&ask), Some(&bid), Some(&ask_volume), Some(&bid_volume)) => {
                Ok(Self::new(other.time(), ask, bid, ask_volume, bid_volume))
            }
            _ => Err(Error::invalid_depth("top-of-book source is missing a level")),
        }
    }

    pub fn book(&self) -> &TickBook {
        &self.book
    }
}

impl Timestamped for Tick {
    #[inline]
    fn time(&self) -> TimestampMs {
        self.time
    }
}

impl TickData for Tick {
    fn asks(&self) -> &[f64] {
        match &self.book {
            TickBook::Top { ask, .. } => std::slice::from_ref(ask),
            TickBook::Depth(d) => &d.asks,
        }
    }

    fn bids(&self) -> &[f64] {
        match &self.book {
            TickBook::Top { bid, .. } => std::slice::from_ref(bid),
            TickBook::Depth(d) => &d.bids,
        }
    }

    fn ask_volumes(&self) -> &[f64] {
        match &self.book {
            TickBook::Top { ask_volume, .. } => std::slice::from_ref(ask_volume),
            TickBook::Depth(d) => &d.ask_volumes,
        }
    }

    fn bid_volumes(&self) -> &[f64] {
        match &self.book {
            TickBook::Top { bid_volume, .. } => std::slice::from_ref(bid_volume),
            TickBook::Depth(d) => &d.bid_volumes,
        }
    }

    fn has_depth(&self) -> bool {
        matches!(self.book, TickBook::Depth(_))
    }
}

/// Period-aligned OHLCV aggregate.
///
/// `time` is the bucket start. The caller is responsible for
/// `low <= min(open, close) <= max(open, close) <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    time: TimestampMs,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Bar {
    pub fn new(time: TimestampMs, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Time-only bar with zeroed prices, for searching time-ordered collections.
    pub fn at(time: TimestampMs) -> Self {
        Self::new(time, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Copy any bar representation.
    pub fn from_data<B: BarData + ?Sized>(other: &B) -> Self {
        Self::new(
            other.time(),
            other.open(),
            other.high(),
            other.low(),
            other.close(),
            other.volume(),
        )
    }

    /// Whether the OHLC prices are mutually consistent.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high
    }
}

impl Timestamped for Bar {
    #[inline]
    fn time(&self) -> TimestampMs {
        self.time
    }
}

impl BarData for Bar {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

/// A bar built from a fixed number of ticks, with its own end time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickBar {
    bar: Bar,
    end_time: TimestampMs,
    tick_count: u64,
}

impl TickBar {
    pub fn new(bar: Bar, end_time: TimestampMs, tick_count: u64) -> Self {
        Self {
            bar,
            end_time,
            tick_count,
        }
    }

    /// Copy any tick-bar representation.
    pub fn from_data<B: TickBarData + ?Sized>(other: &B) -> Self {
        Self::new(Bar::from_data(other), other.end_time(), other.tick_count())
    }

    /// The OHLCV part alone.
    pub fn bar(&self) -> &Bar {
        &self.bar
    }
}

impl Timestamped for TickBar {
    #[inline]
    fn time(&self) -> TimestampMs {
        self.bar.time
    }
}

impl BarData for TickBar {
    fn open(&self) -> f64 {
        self.bar.open
    }

    fn high(&self) -> f64 {
        self.bar.high
    }

    fn low(&self) -> f64 {
        self.bar.low
    }

    fn close(&self) -> f64 {
        self.bar.close
    }

    fn volume(&self) -> f64 {
        self.bar.volume
    }
}

impl TickBarData for TickBar {
    fn end_time(&self) -> TimestampMs {
        self.end_time
    }

    fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
