//! Coverage of cached time ranges.
//!
//! Tracks which parts of the time axis a data store already holds, so range
//! queries only fetch what is missing.

use serde::{Deserialize, Serialize};
use timebar_core::{Interval, TimestampMs};
use tracing::trace;

/// Sorted set of disjoint, non-adjacent cached intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageMap {
    ranges: Vec<Interval>,
}

impl CoverageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `interval` as covered, merging with overlapping or adjacent ranges.
    pub fn insert(&mut self, interval: Interval) {
        let touches = |r: &Interval| {
            r.start() <= interval.end().saturating_add(1)
                && interval.start() <= r.end().saturating_add(1)
        };

        let mut start = interval.start();
        let mut end = interval.end();
        for r in self.ranges.iter().filter(|r| touches(*r)) {
            start = start.min(r.start());
            end = end.max(r.end());
        }
        self.ranges.retain(|r| !touches(r));

        let merged = Interval::new(start, end).unwrap_or(interval);
        let at = self.ranges.partition_point(|r| r.start() < merged.start());
        self.ranges.insert(at, merged);
        trace!(%merged, ranges = self.ranges.len(), "coverage extended");
    }

    /// Forget everything inside `interval`.
    pub fn remove(&mut self, interval: &Interval) {
        self.ranges = self
            .ranges
            .iter()
            .flat_map(|r| r.difference(interval))
            .collect();
    }

    /// Sub-intervals of `requested` not yet covered, in ascending order.
    pub fn missing(&self, requested: &Interval) -> Vec<Interval> {
        let mut pieces = vec![*requested];
        for cached in self.ranges.iter().filter(|r| r.overlaps(requested)) {
            pieces = pieces.iter().flat_map(|p| p.difference(cached)).collect();
            if pieces.is_empty() {
                break;
            }
        }
        pieces
    }

    /// Whether every instant of `requested` is covered.
    pub fn covers(&self, requested: &Interval) -> bool {
        self.ranges.iter().any(|r| r.contains(requested))
    }

    pub fn covers_time(&self, ts_ms: TimestampMs) -> bool {
        self.ranges.iter().any(|r| r.contains_time(ts_ms))
    }

    pub fn ranges(&self) -> &[Interval] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}
