//! Closed time intervals and their set algebra.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::TimestampMs;

/// A closed range of millisecond timestamps `[start, end]`.
///
/// `start <= end` always holds. Touching edges count as both overlap and
/// containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: TimestampMs,
    end: TimestampMs,
}

#[derive(Deserialize)]
struct RawInterval {
    start: TimestampMs,
    end: TimestampMs,
}

impl TryFrom<RawInterval> for Interval {
    type Error = Error;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Create an interval, rejecting reversed bounds.
    pub fn new(start: TimestampMs, end: TimestampMs) -> Result<Self> {
        if start > end {
            return Err(Error::invalid_interval(start, end));
        }
        Ok(Self { start, end })
    }

    /// Single-instant interval `[ts, ts]`.
    pub fn instant(ts_ms: TimestampMs) -> Self {
        Self {
            start: ts_ms,
            end: ts_ms,
        }
    }

    /// Bounds already known to be ordered.
    pub(crate) fn spanning(start: TimestampMs, end: TimestampMs) -> Self {
        debug_assert!(start <= end, "reversed interval [{start}, {end}]");
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> TimestampMs {
        self.start
    }

    #[inline]
    pub fn end(&self) -> TimestampMs {
        self.end
    }

    /// `end - start`.
    #[inline]
    pub fn time_span(&self) -> i64 {
        self.end - self.start
    }

    #[inline]
    pub fn contains_time(&self, ts_ms: TimestampMs) -> bool {
        self.start <= ts_ms && ts_ms <= self.end
    }

    /// Whether `other` lies entirely within this interval.
    #[inline]
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two intervals share at least one instant.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        other.start <= self.end && other.end >= self.start
    }

    /// The instants common to both intervals.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self::spanning(
            self.start.max(other.start),
            self.end.min(other.end),
        ))
    }

    /// Parts of this interval not covered by `other`, in ascending order.
    ///
    /// Yields at most two intervals. A disjoint `other` removes nothing, so the
    /// result is `[self]` rather than empty; together with
    /// [`intersection`](Self::intersection) the pieces always rebuild `self`.
    pub fn difference(&self, other: &Interval) -> Vec<Interval> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        if other.contains(self) {
            return Vec::new();
        }

        let head = (self.start < other.start).then(|| Self::spanning(self.start, other.start - 1));
        let tail = (other.end < self.end).then(|| Self::spanning(other.end + 1, self.end));
        head.into_iter().chain(tail).collect()
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
