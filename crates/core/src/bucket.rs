//! Period-aligned time bucketing.
//!
//! Every non-tick period partitions the time axis into consecutive buckets of
//! `interval_millis` length. Buckets are aligned to the Unix epoch, except
//! weekly buckets which are aligned to [`WEEK_ANCHOR`]. The tick pseudo-period
//! maps every timestamp onto itself.
//!
//! Every `i64` timestamp is accepted. Bounds that would fall outside the
//! `i64` range saturate, so in the first and last representable buckets
//! `end + 1 == next_start` does not hold.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::period::{Period, MS_PER_DAY};
use crate::types::TimestampMs;

/// Weekday on which weekly buckets start (00:00 UTC).
pub const WEEK_ANCHOR: Weekday = Weekday::Sun;

/// Distance from the epoch weekday (Thursday) forward to [`WEEK_ANCHOR`].
pub const WEEK_ANCHOR_OFFSET_MS: i64 = 3 * MS_PER_DAY;

/// The bucket a timestamp falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// First millisecond of the bucket.
    pub start: TimestampMs,
    /// Last millisecond of the bucket (inclusive).
    pub end: TimestampMs,
    /// First millisecond of the following bucket.
    pub next_start: TimestampMs,
}

impl Bucket {
    /// The bucket as a closed interval.
    pub fn interval(&self) -> Interval {
        Interval::spanning(self.start, self.end)
    }

    #[inline]
    pub fn contains(&self, ts_ms: TimestampMs) -> bool {
        self.start <= ts_ms && ts_ms <= self.end
    }
}

/// Start of the bucket containing `ts_ms`.
#[inline]
pub fn bucket_start(period: Period, ts_ms: TimestampMs) -> TimestampMs {
    if period.is_tick() {
        return ts_ms;
    }
    let offset = if period.is_weekly() { WEEK_ANCHOR_OFFSET_MS } else { 0 };
    floor_to(ts_ms, period.interval_millis(), offset)
}

/// Last millisecond of the bucket containing `ts_ms`.
#[inline]
pub fn bucket_end(period: Period, ts_ms: TimestampMs) -> TimestampMs {
    if period.is_tick() {
        return ts_ms;
    }
    bucket_start(period, ts_ms).saturating_add(period.interval_millis() - 1)
}

/// Start of the bucket following the one containing `ts_ms`.
#[inline]
pub fn bucket_after(period: Period, ts_ms: TimestampMs) -> TimestampMs {
    if period.is_tick() {
        return ts_ms;
    }
    bucket_start(period, ts_ms).saturating_add(period.interval_millis())
}

/// Floor `ts_ms` onto the grid `offset + k * interval`, widened to avoid
/// overflow near the ends of the range.
fn floor_to(ts_ms: TimestampMs, interval: i64, offset: i64) -> TimestampMs {
    let (ts, interval, offset) = (i128::from(ts_ms), i128::from(interval), i128::from(offset));
    let start = (ts - offset).div_euclid(interval) * interval + offset;
    TimestampMs::try_from(start).unwrap_or(TimestampMs::MIN)
}

/// Start, end and next start of the bucket containing `ts_ms`.
pub fn bucket(period: Period, ts_ms: TimestampMs) -> Bucket {
    if period.is_tick() {
        return Bucket {
            start: ts_ms,
            end: ts_ms,
            next_start: ts_ms,
        };
    }
    Bucket {
        start: bucket_start(period, ts_ms),
        end: bucket_end(period, ts_ms),
        next_start: bucket_after(period, ts_ms),
    }
}

/// The bucket containing `ts_ms` as a closed interval.
pub fn bucket_interval(period: Period, ts_ms: TimestampMs) -> Interval {
    bucket(period, ts_ms).interval()
}
