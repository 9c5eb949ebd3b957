//! Time ordering over time-stamped entities.
//!
//! Entities are ordered solely by their timestamp. Two entities with the same
//! timestamp are order-equivalent even if they differ structurally, so a
//! stable sort keeps their arrival order.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::types::TimestampMs;

/// Anything carrying a millisecond timestamp.
pub trait Timestamped {
    /// Timestamp in milliseconds since the Unix epoch (UTC).
    fn time(&self) -> TimestampMs;

    /// The timestamp as a UTC date-time, `None` if out of chrono's range.
    fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time())
    }
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    #[inline]
    fn time(&self) -> TimestampMs {
        (**self).time()
    }
}

impl<T: Timestamped + ?Sized> Timestamped for Box<T> {
    #[inline]
    fn time(&self) -> TimestampMs {
        (**self).time()
    }
}

/// Comparator keyed by timestamp, usable with `sort_by`, `binary_search_by`, etc.
#[inline]
pub fn by_time<A, B>(a: &A, b: &B) -> Ordering
where
    A: Timestamped + ?Sized,
    B: Timestamped + ?Sized,
{
    a.time().cmp(&b.time())
}

/// Like [`by_time`], but rejects a missing operand instead of ordering it.
pub fn compare_present<A, B>(a: Option<&A>, b: Option<&B>) -> Result<Ordering>
where
    A: Timestamped + ?Sized,
    B: Timestamped + ?Sized,
{
    match (a, b) {
        (Some(a), Some(b)) => Ok(by_time(a, b)),
        (None, _) => Err(Error::MissingEntity("left")),
        (_, None) => Err(Error::MissingEntity("right")),
    }
}

/// Stable in-place sort by timestamp.
pub fn sort_by_time<T: Timestamped>(items: &mut [T]) {
    items.sort_by(|a, b| by_time(a, b));
}

/// Whether `items` is in non-decreasing time order.
pub fn is_time_sorted<T: Timestamped>(items: &[T]) -> bool {
    items.windows(2).all(|w| w[0].time() <= w[1].time())
}

/// Wrapper giving any [`Timestamped`] value a total order by time, for use as a
/// key in ordered collections.
///
/// Equality is time equality: a `BTreeSet<TimeOrdered<_>>` keeps one entry per
/// timestamp.
#[derive(Debug, Clone, Copy)]
pub struct TimeOrdered<T>(pub T);

impl<T> TimeOrdered<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Timestamped> PartialEq for TimeOrdered<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.time() == other.0.time()
    }
}

impl<T: Timestamped> Eq for TimeOrdered<T> {}

impl<T: Timestamped> PartialOrd for TimeOrdered<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Timestamped> Ord for TimeOrdered<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        by_time(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bar, BarData, Tick};
    use std::collections::BTreeSet;

    #[test]
    fn test_sort_ticks_by_time() {
        let mut ticks = vec![
            Tick::new(300, 1.3, 1.2, 1.0, 1.0),
            Tick::new(100, 1.1, 1.0, 1.0, 1.0),
            Tick::new(200, 1.2, 1.1, 1.0, 1.0),
        ];
        sort_by_time(&mut ticks);
        let times: Vec<_> = ticks.iter().map(|t| t.time()).collect();
        assert_eq!(times, vec![100, 200, 300]);
        assert!(is_time_sorted(&ticks));
    }

    #[test]
    fn test_equal_times_are_equivalent() {
        let a = Bar::new(1_000, 1.0, 2.0, 0.5, 1.5, 10.0);
        let b = Bar::new(1_000, 9.0, 9.0, 9.0, 9.0, 99.0);
        assert_ne!(a, b);
        assert_eq!(by_time(&a, &b), Ordering::Equal);
        assert_eq!(TimeOrdered(a), TimeOrdered(b));
    }

    #[test]
    fn test_stable_sort_keeps_arrival_order_on_ties() {
        let mut bars = vec![
            Bar::new(2, 1.0, 1.0, 1.0, 1.0, 1.0),
            Bar::new(1, 2.0, 2.0, 2.0, 2.0, 2.0),
            Bar::new(1, 3.0, 3.0, 3.0, 3.0, 3.0),
        ];
        sort_by_time(&mut bars);
        let opens: Vec<_> = bars.iter().map(|b| b.open()).collect();
        assert_eq!(opens, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_compares_across_entity_kinds() {
        let tick = Tick::at(500);
        let bar = Bar::at(400);
        assert_eq!(by_time(&tick, &bar), Ordering::Greater);
        assert_eq!(by_time(&bar, &tick), Ordering::Less);
    }

    #[test]
    fn test_compare_present_rejects_missing() {
        let tick = Tick::at(1);
        assert_eq!(
            compare_present(Some(&tick), Some(&Tick::at(2))).unwrap(),
            Ordering::Less
        );
        assert!(matches!(
            compare_present::<Tick, Tick>(None, Some(&tick)),
            Err(Error::MissingEntity("left"))
        ));
        assert!(matches!(
            compare_present::<Tick, Tick>(Some(&tick), None),
            Err(Error::MissingEntity("right"))
        ));
    }

    #[test]
    fn test_time_ordered_set() {
        let set: BTreeSet<_> = [300, 100, 200, 100]
            .into_iter()
            .map(|t| TimeOrdered(Tick::at(t)))
            .collect();
        let times: Vec<_> = set.iter().map(|t| t.0.time()).collect();
        assert_eq!(times, vec![100, 200, 300]);
    }

    #[test]
    fn test_datetime() {
        let tick = Tick::at(1_704_067_200_000);
        assert_eq!(
            tick.datetime().unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
    }
}
