//! Missing-bar detection.

use timebar_core::{bucket_after, bucket_start, Interval, Period, Timestamped};

/// Intervals between consecutive bars where whole buckets are absent.
///
/// Bars are expected in time order; pairs that go backwards are skipped. The
/// tick pseudo-period has no buckets and so never has gaps.
pub fn find_gaps<B: Timestamped>(bars: &[B], period: Period) -> Vec<Interval> {
    if period.is_tick() {
        return Vec::new();
    }

    bars.windows(2)
        .filter_map(|pair| {
            let expected = bucket_after(period, pair[0].time());
            let actual = bucket_start(period, pair[1].time());
            if actual > expected {
                Interval::new(expected, actual - 1).ok()
            } else {
                None
            }
        })
        .collect()
}

/// Number of whole buckets of `period` inside a gap returned by [`find_gaps`].
pub fn missing_bucket_count(gap: &Interval, period: Period) -> i64 {
    match period.interval_millis() {
        0 => 0,
        len => (gap.time_span() + 1) / len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timebar_core::period::{MS_PER_DAY, MS_PER_MINUTE};
    use timebar_core::Bar;

    fn bars_at(times: &[i64]) -> Vec<Bar> {
        times.iter().map(|&t| Bar::new(t, 1.0, 1.0, 1.0, 1.0, 1.0)).collect()
    }

    #[test]
    fn test_contiguous_bars_have_no_gaps() {
        let bars = bars_at(&[0, 60_000, 120_000]);
        assert!(find_gaps(&bars, Period::ONE_MINUTE).is_empty());
    }

    #[test]
    fn test_detects_missing_minutes() {
        let bars = bars_at(&[0, 60_000, 240_000, 300_000, 420_000]);
        let gaps = find_gaps(&bars, Period::ONE_MINUTE);
        assert_eq!(
            gaps,
            vec![
                Interval::new(120_000, 239_999).unwrap(),
                Interval::new(360_000, 419_999).unwrap(),
            ]
        );
        assert_eq!(missing_bucket_count(&gaps[0], Period::ONE_MINUTE), 2);
        assert_eq!(missing_bucket_count(&gaps[1], Period::ONE_MINUTE), 1);
    }

    #[test]
    fn test_weekly_gap_uses_anchor() {
        // Two weekly bars three weeks apart, both starting on Sunday.
        let first = -4 * MS_PER_DAY;
        let bars = bars_at(&[first, first + 21 * MS_PER_DAY]);
        let gaps = find_gaps(&bars, Period::WEEKLY);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].start(), first + 7 * MS_PER_DAY);
        assert_eq!(missing_bucket_count(&gaps[0], Period::WEEKLY), 2);
    }

    #[test]
    fn test_unaligned_bar_times_are_bucketed() {
        let bars = bars_at(&[5_000, 3 * MS_PER_MINUTE + 17]);
        let gaps = find_gaps(&bars, Period::ONE_MINUTE);
        assert_eq!(gaps, vec![Interval::new(60_000, 179_999).unwrap()]);
    }

    #[test]
    fn test_backwards_and_tick_inputs() {
        let bars = bars_at(&[300_000, 0]);
        assert!(find_gaps(&bars, Period::ONE_MINUTE).is_empty());
        assert!(find_gaps(&bars_at(&[0, 1_000_000]), Period::TICK).is_empty());
        assert_eq!(
            missing_bucket_count(&Interval::new(0, 10).unwrap(), Period::TICK),
            0
        );
    }
}
