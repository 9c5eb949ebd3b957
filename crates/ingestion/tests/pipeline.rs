//! Tick → bar → coverage flow across crate boundaries.

use chrono::{DateTime, Datelike, Utc, Weekday};
use timebar_core::{
    bucket, bucket_interval, ordering, period, BarData, Config, Interval, OfferSide, Period, Tick,
    TickBarData, Timestamped,
};
use timebar_ingestion::{build_bars, find_gaps, BarBuilder, CoverageMap, TickBarBuilder};

const HOUR: i64 = period::MS_PER_HOUR;
const T0: i64 = 1_704_067_200_000; // 2024-01-01 00:00:00 UTC (Monday)

fn tick(ts_ms: i64, bid: f64) -> Tick {
    Tick::new(ts_ms, bid + 0.0002, bid, 1.5, 1.0)
}

fn scrambled_ticks() -> Vec<Tick> {
    // Hours 0, 1 and 3 traded; hour 2 is empty.
    vec![
        tick(T0 + 3 * HOUR + 10, 1.1040),
        tick(T0 + 5, 1.1000),
        tick(T0 + HOUR + 1, 1.1020),
        tick(T0 + HOUR / 2, 1.1010),
        tick(T0 + 2 * HOUR - 1, 1.1015),
        tick(T0 + HOUR - 1, 1.0990),
    ]
}

#[test]
fn sorted_ticks_build_hourly_bars_with_a_gap() {
    let mut ticks = scrambled_ticks();
    ordering::sort_by_time(&mut ticks);
    assert!(ordering::is_time_sorted(&ticks));

    let bars = build_bars(&ticks, Period::ONE_HOUR, OfferSide::Bid);
    let times: Vec<_> = bars.iter().map(|b| b.time() - T0).collect();
    assert_eq!(times, vec![0, HOUR, 3 * HOUR]);

    let first = &bars[0];
    assert_eq!(first.open(), 1.1000);
    assert_eq!(first.close(), 1.0990);
    assert_eq!(first.high(), 1.1010);
    assert_eq!(first.low(), 1.0990);
    assert_eq!(first.volume(), 3.0);

    let gaps = find_gaps(&bars, Period::ONE_HOUR);
    assert_eq!(gaps, vec![bucket_interval(Period::ONE_HOUR, T0 + 2 * HOUR)]);
}

#[test]
fn streaming_builder_matches_batch_result() {
    let mut ticks = scrambled_ticks();
    ordering::sort_by_time(&mut ticks);

    let mut builder = BarBuilder::from_config(&Config::from_json_str(
        r#"{"bars":{"period":"1h","offer_side":"bid"}}"#,
    )
    .unwrap())
    .unwrap();

    let mut streamed = Vec::new();
    for t in &ticks {
        streamed.extend(builder.finalize_before(t.time()));
        assert!(builder.add_tick(t));
    }
    streamed.extend(builder.finalize_before(T0 + 24 * HOUR));

    assert_eq!(streamed, build_bars(&ticks, Period::ONE_HOUR, OfferSide::Bid));
}

#[test]
fn coverage_reports_only_unfetched_buckets() {
    let bars = build_bars(&scrambled_ticks(), Period::ONE_HOUR, OfferSide::Bid);

    let mut coverage = CoverageMap::new();
    for bar in &bars {
        coverage.insert(bucket(Period::ONE_HOUR, bar.time()).interval());
    }
    assert_eq!(coverage.ranges().len(), 2);

    let day = Interval::new(T0, T0 + 24 * HOUR - 1).unwrap();
    let missing = coverage.missing(&day);
    assert_eq!(
        missing,
        vec![
            Interval::new(T0 + 2 * HOUR, T0 + 3 * HOUR - 1).unwrap(),
            Interval::new(T0 + 4 * HOUR, T0 + 24 * HOUR - 1).unwrap(),
        ]
    );

    for gap in &missing {
        coverage.insert(*gap);
    }
    assert!(coverage.covers(&day));
    assert!(coverage.missing(&day).is_empty());
}

#[test]
fn weekly_bars_open_on_sunday() {
    let ticks: Vec<_> = (0..40).map(|d| tick(T0 + d * period::MS_PER_DAY, 1.0)).collect();
    let bars = build_bars(&ticks, Period::WEEKLY, OfferSide::Ask);

    assert_eq!(bars.len(), 6);
    for bar in &bars {
        let opened: DateTime<Utc> = bar.datetime().unwrap();
        assert_eq!(opened.weekday(), Weekday::Sun);
    }
    // Monday 2024-01-01 sits in the week that began Sunday 2023-12-31.
    assert_eq!(bars[0].volume(), 1.5 * 6.0);
}

#[test]
fn tick_bars_cover_their_ticks() {
    let mut ticks = scrambled_ticks();
    ordering::sort_by_time(&mut ticks);

    let mut builder = TickBarBuilder::new(4, OfferSide::Bid);
    let mut bars = builder.add_ticks(&ticks);
    bars.extend(builder.flush());

    assert_eq!(bars.len(), 2);
    let total: u64 = bars.iter().map(|b| b.tick_count()).sum();
    assert_eq!(total, ticks.len() as u64);

    let first_span = bars[0].span().unwrap();
    assert!(ticks[..4].iter().all(|t| first_span.contains_time(t.time())));
}
