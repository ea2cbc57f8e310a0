use candela_core::{Bar, PairId, Timeframe, resample_to};
use chrono::{DateTime, Utc};
use proptest::prelude::*;

fn t(sec: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(sec, 0).unwrap()
}

fn bar(ts: i64, open: f64, close: f64, volume: f64) -> Bar {
    Bar {
        pair: PairId(7),
        ts: t(ts),
        open,
        high: open.max(close),
        low: open.min(close),
        close,
        volume_quote: volume,
    }
}

#[test]
fn hourly_bars_roll_up_to_daily_first_last_rules() {
    // Two bars on day 0, one on day 2; day 1 is a gap.
    let out = resample_to(
        vec![
            bar(3_600, 100.0, 101.0, 10.0),
            bar(82_800, 101.0, 99.0, 5.0),
            bar(2 * 86_400 + 60, 98.0, 98.5, 2.0),
        ],
        Timeframe::Day,
    );

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].ts, t(0));
    assert_eq!(out[0].open, 100.0); // first by time
    assert_eq!(out[0].close, 99.0); // last by time
    assert_eq!(out[0].high, 101.0);
    assert_eq!(out[0].low, 99.0);
    assert_eq!(out[0].volume_quote, 15.0);
    // The gap day is dropped, never emitted as a placeholder.
    assert_eq!(out[1].ts, t(2 * 86_400));
    assert_eq!(out[1].volume_quote, 2.0);
}

#[test]
fn unsorted_input_is_bucketed_by_time() {
    let out = resample_to(
        vec![bar(82_800, 101.0, 99.0, 5.0), bar(3_600, 100.0, 101.0, 10.0)],
        Timeframe::Day,
    );

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].open, 100.0);
    assert_eq!(out[0].close, 99.0);
}

#[test]
fn empty_input_yields_empty_output() {
    assert!(resample_to(Vec::new(), Timeframe::Hour).is_empty());
}

fn arb_bar() -> impl Strategy<Value = Bar> {
    (0i64..14 * 86_400, 1_000i64..100_000i64, 1_000i64..100_000i64, 0u64..1_000u64)
        .prop_map(|(ts, o, c, vol)| bar(ts, o as f64 / 100.0, c as f64 / 100.0, vol as f64))
}

proptest! {
    #[test]
    fn resample_is_idempotent(
        bars in proptest::collection::vec(arb_bar(), 0..200),
        timeframe in prop::sample::select(vec![Timeframe::Minute, Timeframe::Hour, Timeframe::Day])
    ) {
        let once = resample_to(bars, timeframe);
        let twice = resample_to(once.clone(), timeframe);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn output_is_aligned_ascending_and_never_empty_bucketed(
        bars in proptest::collection::vec(arb_bar(), 0..200),
        timeframe in prop::sample::select(vec![Timeframe::Hour, Timeframe::Day])
    ) {
        let input_buckets: std::collections::BTreeSet<_> =
            bars.iter().filter_map(|b| timeframe.truncate(b.ts)).collect();
        let out = resample_to(bars, timeframe);

        let mut prev = None;
        for b in &out {
            // Every emitted bar sits on a boundary with at least one source bar.
            prop_assert_eq!(timeframe.truncate(b.ts), Some(b.ts));
            prop_assert!(input_buckets.contains(&b.ts));
            prop_assert!(b.high >= b.open.max(b.close));
            prop_assert!(b.low <= b.open.min(b.close));
            if let Some(p) = prev {
                prop_assert!(b.ts > p);
            }
            prev = Some(b.ts);
        }
        prop_assert_eq!(out.len(), input_buckets.len());
    }
}
