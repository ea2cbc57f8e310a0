use candela_core::{PairId, RawObservation, Timeframe, aggregate_observations};
use chrono::{DateTime, Utc};
use proptest::prelude::*;

fn t(sec: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(sec, 0).unwrap()
}

fn obs(ts: i64, open: f64, close: f64, volume: f64) -> RawObservation {
    RawObservation {
        pair: PairId(1),
        ts: t(ts),
        open,
        high: open.max(close) + 1.0,
        low: open.min(close) - 1.0,
        close,
        volume_quote: volume,
    }
}

#[test]
fn weighted_bucket_scenario() {
    // Three overlapping observations in one hourly bucket.
    let batch = aggregate_observations(
        PairId(1),
        vec![
            obs(3_600, 100.0, 105.0, 10.0),
            obs(3_600, 102.0, 103.0, 0.0),
            obs(3_600, 101.0, 107.0, 20.0),
        ],
        Timeframe::Hour,
    );

    assert_eq!(batch.skipped, 0);
    assert_eq!(batch.bars.len(), 1);
    let bar = batch.bars[0];
    assert_eq!(bar.ts, t(3_600));
    assert_eq!(bar.volume_quote, 30.0);
    assert!((bar.open - 3_020.0 / 30.0).abs() < 1e-9, "open = {}", bar.open);
    assert!((bar.close - 3_190.0 / 30.0).abs() < 1e-9, "close = {}", bar.close);
    assert_eq!(bar.high, 108.0);
    assert_eq!(bar.low, 99.0);
}

#[test]
fn zero_volume_bucket_falls_back_to_unweighted_mean() {
    let batch = aggregate_observations(
        PairId(1),
        vec![obs(0, 100.0, 104.0, 0.0), obs(0, 102.0, 106.0, 0.0)],
        Timeframe::Hour,
    );

    let bar = batch.bars[0];
    assert_eq!(bar.open, 101.0);
    assert_eq!(bar.close, 105.0);
    assert_eq!(bar.volume_quote, 0.0);
}

#[test]
fn single_observation_bucket_is_returned_unchanged() {
    let only = obs(7_200, 99.5, 101.25, 3.75);
    let batch = aggregate_observations(PairId(1), vec![only], Timeframe::Hour);

    assert_eq!(batch.bars.len(), 1);
    let bar = batch.bars[0];
    assert_eq!(bar.open, only.open);
    assert_eq!(bar.high, only.high);
    assert_eq!(bar.low, only.low);
    assert_eq!(bar.close, only.close);
    assert_eq!(bar.volume_quote, only.volume_quote);
}

#[test]
fn malformed_bucket_is_skipped_without_aborting_the_batch() {
    let mut bad = obs(0, 100.0, 101.0, 5.0);
    bad.close = f64::NAN;

    let batch = aggregate_observations(
        PairId(1),
        vec![bad, obs(0, 100.0, 102.0, 5.0), obs(3_600, 103.0, 104.0, 5.0)],
        Timeframe::Hour,
    );

    // The poisoned 00:00 bucket is dropped whole; the 01:00 bucket survives.
    assert_eq!(batch.skipped, 1);
    assert_eq!(batch.bars.len(), 1);
    assert_eq!(batch.bars[0].ts, t(3_600));
}

#[test]
fn empty_input_yields_no_bars() {
    let batch = aggregate_observations(PairId(1), vec![], Timeframe::Day);
    assert!(batch.bars.is_empty());
    assert_eq!(batch.skipped, 0);
}

#[test]
fn observations_are_bucketed_by_timeframe_truncation() {
    // 00:10 and 00:40 share the hourly bucket; 01:05 starts a new one.
    let batch = aggregate_observations(
        PairId(1),
        vec![
            obs(600, 100.0, 101.0, 1.0),
            obs(2_400, 101.0, 102.0, 1.0),
            obs(3_900, 102.0, 103.0, 1.0),
        ],
        Timeframe::Hour,
    );

    let stamps: Vec<_> = batch.bars.iter().map(|b| b.ts).collect();
    assert_eq!(stamps, vec![t(0), t(3_600)]);
}

fn arb_observation() -> impl Strategy<Value = RawObservation> {
    (
        0i64..7 * 86_400,
        1_000i64..100_000i64,
        1_000i64..100_000i64,
        0u64..1_000u64,
    )
        .prop_map(|(ts, o, c, vol)| obs(ts, o as f64 / 100.0, c as f64 / 100.0, vol as f64))
}

proptest! {
    #[test]
    fn aggregated_bars_keep_the_ohlc_envelope(
        observations in proptest::collection::vec(arb_observation(), 1..120)
    ) {
        let total: f64 = observations.iter().map(|o| o.volume_quote).sum();
        let batch = aggregate_observations(PairId(1), observations, Timeframe::Hour);

        prop_assert_eq!(batch.skipped, 0);
        let summed: f64 = batch.bars.iter().map(|b| b.volume_quote).sum();
        prop_assert!((summed - total).abs() < 1e-6);

        let mut prev = None;
        for bar in &batch.bars {
            prop_assert!(bar.high >= bar.open.max(bar.close) - 1e-9);
            prop_assert!(bar.low <= bar.open.min(bar.close) + 1e-9);
            prop_assert_eq!(Timeframe::Hour.truncate(bar.ts), Some(bar.ts));
            if let Some(p) = prev {
                prop_assert!(bar.ts > p);
            }
            prev = Some(bar.ts);
        }
    }
}
