use candela_core::{BarStore, ForecastRecord, ForecastStore, PairId, Timeframe};
use candela_mock::{MemoryStore, fixtures};
use chrono::{DateTime, Utc};

const PAIR: PairId = PairId(1);

fn hour(n: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(n * 3_600, 0).unwrap()
}

#[tokio::test]
async fn bar_upserts_are_idempotent_and_keep_latest() {
    let store = MemoryStore::new();
    let batch = fixtures::bars(PAIR, Timeframe::Hour, hour(0), 4, 100.0);

    let first = store.upsert_bars(Timeframe::Hour, batch.clone()).await.unwrap();
    assert_eq!(first.succeeded, 4);
    let second = store.upsert_bars(Timeframe::Hour, batch).await.unwrap();
    assert_eq!(second.succeeded, 4);
    assert_eq!(store.stored_bars(PAIR, Timeframe::Hour).len(), 4);

    // A re-upsert of an existing timestamp replaces the stored bar.
    let mut revised = fixtures::bars(PAIR, Timeframe::Hour, hour(2), 1, 100.0);
    revised[0].close = 999.0;
    store.upsert_bars(Timeframe::Hour, revised).await.unwrap();
    let bars = store.stored_bars(PAIR, Timeframe::Hour);
    assert_eq!(bars.len(), 4);
    assert_eq!(bars[2].close, 999.0);
}

#[tokio::test]
async fn bars_honor_the_from_bound_and_pair_isolation() {
    let store = MemoryStore::new();
    store.seed_bars(
        Timeframe::Hour,
        fixtures::bars(PAIR, Timeframe::Hour, hour(0), 6, 100.0),
    );
    store.seed_bars(
        Timeframe::Hour,
        fixtures::bars(PairId(2), Timeframe::Hour, hour(0), 6, 200.0),
    );

    let all = store.bars(PAIR, Timeframe::Hour, None).await.unwrap();
    assert_eq!(all.len(), 6);
    assert!(all.iter().all(|b| b.pair == PAIR));

    let tail = store.bars(PAIR, Timeframe::Hour, Some(hour(4))).await.unwrap();
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].ts, hour(4));
}

#[tokio::test]
async fn last_forecast_is_the_maximum_timestamp() {
    let store = MemoryStore::new();
    assert!(store
        .last_forecast(PAIR, Timeframe::Day)
        .await
        .unwrap()
        .is_none());

    // Insert out of order; the max wins regardless.
    for n in [3, 1, 2] {
        store
            .upsert_forecasts(vec![ForecastRecord {
                pair: PAIR,
                timeframe: Timeframe::Day,
                ts: hour(n * 24),
                predicted: 100.0 + n as f64,
            }])
            .await
            .unwrap();
    }
    let last = store.last_forecast(PAIR, Timeframe::Day).await.unwrap().unwrap();
    assert_eq!(last.ts, hour(72));

    // Timeframes are isolated series.
    assert!(store
        .last_forecast(PAIR, Timeframe::Hour)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn exhausted_forecast_budget_rejects_new_timestamps_only() {
    let store = MemoryStore::new();
    store.limit_forecast_upserts(1);

    let record = ForecastRecord {
        pair: PAIR,
        timeframe: Timeframe::Hour,
        ts: hour(1),
        predicted: 10.0,
    };
    let first = store.upsert_forecasts(vec![record]).await.unwrap();
    assert!(first.is_clean());

    // Overwriting the accepted timestamp is still allowed.
    let overwrite = store
        .upsert_forecasts(vec![ForecastRecord {
            predicted: 11.0,
            ..record
        }])
        .await
        .unwrap();
    assert!(overwrite.is_clean());

    let rejected = store
        .upsert_forecasts(vec![ForecastRecord {
            ts: hour(2),
            ..record
        }])
        .await
        .unwrap();
    assert_eq!(rejected.succeeded, 0);
    assert_eq!(rejected.failed.len(), 1);
    assert_eq!(rejected.failed[0].ts, hour(2));

    let stored = store.forecasts(PAIR, Timeframe::Hour);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].predicted, 11.0);
}
