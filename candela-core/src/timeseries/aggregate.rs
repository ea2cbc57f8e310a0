use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::types::{Bar, PairId, RawObservation, Timeframe};

/// Outcome of aggregating one pair's raw observations into canonical bars.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedBatch {
    /// Canonical bars, ascending by timestamp, exactly one per non-empty bucket.
    pub bars: Vec<Bar>,
    /// Buckets dropped because an observation carried a non-finite field.
    pub skipped: usize,
}

/// Consolidate raw per-timestamp observations for one pair into one canonical
/// bar per timeframe bucket.
///
/// Buckets are processed independently, no cross-bucket state:
/// - `high` = max of highs, `low` = min of lows, `volume_quote` = sum.
/// - `open`/`close`: volume-weighted mean when the bucket's volume sum is
///   positive, unweighted arithmetic mean when it is zero.
/// - A single-observation bucket yields that observation unchanged.
/// - A bucket containing any malformed (non-finite) observation is dropped
///   and counted in `skipped`; the rest of the batch proceeds.
///
/// Empty buckets cannot arise from grouping and are never emitted.
#[must_use]
pub fn aggregate_observations(
    pair: PairId,
    observations: Vec<RawObservation>,
    timeframe: Timeframe,
) -> AggregatedBatch {
    let mut buckets: BTreeMap<DateTime<Utc>, Vec<RawObservation>> = BTreeMap::new();
    for o in observations {
        let Some(bucket) = timeframe.truncate(o.ts) else {
            continue;
        };
        buckets.entry(bucket).or_default().push(o);
    }

    let mut bars: Vec<Bar> = Vec::with_capacity(buckets.len());
    let mut skipped = 0usize;
    for (ts, group) in buckets {
        match aggregate_bucket(pair, ts, &group) {
            Some(bar) => bars.push(bar),
            None => skipped += 1,
        }
    }

    #[cfg(feature = "tracing")]
    if skipped > 0 {
        tracing::warn!(
            pair = pair.0,
            timeframe = %timeframe,
            skipped,
            "dropped malformed aggregation buckets"
        );
    }

    AggregatedBatch { bars, skipped }
}

fn aggregate_bucket(pair: PairId, ts: DateTime<Utc>, group: &[RawObservation]) -> Option<Bar> {
    if group.is_empty() || group.iter().any(|o| !o.is_finite()) {
        return None;
    }

    // Single-source bucket: the observation is already canonical.
    if let [only] = group {
        return Some(Bar {
            pair,
            ts,
            open: only.open,
            high: only.high,
            low: only.low,
            close: only.close,
            volume_quote: only.volume_quote,
        });
    }

    let volume_quote: f64 = group.iter().map(|o| o.volume_quote).sum();
    let high = group.iter().map(|o| o.high).fold(f64::NEG_INFINITY, f64::max);
    let low = group.iter().map(|o| o.low).fold(f64::INFINITY, f64::min);

    let (open, close) = if volume_quote > 0.0 {
        let open: f64 = group.iter().map(|o| o.open * o.volume_quote).sum::<f64>() / volume_quote;
        let close: f64 =
            group.iter().map(|o| o.close * o.volume_quote).sum::<f64>() / volume_quote;
        (open, close)
    } else {
        // Zero reported volume across the bucket: fall back to the unweighted mean.
        let n = group.len() as f64;
        let open = group.iter().map(|o| o.open).sum::<f64>() / n;
        let close = group.iter().map(|o| o.close).sum::<f64>() / n;
        (open, close)
    };

    Some(Bar {
        pair,
        ts,
        open,
        high,
        low,
        close,
        volume_quote,
    })
}
