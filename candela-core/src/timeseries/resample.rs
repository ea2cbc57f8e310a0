use chrono::{DateTime, Utc};

use crate::types::{Bar, Timeframe};

/// Generic resampler that groups sorted bars by a bucket function and
/// aggregates OHLCV within each bucket.
///
/// This path consumes already-canonical, non-overlapping bars, so first/last
/// is the faithful open/close definition (unlike the weighted-mean rule in
/// `aggregate`, which reconciles overlapping raw sources).
fn resample_by<F>(mut bars: Vec<Bar>, bucket_of: F) -> Vec<Bar>
where
    F: Fn(DateTime<Utc>) -> Option<DateTime<Utc>>,
{
    if bars.is_empty() {
        return bars;
    }

    bars.sort_by_key(|b| b.ts);

    let mut out: Vec<Bar> = Vec::new();

    let mut iter = bars.into_iter();
    let Some(first) = iter.find(|b| bucket_of(b.ts).is_some()) else {
        return Vec::new();
    };
    let Some(mut cur_bucket) = bucket_of(first.ts) else {
        return Vec::new();
    };
    let pair = first.pair;
    let mut open = first.open;
    let mut high = first.high;
    let mut low = first.low;
    let mut close = first.close;
    let mut vol_sum = first.volume_quote;

    for b in iter {
        let Some(bucket) = bucket_of(b.ts) else {
            continue;
        };
        if bucket == cur_bucket {
            if b.high > high {
                high = b.high;
            }
            if b.low < low {
                low = b.low;
            }
            close = b.close;
            vol_sum += b.volume_quote;
        } else {
            out.push(Bar {
                pair,
                ts: cur_bucket,
                open,
                high,
                low,
                close,
                volume_quote: vol_sum,
            });
            cur_bucket = bucket;
            open = b.open;
            high = b.high;
            low = b.low;
            close = b.close;
            vol_sum = b.volume_quote;
        }
    }

    out.push(Bar {
        pair,
        ts: cur_bucket,
        open,
        high,
        low,
        close,
        volume_quote: vol_sum,
    });

    out
}

/// Resample finer canonical bars for one pair into `target`-timeframe bars.
///
/// - Buckets by UTC calendar truncation to the target boundary.
/// - `open` = first observation's open by time, `close` = last observation's
///   close by time, `high` = max, `low` = min, `volume_quote` = sum.
/// - Buckets with no underlying observations (gaps) are dropped entirely,
///   never emitted as placeholder bars.
/// - Output is ordered ascending by timestamp, one bar per non-empty bucket.
#[must_use]
pub fn resample_to(bars: Vec<Bar>, target: Timeframe) -> Vec<Bar> {
    resample_by(bars, move |ts| target.truncate(ts))
}
