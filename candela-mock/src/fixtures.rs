//! Deterministic series builders for tests and examples.

use candela_core::{Bar, PairId, RawObservation, Timeframe};
use chrono::{DateTime, Utc};

/// A small deterministic price wobble around `base`, strictly positive for
/// any reasonable base so MAPE stays defined.
fn wobble(base: f64, i: usize) -> f64 {
    base + ((i.wrapping_mul(37)) % 11) as f64 - 5.0
}

/// Build `n` canonical bars starting at `start`, one per `timeframe` unit,
/// with a deterministic close series around `base`.
#[must_use]
pub fn bars(
    pair: PairId,
    timeframe: Timeframe,
    start: DateTime<Utc>,
    n: usize,
    base: f64,
) -> Vec<Bar> {
    let unit = timeframe.unit();
    (0..n)
        .map(|i| {
            let close = wobble(base, i);
            let open = wobble(base, i.wrapping_sub(1));
            Bar {
                pair,
                ts: start + unit * i as i32,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume_quote: 100.0 + i as f64,
            }
        })
        .collect()
}

/// Build raw observations covering `n` buckets, with every third bucket
/// duplicated at a different volume to mimic overlapping source coverage.
#[must_use]
pub fn overlapping_observations(
    pair: PairId,
    timeframe: Timeframe,
    start: DateTime<Utc>,
    n: usize,
    base: f64,
) -> Vec<RawObservation> {
    let unit = timeframe.unit();
    let mut out = Vec::with_capacity(n + n / 3);
    for i in 0..n {
        let ts = start + unit * i as i32;
        let close = wobble(base, i);
        let open = wobble(base, i.wrapping_sub(1));
        out.push(RawObservation {
            pair,
            ts,
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume_quote: 50.0,
        });
        if i % 3 == 0 {
            out.push(RawObservation {
                pair,
                ts,
                open: open + 2.0,
                high: open.max(close) + 3.0,
                low: open.min(close) - 1.0,
                close: close + 2.0,
                volume_quote: 25.0,
            });
        }
    }
    out
}
