//! Periodic accuracy evaluation over historical test windows.
//!
//! Modules include:
//! - `windows`: deterministic, densely overlapping window generation
//! - `evaluate`: per-window retrain/forecast and keep-last merging
//! - `metrics`: MAPE, MAE, and directional accuracy scoring
/// Backtest window generation.
pub mod windows;

/// Per-window evaluation driving [`crate::Forecaster::evaluate`].
pub mod evaluate;

/// Forecast accuracy metrics.
pub mod metrics;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Merge forecasts computed in order, keeping the last-computed value for any
/// duplicate timestamp. Overlapping windows may re-predict the same
/// timestamp; the later computation wins.
#[must_use]
pub fn merge_keep_last<I>(forecasts: I) -> BTreeMap<DateTime<Utc>, f64>
where
    I: IntoIterator<Item = (DateTime<Utc>, f64)>,
{
    let mut merged = BTreeMap::new();
    for (ts, value) in forecasts {
        merged.insert(ts, value);
    }
    merged
}
