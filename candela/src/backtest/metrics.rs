use std::collections::BTreeMap;

use candela_core::{Bar, CandelaError};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Forecast accuracy summary for one forecaster over its backtest range.
///
/// All values are rounded to 2 decimals; `mape` is a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BacktestReport {
    /// Mean absolute percentage error.
    pub mape: f64,
    /// Mean absolute error.
    pub mae: f64,
    /// Fraction of steps whose predicted sign of change matches the actual
    /// sign of change.
    pub direction_accuracy: f64,
}

/// Score merged forecasts against canonical bars.
///
/// Ground truth is the close series sliced to the open interval
/// `(min(forecast_ts) - 1 unit, max(forecast_ts) + 1 unit)`; metrics are
/// computed over the timestamps present on both sides. Directional accuracy
/// compares consecutive matched steps and is 0.0 when fewer than two match.
///
/// # Errors
/// Returns `Data` if there are no forecasts, no overlap with the bars, or a
/// matched ground-truth close is exactly zero (MAPE undefined).
pub fn score(
    bars: &[Bar],
    forecasts: &BTreeMap<DateTime<Utc>, f64>,
    unit: TimeDelta,
) -> Result<BacktestReport, CandelaError> {
    let (Some((&first, _)), Some((&last, _))) =
        (forecasts.first_key_value(), forecasts.last_key_value())
    else {
        return Err(CandelaError::Data("no forecasts to score".to_string()));
    };
    let lo = first - unit;
    let hi = last + unit;

    let truth: BTreeMap<DateTime<Utc>, f64> = bars
        .iter()
        .filter(|b| b.ts > lo && b.ts < hi)
        .map(|b| (b.ts, b.close))
        .collect();

    // (actual, predicted) over the matched timestamps, ascending.
    let matched: Vec<(f64, f64)> = forecasts
        .iter()
        .filter_map(|(ts, pred)| truth.get(ts).map(|actual| (*actual, *pred)))
        .collect();
    if matched.is_empty() {
        return Err(CandelaError::Data(
            "no overlap between forecasts and canonical bars".to_string(),
        ));
    }
    if matched.iter().any(|(actual, _)| *actual == 0.0) {
        return Err(CandelaError::Data(
            "MAPE undefined: ground truth contains a zero close".to_string(),
        ));
    }

    let n = matched.len() as f64;
    let mae = matched.iter().map(|(a, p)| (a - p).abs()).sum::<f64>() / n;
    let mape = matched.iter().map(|(a, p)| ((a - p) / a).abs()).sum::<f64>() / n * 100.0;

    Ok(BacktestReport {
        mape: round2(mape),
        mae: round2(mae),
        direction_accuracy: round2(direction_accuracy(&matched)),
    })
}

fn direction_accuracy(matched: &[(f64, f64)]) -> f64 {
    if matched.len() < 2 {
        return 0.0;
    }
    let hits = matched
        .windows(2)
        .filter(|w| sign(w[1].0 - w[0].0) == sign(w[1].1 - w[0].1))
        .count();
    hits as f64 / (matched.len() - 1) as f64
}

const fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
