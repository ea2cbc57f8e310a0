//! Data model shared by the aggregation engines, the stores, and the
//! forecasting orchestrator.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one trading pair (e.g. BTC/EUR) as assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PairId(pub i64);

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bucket granularity of a bar series.
///
/// Variants are ordered fine to coarse, so `Timeframe::Minute < Timeframe::Day`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// One-minute buckets.
    Minute,
    /// One-hour buckets.
    Hour,
    /// One-day (UTC calendar) buckets.
    Day,
}

impl Timeframe {
    /// Length of one bucket in seconds.
    #[must_use]
    pub const fn step_seconds(self) -> i64 {
        match self {
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
        }
    }

    /// One frequency unit as a `TimeDelta`, the step between consecutive bars.
    #[must_use]
    pub fn unit(self) -> TimeDelta {
        TimeDelta::seconds(self.step_seconds())
    }

    /// Floor `ts` to this timeframe's UTC bucket boundary.
    #[must_use]
    pub const fn truncate(self, ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let step = self.step_seconds();
        let bucket = ts.timestamp() - ts.timestamp().rem_euclid(step);
        DateTime::from_timestamp(bucket, 0)
    }

    /// Default backtest window length in steps: 7 daily, 24 hourly, 60 minutely.
    #[must_use]
    pub const fn default_test_window(self) -> usize {
        match self {
            Self::Minute => 60,
            Self::Hour => 24,
            Self::Day => 7,
        }
    }

    /// Stable lowercase tag used in store keys and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw per-interval price record as delivered by an extraction source.
///
/// Immutable once ingested. Several observations may share the same timestamp
/// for one pair when source coverage overlaps; the aggregator reconciles them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Pair the observation belongs to.
    pub pair: PairId,
    /// Interval start, UTC.
    pub ts: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest traded price.
    pub high: f64,
    /// Lowest traded price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume in the quote currency.
    pub volume_quote: f64,
}

impl RawObservation {
    /// Whether every numeric field is finite. A non-finite field marks the
    /// observation malformed and poisons its whole bucket.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume_quote.is_finite()
    }
}

/// The single authoritative OHLCV bar per (pair, timestamp) within one
/// timeframe's table. `ts` is aligned to the timeframe boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Pair the bar belongs to.
    pub pair: PairId,
    /// Bucket start, UTC, aligned to the timeframe boundary.
    pub ts: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume in the quote currency.
    pub volume_quote: f64,
}

/// One stored single-step forecast, unique per (pair, timeframe, timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Pair the forecast belongs to.
    pub pair: PairId,
    /// Timeframe of the forecast series.
    pub timeframe: Timeframe,
    /// Timestamp being predicted.
    pub ts: DateTime<Utc>,
    /// Predicted close.
    pub predicted: f64,
}

/// One backtest interval spanning exactly `window_size` steps at the target
/// frequency; both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestWindow {
    /// First predicted timestamp.
    pub start: DateTime<Utc>,
    /// Last predicted timestamp.
    pub end: DateTime<Utc>,
}

/// One record rejected by a store upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertFailure {
    /// Timestamp of the rejected record.
    pub ts: DateTime<Utc>,
    /// Store-provided rejection reason.
    pub reason: String,
}

/// Outcome of an upsert batch: how many records landed and which were rejected.
///
/// Upserts are idempotent on their unique key, so a rejected record never
/// corrupts what is already persisted and the batch can be retried whole.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpsertReport {
    /// Number of records accepted by the store.
    pub succeeded: usize,
    /// Records the store rejected, with reasons.
    pub failed: Vec<UpsertFailure>,
}

impl UpsertReport {
    /// Whether every record in the batch was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
