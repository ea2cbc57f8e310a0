use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::CandelaError;
use crate::types::{Bar, ForecastRecord, PairId, RawObservation, Timeframe, UpsertReport};

/// Focused role trait for stores that hold raw per-interval price records.
///
/// Observations are read-only from the core's point of view; ingestion writes
/// them out of band. Duplicate timestamps per pair are expected (overlapping
/// source coverage) and are reconciled by the aggregator.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Fetch all raw observations for one pair at one source timeframe.
    async fn raw_observations(
        &self,
        pair: PairId,
        timeframe: Timeframe,
    ) -> Result<Vec<RawObservation>, CandelaError>;
}

/// Focused role trait for stores that hold canonical bars.
///
/// The store enforces a uniqueness constraint on (pair, timestamp) per
/// timeframe table, so upserts are well-defined and idempotent.
#[async_trait]
pub trait BarStore: Send + Sync {
    /// Fetch canonical bars for a pair, ascending by timestamp, optionally
    /// starting at `from`.
    async fn bars(
        &self,
        pair: PairId,
        timeframe: Timeframe,
        from: Option<DateTime<Utc>>,
    ) -> Result<Vec<Bar>, CandelaError>;

    /// Upsert a batch of canonical bars into one timeframe's table.
    ///
    /// Must be atomic and idempotent per (pair, timestamp) key; re-running a
    /// batch after a partial failure is safe.
    async fn upsert_bars(
        &self,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<UpsertReport, CandelaError>;
}

/// Focused role trait for stores that hold forecast records.
#[async_trait]
pub trait ForecastStore: Send + Sync {
    /// Fetch the most recent stored forecast for a (pair, timeframe), if any.
    async fn last_forecast(
        &self,
        pair: PairId,
        timeframe: Timeframe,
    ) -> Result<Option<ForecastRecord>, CandelaError>;

    /// Upsert a batch of forecast records.
    ///
    /// Duplicate (pair, timeframe, timestamp) keys resolve to the latest
    /// write; records are never deleted.
    async fn upsert_forecasts(
        &self,
        records: Vec<ForecastRecord>,
    ) -> Result<UpsertReport, CandelaError>;
}
