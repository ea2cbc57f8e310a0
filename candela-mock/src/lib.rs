//! Deterministic in-memory stores and mock models for CI-safe tests.
//!
//! [`MemoryStore`] implements all three store traits over sorted maps with
//! idempotent keep-latest upserts, matching the uniqueness constraints the
//! core expects from a real store. The mock models cover the fit/predict
//! contract's happy paths ([`LastValueModel`], [`LinearTrendModel`]), forced
//! failures ([`FailingModel`]), and fit-series inspection
//! ([`RecordingModel`]).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use candela_core::{
    Bar, BarStore, CandelaError, ForecastModel, ForecastRecord, ForecastStore, ObservationSource,
    PairId, RawObservation, Timeframe, UpsertFailure, UpsertReport,
};
use chrono::{DateTime, Utc};

pub mod fixtures;

#[derive(Default)]
struct Inner {
    observations: BTreeMap<(PairId, Timeframe), Vec<RawObservation>>,
    bars: BTreeMap<(PairId, Timeframe, DateTime<Utc>), Bar>,
    forecasts: BTreeMap<(PairId, Timeframe, DateTime<Utc>), ForecastRecord>,
    // When set, each forecast upsert beyond this budget is rejected.
    forecast_budget: Option<usize>,
}

/// In-memory store implementing every store trait with idempotent,
/// keep-latest upserts keyed by (pair, timeframe, timestamp).
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed raw observations for their pair at `timeframe`.
    pub fn seed_observations(&self, timeframe: Timeframe, observations: Vec<RawObservation>) {
        let mut inner = self.lock();
        for o in observations {
            inner.observations.entry((o.pair, timeframe)).or_default().push(o);
        }
    }

    /// Seed canonical bars directly, bypassing aggregation.
    pub fn seed_bars(&self, timeframe: Timeframe, bars: Vec<Bar>) {
        let mut inner = self.lock();
        for b in bars {
            inner.bars.insert((b.pair, timeframe, b.ts), b);
        }
    }

    /// Seed one stored forecast directly, bypassing the upsert budget.
    pub fn seed_forecast(&self, record: ForecastRecord) {
        self.lock()
            .forecasts
            .insert((record.pair, record.timeframe, record.ts), record);
    }

    /// Reject every forecast upsert after the first `budget` records have
    /// been accepted, to exercise partial-failure paths.
    pub fn limit_forecast_upserts(&self, budget: usize) {
        self.lock().forecast_budget = Some(budget);
    }

    /// All stored forecasts for a (pair, timeframe), ascending by timestamp.
    #[must_use]
    pub fn forecasts(&self, pair: PairId, timeframe: Timeframe) -> Vec<ForecastRecord> {
        self.lock()
            .forecasts
            .range((pair, timeframe, DateTime::<Utc>::MIN_UTC)..=(pair, timeframe, DateTime::<Utc>::MAX_UTC))
            .map(|(_, r)| *r)
            .collect()
    }

    /// All stored bars for a (pair, timeframe), ascending by timestamp.
    #[must_use]
    pub fn stored_bars(&self, pair: PairId, timeframe: Timeframe) -> Vec<Bar> {
        self.lock()
            .bars
            .range((pair, timeframe, DateTime::<Utc>::MIN_UTC)..=(pair, timeframe, DateTime::<Utc>::MAX_UTC))
            .map(|(_, b)| *b)
            .collect()
    }
}

#[async_trait]
impl ObservationSource for MemoryStore {
    async fn raw_observations(
        &self,
        pair: PairId,
        timeframe: Timeframe,
    ) -> Result<Vec<RawObservation>, CandelaError> {
        Ok(self
            .lock()
            .observations
            .get(&(pair, timeframe))
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl BarStore for MemoryStore {
    async fn bars(
        &self,
        pair: PairId,
        timeframe: Timeframe,
        from: Option<DateTime<Utc>>,
    ) -> Result<Vec<Bar>, CandelaError> {
        let lo = from.unwrap_or(DateTime::<Utc>::MIN_UTC);
        Ok(self
            .lock()
            .bars
            .range((pair, timeframe, lo)..=(pair, timeframe, DateTime::<Utc>::MAX_UTC))
            .map(|(_, b)| *b)
            .collect())
    }

    async fn upsert_bars(
        &self,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<UpsertReport, CandelaError> {
        let mut inner = self.lock();
        let mut report = UpsertReport::default();
        for b in bars {
            inner.bars.insert((b.pair, timeframe, b.ts), b);
            report.succeeded += 1;
        }
        Ok(report)
    }
}

#[async_trait]
impl ForecastStore for MemoryStore {
    async fn last_forecast(
        &self,
        pair: PairId,
        timeframe: Timeframe,
    ) -> Result<Option<ForecastRecord>, CandelaError> {
        Ok(self
            .lock()
            .forecasts
            .range((pair, timeframe, DateTime::<Utc>::MIN_UTC)..=(pair, timeframe, DateTime::<Utc>::MAX_UTC))
            .next_back()
            .map(|(_, r)| *r))
    }

    async fn upsert_forecasts(
        &self,
        records: Vec<ForecastRecord>,
    ) -> Result<UpsertReport, CandelaError> {
        let mut inner = self.lock();
        let mut report = UpsertReport::default();
        for r in records {
            if let Some(budget) = inner.forecast_budget
                && inner.forecasts.len() >= budget
                && !inner.forecasts.contains_key(&(r.pair, r.timeframe, r.ts))
            {
                report.failed.push(UpsertFailure {
                    ts: r.ts,
                    reason: "forced failure: forecast budget exhausted".to_string(),
                });
                continue;
            }
            inner.forecasts.insert((r.pair, r.timeframe, r.ts), r);
            report.succeeded += 1;
        }
        Ok(report)
    }
}

/// Naive persistence model: predicts the last fitted value for every step.
#[derive(Debug, Default)]
pub struct LastValueModel {
    last: Option<f64>,
}

impl LastValueModel {
    /// Create an unfitted model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForecastModel for LastValueModel {
    fn fit(&mut self, series: &[f64]) -> Result<(), CandelaError> {
        self.last = Some(
            *series
                .last()
                .ok_or_else(|| CandelaError::training("empty training series"))?,
        );
        Ok(())
    }

    fn predict(&mut self, n: usize) -> Result<Vec<f64>, CandelaError> {
        let last = self
            .last
            .ok_or_else(|| CandelaError::prediction("model not fitted"))?;
        Ok(vec![last; n])
    }
}

/// Deterministic drift model: extrapolates the mean step between consecutive
/// fitted values.
#[derive(Debug, Default)]
pub struct LinearTrendModel {
    last: Option<f64>,
    slope: f64,
}

impl LinearTrendModel {
    /// Create an unfitted model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForecastModel for LinearTrendModel {
    fn fit(&mut self, series: &[f64]) -> Result<(), CandelaError> {
        let (Some(first), Some(last)) = (series.first(), series.last()) else {
            return Err(CandelaError::training("empty training series"));
        };
        self.slope = if series.len() > 1 {
            (last - first) / (series.len() - 1) as f64
        } else {
            0.0
        };
        self.last = Some(*last);
        Ok(())
    }

    fn predict(&mut self, n: usize) -> Result<Vec<f64>, CandelaError> {
        let last = self
            .last
            .ok_or_else(|| CandelaError::prediction("model not fitted"))?;
        Ok((1..=n).map(|i| last + self.slope * i as f64).collect())
    }
}

/// Model that always fails, at fit or at predict.
#[derive(Debug, Clone, Copy)]
pub struct FailingModel {
    /// Fail at `fit` when true, otherwise at `predict`.
    pub on_fit: bool,
}

impl ForecastModel for FailingModel {
    fn fit(&mut self, _series: &[f64]) -> Result<(), CandelaError> {
        if self.on_fit {
            return Err(CandelaError::training("forced failure"));
        }
        Ok(())
    }

    fn predict(&mut self, _n: usize) -> Result<Vec<f64>, CandelaError> {
        Err(CandelaError::prediction("forced failure"))
    }
}

/// Wrapper that records every fitted series, for look-ahead assertions.
pub struct RecordingModel<M> {
    /// Every series passed to `fit`, in call order.
    pub fits: Arc<Mutex<Vec<Vec<f64>>>>,
    inner: M,
}

impl<M: ForecastModel> RecordingModel<M> {
    /// Wrap `inner`, sharing the fit log through `fits`.
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self {
            fits: Arc::new(Mutex::new(Vec::new())),
            inner,
        }
    }

    /// Handle to the shared fit log.
    #[must_use]
    pub fn fit_log(&self) -> Arc<Mutex<Vec<Vec<f64>>>> {
        Arc::clone(&self.fits)
    }
}

impl<M: ForecastModel> ForecastModel for RecordingModel<M> {
    fn fit(&mut self, series: &[f64]) -> Result<(), CandelaError> {
        self.fits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(series.to_vec());
        self.inner.fit(series)
    }

    fn predict(&mut self, n: usize) -> Result<Vec<f64>, CandelaError> {
        self.inner.predict(n)
    }
}
