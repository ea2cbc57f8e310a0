use std::sync::Arc;

use candela_core::{
    Bar, BarStore, CandelaError, ForecastModel, ForecastRecord, ForecastStore, Timeframe,
};
use chrono::{DateTime, Utc};

use crate::config::ForecasterConfig;
use crate::cursor::CursorState;

/// Outcome of one catch-up run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchUpReport {
    /// Number of forecasts produced and stored by this run.
    pub steps: usize,
    /// Timestamp of the last stored forecast after the run; always exactly
    /// one unit past the latest canonical bar once any step has executed.
    pub last_forecast: DateTime<Utc>,
}

/// Per-(pair, timeframe) forecaster: one pluggable model, one forecast series.
///
/// Operations are synchronous and single-threaded per forecaster; distinct
/// forecasters share no mutable state and may run concurrently (see
/// [`crate::run_catch_up_all`]).
pub struct Forecaster {
    pub(crate) cfg: ForecasterConfig,
    pub(crate) model: Box<dyn ForecastModel>,
    pub(crate) bars: Arc<dyn BarStore>,
    pub(crate) forecasts: Arc<dyn ForecastStore>,
}

impl std::fmt::Debug for Forecaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forecaster")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Forecaster`].
#[derive(Default)]
pub struct ForecasterBuilder {
    cfg: Option<ForecasterConfig>,
    model: Option<Box<dyn ForecastModel>>,
    bars: Option<Arc<dyn BarStore>>,
    forecasts: Option<Arc<dyn ForecastStore>>,
}

impl ForecasterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the immutable configuration.
    #[must_use]
    pub fn with_config(mut self, cfg: ForecasterConfig) -> Self {
        self.cfg = Some(cfg);
        self
    }

    /// Set the model instance this forecaster refits at every step.
    #[must_use]
    pub fn with_model(mut self, model: Box<dyn ForecastModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the canonical bar store.
    #[must_use]
    pub fn with_bar_store(mut self, bars: Arc<dyn BarStore>) -> Self {
        self.bars = Some(bars);
        self
    }

    /// Set the forecast store.
    #[must_use]
    pub fn with_forecast_store(mut self, forecasts: Arc<dyn ForecastStore>) -> Self {
        self.forecasts = Some(forecasts);
        self
    }

    /// Build the forecaster.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the configuration, model, or either store is
    /// missing, or if the configuration fails validation.
    pub fn build(self) -> Result<Forecaster, CandelaError> {
        let missing = |what: &str| CandelaError::InvalidArg(format!("forecaster needs {what}"));
        let cfg = self.cfg.ok_or_else(|| missing("a config"))?;
        cfg.validate()?;
        Ok(Forecaster {
            cfg,
            model: self.model.ok_or_else(|| missing("a model"))?,
            bars: self.bars.ok_or_else(|| missing("a bar store"))?,
            forecasts: self.forecasts.ok_or_else(|| missing("a forecast store"))?,
        })
    }
}

impl Forecaster {
    /// Start building a new forecaster.
    #[must_use]
    pub fn builder() -> ForecasterBuilder {
        ForecasterBuilder::new()
    }

    /// The forecaster's immutable configuration.
    #[must_use]
    pub const fn config(&self) -> &ForecasterConfig {
        &self.cfg
    }

    /// Extend the stored forecast series until it leads the latest canonical
    /// bar by exactly one unit.
    ///
    /// Steps are replayed one timestamp at a time, never jumped over: each is
    /// trained on the maximal history available as of its own timestamp and
    /// stored before the cursor advances. A step failure aborts the loop for
    /// this forecaster only; previously stored steps remain valid.
    ///
    /// # Errors
    /// - `NotFound` if no canonical bars exist for the pair.
    /// - `Training`/`Prediction` if the model fails mid-loop.
    /// - `Store` if the forecast store rejects an upsert.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "candela::forecaster",
            skip(self),
            fields(symbol = %self.cfg.symbol, timeframe = %self.cfg.timeframe),
        )
    )]
    pub async fn run_catch_up(&mut self) -> Result<CatchUpReport, CandelaError> {
        let bars = self
            .bars
            .bars(self.cfg.pair, self.cfg.timeframe, None)
            .await?;
        let Some(latest) = bars.last().map(|b| b.ts) else {
            return Err(CandelaError::not_found(format!(
                "canonical bars for {}",
                self.cfg.symbol
            )));
        };

        let unit = self.cfg.timeframe.unit();
        let mut cursor = self
            .forecasts
            .last_forecast(self.cfg.pair, self.cfg.timeframe)
            .await?
            .map(|r| r.ts);

        let mut steps = 0usize;
        loop {
            let target = match CursorState::derive(cursor, latest) {
                CursorState::UpToDate => break,
                CursorState::NoPriorForecast => latest + unit,
                CursorState::CatchingUp { last } => last + unit,
            };
            self.step(&bars, target).await?;
            cursor = Some(target);
            steps += 1;
        }

        let last_forecast = cursor.ok_or_else(|| {
            CandelaError::Data("catch-up finished without a stored forecast".to_string())
        })?;
        Ok(CatchUpReport {
            steps,
            last_forecast,
        })
    }

    /// One training/prediction step: refit on strictly-prior history, predict
    /// the single point at `target`, store it.
    async fn step(&mut self, bars: &[Bar], target: DateTime<Utc>) -> Result<(), CandelaError> {
        train_model(self.model.as_mut(), bars, self.cfg.timeframe, target)?;
        let predicted = predict_one(self.model.as_mut())?;
        let record = ForecastRecord {
            pair: self.cfg.pair,
            timeframe: self.cfg.timeframe,
            ts: target,
            predicted,
        };
        push_forecasts(self.forecasts.as_ref(), vec![record]).await
    }
}

/// Fit `model` on every close strictly before `cutoff`.
///
/// The cutoff is shifted back by exactly one `timeframe` unit before slicing,
/// guaranteeing the fitted series never includes the timestamp being
/// predicted.
///
/// # Errors
/// Returns `Data` if no bars remain before the cutoff, or the model's
/// `Training` error.
pub fn train_model(
    model: &mut dyn ForecastModel,
    bars: &[Bar],
    timeframe: Timeframe,
    cutoff: DateTime<Utc>,
) -> Result<(), CandelaError> {
    let training_end = cutoff - timeframe.unit();
    let closes: Vec<f64> = bars
        .iter()
        .filter(|b| b.ts <= training_end)
        .map(|b| b.close)
        .collect();
    if closes.is_empty() {
        return Err(CandelaError::Data(format!(
            "no training data before {cutoff}"
        )));
    }
    model.fit(&closes)
}

/// Predict exactly one step past the fitted series.
///
/// # Errors
/// Returns the model's `Prediction` error, or one of our own if the model
/// returns an empty series.
pub fn predict_one(model: &mut dyn ForecastModel) -> Result<f64, CandelaError> {
    let out = model.predict(1)?;
    out.first()
        .copied()
        .ok_or_else(|| CandelaError::prediction("model returned an empty forecast"))
}

pub(crate) async fn push_forecasts(
    store: &dyn ForecastStore,
    records: Vec<ForecastRecord>,
) -> Result<(), CandelaError> {
    let report = store.upsert_forecasts(records).await?;
    if let Some(first) = report.failed.first() {
        return Err(CandelaError::store(
            "forecast",
            format!(
                "upsert rejected {} record(s), first at {}: {}",
                report.failed.len(),
                first.ts,
                first.reason
            ),
        ));
    }
    Ok(())
}
