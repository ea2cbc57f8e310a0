use candela_core::{CandelaError, PairId, Timeframe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Historical range scored by the backtest evaluator; both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRange {
    /// Earliest window start considered.
    pub start: DateTime<Utc>,
    /// Latest timestamp any window may reach.
    pub end: DateTime<Utc>,
}

/// Immutable per-forecaster configuration.
///
/// Built once and passed into the forecaster's constructor; the forecaster
/// never reads shared globals. Model selection and hyperparameters live with
/// the model instance itself, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecasterConfig {
    /// Pair this forecaster predicts.
    pub pair: PairId,
    /// Human-readable pair symbol used in errors and log fields (e.g. "BTC/EUR").
    pub symbol: String,
    /// Granularity of the bar and forecast series.
    pub timeframe: Timeframe,
    /// Backtest window length in steps.
    pub window_size: usize,
    /// Historical range for [`crate::Forecaster::evaluate`]; optional because
    /// catch-up runs do not need one.
    pub test_range: Option<TestRange>,
}

impl ForecasterConfig {
    /// Build a configuration with the timeframe's default backtest window
    /// (7 daily, 24 hourly, 60 minutely) and no test range.
    #[must_use]
    pub fn new(pair: PairId, symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            pair,
            symbol: symbol.into(),
            timeframe,
            window_size: timeframe.default_test_window(),
            test_range: None,
        }
    }

    /// Override the backtest window length.
    #[must_use]
    pub const fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the historical range scored by [`crate::Forecaster::evaluate`].
    #[must_use]
    pub const fn with_test_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.test_range = Some(TestRange { start, end });
        self
    }

    pub(crate) fn validate(&self) -> Result<(), CandelaError> {
        if self.window_size == 0 {
            return Err(CandelaError::InvalidArg(
                "window_size must be at least 1".to_string(),
            ));
        }
        if let Some(range) = &self.test_range
            && range.end < range.start
        {
            return Err(CandelaError::InvalidArg(format!(
                "test range ends before it starts: {} > {}",
                range.start, range.end
            )));
        }
        Ok(())
    }
}
