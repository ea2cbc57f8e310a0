use candela_core::CandelaError;

use crate::backtest::metrics::{BacktestReport, score};
use crate::backtest::{merge_keep_last, windows::generate_test_windows};
use crate::forecaster::{Forecaster, train_model};

impl Forecaster {
    /// Quantify this forecaster's accuracy across the configured test range.
    ///
    /// Per window: retrain on bars strictly before the window start, predict
    /// every period of the closed interval `[start, end]`, and accumulate.
    /// Overlapping windows re-predict timestamps; the merge keeps the
    /// last-computed value. The merged series is then scored against the
    /// canonical bars (MAPE, MAE, directional accuracy).
    ///
    /// A failure in any single window aborts the whole evaluation: no partial
    /// metric is ever reported. Nothing is persisted by this operation.
    ///
    /// # Errors
    /// - `InvalidArg` if no test range is configured, or it is shorter than
    ///   one window.
    /// - `Training`/`Prediction` if the model fails in any window.
    /// - `Data` if the forecasts cannot be scored against the bars.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "candela::backtest",
            skip(self),
            fields(symbol = %self.cfg.symbol, timeframe = %self.cfg.timeframe),
        )
    )]
    pub async fn evaluate(&mut self) -> Result<BacktestReport, CandelaError> {
        let range = self.cfg.test_range.ok_or_else(|| {
            CandelaError::InvalidArg(format!("no test range configured for {}", self.cfg.symbol))
        })?;
        let windows = generate_test_windows(
            range.start,
            range.end,
            self.cfg.window_size,
            self.cfg.timeframe,
        )?;
        if windows.is_empty() {
            return Err(CandelaError::InvalidArg(format!(
                "test range {} .. {} is shorter than one {}-step window",
                range.start, range.end, self.cfg.window_size
            )));
        }

        let bars = self
            .bars
            .bars(self.cfg.pair, self.cfg.timeframe, None)
            .await?;
        let unit = self.cfg.timeframe.unit();

        let mut accumulator = Vec::with_capacity(windows.len() * self.cfg.window_size);
        for window in &windows {
            // Training history ends strictly before the window start.
            train_model(self.model.as_mut(), &bars, self.cfg.timeframe, window.start)?;
            let predicted = self.model.predict(self.cfg.window_size)?;
            if predicted.len() != self.cfg.window_size {
                return Err(CandelaError::prediction(format!(
                    "expected {} points, got {}",
                    self.cfg.window_size,
                    predicted.len()
                )));
            }
            for (offset, value) in (0i32..).zip(predicted) {
                accumulator.push((window.start + unit * offset, value));
            }
        }

        let merged = merge_keep_last(accumulator);

        #[cfg(feature = "tracing")]
        tracing::info!(
            target: "candela::backtest",
            windows = windows.len(),
            forecasts = merged.len(),
            "scoring backtest forecasts"
        );

        score(&bars, &merged, unit)
    }
}
