use crate::CandelaError;

/// Opaque fit/predict contract every pluggable forecasting model obeys.
///
/// The model is a full-refit black box: each training step calls `fit` with
/// the complete history available as of that step's cutoff, and no
/// incremental update is assumed. Any algorithm satisfying this contract is
/// pluggable; the orchestrator never inspects model internals.
pub trait ForecastModel: Send {
    /// Fit the model on a close-price series ordered ascending by time.
    ///
    /// # Errors
    /// Implementations report failures as [`CandelaError::Training`]; the
    /// orchestrator aborts the current step and preserves prior progress.
    fn fit(&mut self, series: &[f64]) -> Result<(), CandelaError>;

    /// Predict the next `n` points past the end of the fitted series.
    ///
    /// The returned vector must have length exactly `n`.
    ///
    /// # Errors
    /// Implementations report failures as [`CandelaError::Prediction`].
    fn predict(&mut self, n: usize) -> Result<Vec<f64>, CandelaError>;
}
