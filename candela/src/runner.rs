use candela_core::{CandelaError, PairId, Timeframe};
use futures::StreamExt;

use crate::forecaster::{CatchUpReport, Forecaster};

/// Outcome of one forecaster's catch-up inside a batch run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Pair the forecaster predicts.
    pub pair: PairId,
    /// Pair symbol from the forecaster's configuration.
    pub symbol: String,
    /// Timeframe of the forecaster's series.
    pub timeframe: Timeframe,
    /// The catch-up result; a failure here never affects other forecasters.
    pub result: Result<CatchUpReport, CandelaError>,
}

/// Run catch-up for a batch of forecasters with bounded concurrency.
///
/// Distinct forecasters share no mutable state, so they are embarrassingly
/// parallel; `concurrency` only bounds how many models train at once. Each
/// forecaster's failure is reported in its own [`RunOutcome`] and aborts
/// nothing else. Output order follows completion, not input order.
pub async fn run_catch_up_all(
    forecasters: Vec<Forecaster>,
    concurrency: usize,
) -> Vec<RunOutcome> {
    let limit = concurrency.max(1);
    futures::stream::iter(forecasters.into_iter().map(|mut forecaster| async move {
        let result = forecaster.run_catch_up().await;
        #[cfg(feature = "tracing")]
        if let Err(e) = &result {
            tracing::warn!(
                target: "candela::runner",
                symbol = %forecaster.config().symbol,
                timeframe = %forecaster.config().timeframe,
                error = %e,
                "catch-up failed"
            );
        }
        RunOutcome {
            pair: forecaster.config().pair,
            symbol: forecaster.config().symbol.clone(),
            timeframe: forecaster.config().timeframe,
            result,
        }
    }))
    .buffer_unordered(limit)
    .collect()
    .await
}
