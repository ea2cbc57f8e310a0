use candela_core::{
    BarStore, CandelaError, ObservationSource, PairId, Timeframe, UpsertFailure, UpsertReport,
    aggregate_observations, resample_to,
};

/// Outcome of canonicalizing one pair at one timeframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalizeReport {
    /// Bars accepted by the store.
    pub upserted: usize,
    /// Aggregation buckets dropped because of a malformed observation.
    pub skipped_buckets: usize,
    /// Bars the store rejected.
    pub failed: Vec<UpsertFailure>,
}

/// Reconcile a pair's raw observations into canonical bars and upsert them.
///
/// Malformed buckets are skipped and counted, never aborting the batch; store
/// rejections are reported per bar. Upserts are idempotent, so re-running
/// after a partial failure is safe.
///
/// # Errors
/// Returns the source's or store's error if fetching or upserting fails as a
/// whole.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(target = "candela::ingest", skip(source, store), fields(pair = pair.0, timeframe = %timeframe))
)]
pub async fn canonicalize_pair(
    source: &dyn ObservationSource,
    store: &dyn BarStore,
    pair: PairId,
    timeframe: Timeframe,
) -> Result<CanonicalizeReport, CandelaError> {
    let observations = source.raw_observations(pair, timeframe).await?;
    let batch = aggregate_observations(pair, observations, timeframe);
    if batch.bars.is_empty() {
        return Ok(CanonicalizeReport {
            upserted: 0,
            skipped_buckets: batch.skipped,
            failed: Vec::new(),
        });
    }
    let report = store.upsert_bars(timeframe, batch.bars).await?;
    Ok(CanonicalizeReport {
        upserted: report.succeeded,
        skipped_buckets: batch.skipped,
        failed: report.failed,
    })
}

/// Bucket a pair's canonical `source`-timeframe bars into the coarser
/// `target` timeframe and upsert the result.
///
/// Gaps in the fine series are dropped, never emitted as placeholder bars.
///
/// # Errors
/// Returns `InvalidArg` unless `target` is strictly coarser than `source`,
/// or the store's error if reading or upserting fails.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(target = "candela::ingest", skip(store), fields(pair = pair.0))
)]
pub async fn resample_pair(
    store: &dyn BarStore,
    pair: PairId,
    source: Timeframe,
    target: Timeframe,
) -> Result<UpsertReport, CandelaError> {
    if source >= target {
        return Err(CandelaError::InvalidArg(format!(
            "target timeframe {target} must be coarser than the source {source}"
        )));
    }
    let fine = store.bars(pair, source, None).await?;
    let coarse = resample_to(fine, target);
    if coarse.is_empty() {
        return Ok(UpsertReport::default());
    }
    store.upsert_bars(target, coarse).await
}
