//! candela
//!
//! Per-pair walk-forward forecasting and backtesting over canonical OHLCV
//! bars.
//!
//! A [`Forecaster`] owns one pluggable model for one (pair, timeframe) and
//! drives two operations against the external stores:
//!
//! - [`Forecaster::run_catch_up`]: extend the stored single-step forecast
//!   series one timestamp at a time until it leads the latest canonical bar,
//!   retraining on the maximal strictly-prior history at every step.
//! - [`Forecaster::evaluate`]: retrain and forecast across a dense rolling
//!   set of historical test windows, then score MAPE, MAE, and directional
//!   accuracy against the canonical bars.
//!
//! Distinct forecasters share no mutable state; [`run_catch_up_all`] runs a
//! batch of them with bounded concurrency. Ingestion helpers
//! ([`canonicalize_pair`], [`resample_pair`]) turn raw observations into the
//! canonical bars both operations consume.
#![warn(missing_docs)]

/// Backtest window generation, evaluation, and accuracy metrics.
pub mod backtest;
/// Immutable per-forecaster configuration.
pub mod config;
/// The forecast cursor state machine.
pub mod cursor;
/// The per-pair forecaster and its training/prediction step.
pub mod forecaster;
/// Raw-observation canonicalization and bar resampling entry points.
pub mod ingest;
/// Bounded-concurrency catch-up across independent forecasters.
pub mod runner;

pub use backtest::metrics::BacktestReport;
pub use backtest::windows::generate_test_windows;
pub use config::{ForecasterConfig, TestRange};
pub use cursor::CursorState;
pub use forecaster::{CatchUpReport, Forecaster, ForecasterBuilder, predict_one, train_model};
pub use ingest::{CanonicalizeReport, canonicalize_pair, resample_pair};
pub use runner::{RunOutcome, run_catch_up_all};
