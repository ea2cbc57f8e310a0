//! candela-core
//!
//! Core types, traits, and time-series engines shared across the candela
//! workspace.
//!
//! - `types`: the data model (pairs, timeframes, raw observations, canonical
//!   bars, forecast records, backtest windows).
//! - `store`: async traits for the external observation/bar/forecast stores.
//! - `model`: the opaque fit/predict contract every forecasting model obeys.
//! - `timeseries`: the bar aggregation and resampling engines.
//!
//! The store and model implementations live outside this crate; everything
//! here is deterministic and free of I/O so the aggregation and forecasting
//! semantics can be tested without a database or a real model.
#![warn(missing_docs)]

/// Unified error type for the candela workspace.
pub mod error;
/// The opaque forecasting-model contract.
pub mod model;
/// Async traits for the external observation, bar, and forecast stores.
pub mod store;
/// Bar aggregation and resampling engines.
pub mod timeseries;
pub mod types;

pub use error::CandelaError;
pub use model::ForecastModel;
pub use store::{BarStore, ForecastStore, ObservationSource};
pub use timeseries::aggregate::{AggregatedBatch, aggregate_observations};
pub use timeseries::resample::resample_to;
pub use types::*;
