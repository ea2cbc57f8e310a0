//! Time-series engines shared by ingestion and the forecasting orchestrator.
//!
//! Modules include:
//! - `aggregate`: reconcile raw, possibly duplicated observations into one
//!   canonical bar per bucket (volume-weighted open/close)
//! - `resample`: bucket already-canonical fine bars into coarser timeframes
//!   (first/last open/close)
//!
//! The two aggregation rules are intentionally different. Weighted means
//! reconcile overlapping multi-source raw data; first/last is the faithful
//! OHLC definition once inputs are non-overlapping. Do not unify them.
/// Bar aggregation for raw, duplicate-timestamp observations.
pub mod aggregate;
/// Resampling of canonical bars to coarser timeframes.
pub mod resample;
