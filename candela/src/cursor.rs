use chrono::{DateTime, Utc};

/// Position of a forecaster's stored series relative to its canonical bars.
///
/// Derived from two timestamps only (the last stored forecast and the latest
/// canonical bar), so the catch-up loop is testable without real time
/// elapsing: callers inject both and re-derive after every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No forecast stored yet: seed the series one step past the latest bar.
    NoPriorForecast,
    /// The last stored forecast still trails the latest bar: replay exactly
    /// one step, trained on history strictly prior to its own timestamp.
    CatchingUp {
        /// Timestamp of the last stored forecast.
        last: DateTime<Utc>,
    },
    /// The stored series already leads the bars; terminal for this invocation.
    UpToDate,
}

impl CursorState {
    /// Derive the state from the last stored forecast timestamp (if any) and
    /// the latest canonical bar timestamp.
    #[must_use]
    pub fn derive(last_forecast: Option<DateTime<Utc>>, latest_bar: DateTime<Utc>) -> Self {
        match last_forecast {
            None => Self::NoPriorForecast,
            Some(last) if last <= latest_bar => Self::CatchingUp { last },
            Some(_) => Self::UpToDate,
        }
    }
}
