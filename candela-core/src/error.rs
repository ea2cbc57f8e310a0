use thiserror::Error;

/// Unified error type for the candela workspace.
///
/// This wraps data-consistency problems, argument validation errors,
/// store-tagged failures, not-found conditions, and opaque failures from the
/// pluggable forecasting model.
#[derive(Debug, Error)]
pub enum CandelaError {
    /// Issues with stored or computed data (misaligned series, empty slices, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "canonical bars for BTC/EUR".
        what: String,
    },

    /// The backing store rejected an operation.
    #[error("{store} store failed: {msg}")]
    Store {
        /// Which store failed ("observation", "bar", "forecast").
        store: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The pluggable model failed to fit its training series.
    #[error("model training failed: {0}")]
    Training(String),

    /// The pluggable model failed to produce a forecast.
    #[error("model prediction failed: {0}")]
    Prediction(String),
}

impl CandelaError {
    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `Store` error with the store name and message.
    pub fn store(store: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Store {
            store: store.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Training` error.
    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training(msg.into())
    }

    /// Helper: build a `Prediction` error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }
}
