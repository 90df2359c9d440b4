//! Error types for the exposition endpoint.

use thiserror::Error;

/// Errors raised while building or scraping the exposition endpoint.
#[derive(Debug, Error)]
pub enum ExpositionError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A metric family was registered with a name Prometheus would reject.
    #[error("Invalid metric name: {0:?}")]
    InvalidMetricName(String),

    /// The in-process request could not be built or served.
    #[error("Failed to request {path}: {message}")]
    Request { path: String, message: String },

    /// The response body could not be collected or is not UTF-8.
    #[error("Failed to read response body from {path}: {message}")]
    Body { path: String, message: String },
}

impl From<metricdoc_common::Error> for ExpositionError {
    fn from(err: metricdoc_common::Error) -> Self {
        Self::Config(err.to_string())
    }
}
