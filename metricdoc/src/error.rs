//! Error types for the documentation generator.

use std::path::PathBuf;

use metricdoc_exposition::ExpositionError;
use thiserror::Error;

/// Result type alias using [`GeneratorError`].
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Fatal conditions of a generator run.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The exposition handler could not be built or queried.
    #[error("Scrape failed: {0}")]
    Exposition(#[from] ExpositionError),

    /// The exposition handler answered with a non-success status.
    #[error("Scrape failed: got HTTP status code of {status} from {path}")]
    ScrapeStatus { path: String, status: u16 },

    /// The exposition body could not be read.
    #[error("Failed to parse metrics from exposition body: {0}")]
    Read(#[source] std::io::Error),

    /// A HELP or TYPE line is missing required tokens.
    #[error("Failed to parse metrics from exposition body: line {line_number}: {reason}: {line:?}")]
    Malformed {
        line_number: usize,
        line: String,
        reason: String,
    },

    /// The output document could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap an output I/O error with the destination path.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

impl From<metricdoc_common::Error> for GeneratorError {
    fn from(err: metricdoc_common::Error) -> Self {
        Self::Config(err.to_string())
    }
}
