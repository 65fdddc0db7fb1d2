//! Error types for jobscrape.
//!
//! Library crates use [`JobScrapeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all jobscrape operations.
#[derive(Debug, thiserror::Error)]
pub enum JobScrapeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The page session could not answer (no page open, stale document, ...).
    #[error("session error: {0}")]
    Session(String),

    /// A posting did not settle within its load timeout.
    #[error("timed out after {waited_ms}ms waiting for posting to load")]
    Timeout { waited_ms: u64 },

    /// Selector or tabular input could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad header, wrong column count, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Serializing the batch for export failed.
    #[error("export error: {0}")]
    Export(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, JobScrapeError>;

impl JobScrapeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a session error from any displayable message.
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
