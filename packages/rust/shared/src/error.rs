//! Error types for docrelay.
//!
//! Library crates use [`DocRelayError`] via `thiserror`.
//! The app crate (fn) wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docrelay operations.
///
/// Every variant is fatal for the invocation that raised it; the handler
/// boundary converts it into a `failed` response and nothing propagates
/// further. A non-PDF upload is not an error at all, it is the `skipped`
/// outcome.
#[derive(Debug, thiserror::Error)]
pub enum DocRelayError {
    /// Invocation payload was absent or not valid JSON.
    #[error("invalid event: {message}")]
    Event { message: String },

    /// Invocation payload parsed but a required field was absent.
    #[error("missing event field: {field}")]
    MissingField { field: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Data-ingestion service call failed.
    #[error("ingestion error: {0}")]
    Ingestion(String),

    /// Agent endpoint call failed.
    #[error("agent error: {0}")]
    Agent(String),

    /// Object-storage call failed.
    #[error("object storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocRelayError>;

impl DocRelayError {
    /// Create an event error from any displayable message.
    pub fn event(msg: impl Into<String>) -> Self {
        Self::Event {
            message: msg.into(),
        }
    }

    /// Create a missing-field error naming the absent field.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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
