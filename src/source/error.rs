//! Metadata-source error types.

use thiserror::Error;

/// Result type for metadata source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors reported by a metadata source adapter.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source cannot be reached at all. Aborts the crawl.
    #[error("metadata source unavailable: {0}")]
    Unavailable(String),

    /// The backend failed while describing one object. The crawler logs
    /// this and keeps whatever was retrieved so far.
    #[error("backend error during {operation}: {message}")]
    Backend {
        /// The operation that failed (e.g. "list_columns").
        operation: String,
        /// Backend-reported message.
        message: String,
    },
}

impl SourceError {
    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Create a backend error for a named operation.
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Check whether this error must abort the whole crawl.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
