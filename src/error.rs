//! Crawl-level error types.

use thiserror::Error;

use crate::source::SourceError;

/// Result type for catalog construction.
pub type CrawlResult<T> = Result<T, CrawlError>;

/// Errors raised while validating crawl configuration.
///
/// All of these surface before the first metadata source call.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An inclusion pattern failed to compile.
    #[error("invalid inclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// The underlying regex failure.
        #[source]
        source: regex::Error,
    },

    /// A routine type string matched no known routine kind.
    #[error("unknown routine type: {0}")]
    UnknownRoutineType(String),
}

/// Errors that abort a crawl.
///
/// Partial failures (one table refusing to describe itself, an unsupported
/// listing, a stage running out of time) never surface here. They are logged
/// and the catalog keeps whatever was attached before the failure.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Configuration was rejected before retrieval started.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The metadata source could not be reached at all.
    #[error("metadata source unavailable: {0}")]
    SourceUnavailable(#[source] SourceError),
}
