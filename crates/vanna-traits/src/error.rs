//! Error types for market data sources.

use thiserror::Error;

/// Result alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Common error type for market data sources.
///
/// Source failures are transient by assumption: the snapshot cycle
/// logs them, degrades the affected fields to null, and carries on.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection to the upstream provider failed.
    #[error("connection failed: {0}")]
    Connectivity(String),

    /// Request did not complete in time.
    #[error("timeout")]
    Timeout,

    /// Requested instrument or series is unknown to the source.
    #[error("not found: {0}")]
    NotFound(String),

    /// Payload from the source could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Connectivity(e.to_string())
    }
}
