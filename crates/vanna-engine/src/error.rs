//! Engine error types.

use thiserror::Error;

use vanna_portfolio::PortfolioError;
use vanna_traits::SourceError;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that abort one cycle (never the process).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source is unreachable; nothing to snapshot this cycle.
    #[error("market data source failed: {0}")]
    Source(#[from] SourceError),

    /// The source reported no open positions; an empty snapshot would
    /// be misleading, so the cycle is skipped.
    #[error("no open positions, cycle skipped")]
    NoPositions,

    /// Aggregation refused the inputs.
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),

    /// Output target could not be written.
    #[error("output write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A record failed to serialize.
    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration file was unreadable or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}
