//! Error types for portfolio aggregation.

use thiserror::Error;

/// Result alias for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors raised during aggregation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortfolioError {
    /// No positions were supplied; an empty snapshot would be
    /// indistinguishable from a flat book, so the cycle skips instead.
    #[error("no positions to aggregate")]
    EmptyPortfolio,
}
