//! Market data source trait.
//!
//! One trait covers everything a snapshot cycle consumes:
//! - open positions across accounts
//! - quotes (with underlying spot attached to option quotes)
//! - vendor-supplied greeks, possibly partial
//! - daily return history for beta regression
//! - vendor fundamental betas

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vanna_core::{Contract, GreeksSet, Position, Quote};

use crate::error::SourceResult;

/// Daily log-return history for one symbol, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    /// Symbol the returns belong to.
    pub symbol: String,
    /// `(session date, daily return)` points in ascending date order.
    pub points: Vec<(NaiveDate, f64)>,
}

impl ReturnSeries {
    /// Creates a series from pre-sorted points.
    #[must_use]
    pub fn new(symbol: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Provider of positions and market data for the snapshot cycle.
///
/// Implementations must be safe to share across tasks; the engine holds
/// one `Arc<dyn MarketDataSource>` for the life of the process.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// All open positions across the monitored accounts.
    async fn positions(&self) -> SourceResult<Vec<Position>>;

    /// Current quote for one contract.
    ///
    /// Option quotes should carry the underlying spot in
    /// [`Quote::spot`]; fields the source cannot supply stay `None`.
    async fn quote(&self, contract: &Contract) -> SourceResult<Quote>;

    /// Vendor greeks for an option contract, when the source has them.
    ///
    /// `Ok(None)` means the vendor simply has no greeks for this
    /// contract, which is not an error.
    async fn vendor_greeks(&self, contract: &Contract) -> SourceResult<Option<GreeksSet>>;

    /// Daily returns for `symbol` over the trailing `lookback_days`
    /// sessions, oldest first.
    async fn daily_returns(&self, symbol: &str, lookback_days: u32) -> SourceResult<ReturnSeries>;

    /// Vendor fundamental beta for `symbol` against the configured
    /// benchmark, when published.
    async fn fundamental_beta(&self, symbol: &str) -> SourceResult<Option<f64>>;
}
