//! In-memory market data source.
//!
//! Backs tests, demos, and offline replay. All maps are concurrent so
//! a scenario can be mutated while the engine is polling it.

use async_trait::async_trait;
use dashmap::DashMap;

use vanna_core::{Contract, GreeksSet, Position, Quote, Right};

use crate::error::{SourceError, SourceResult};
use crate::market_data::{MarketDataSource, ReturnSeries};

/// Market data source backed by in-memory maps.
///
/// Quotes and greeks are keyed by contract id, return series and betas
/// by symbol. Stock quotes are additionally indexed by symbol, so a
/// lookup that knows only the ticker (a benchmark consult) resolves the
/// same quote under any contract id. Lookups that miss return the same
/// shapes a live source would: a missing quote is an error, missing
/// greeks or beta are `Ok(None)`, a missing return series is an empty
/// one.
#[derive(Debug, Default)]
pub struct StaticMarketData {
    positions: DashMap<i64, Position>,
    quotes: DashMap<i64, Quote>,
    stock_ids: DashMap<String, i64>,
    greeks: DashMap<i64, GreeksSet>,
    returns: DashMap<String, ReturnSeries>,
    betas: DashMap<String, f64>,
}

impl StaticMarketData {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a position, keyed by its contract id.
    pub fn set_position(&self, position: Position) {
        self.positions.insert(position.contract.con_id, position);
    }

    /// Adds or replaces the quote for a contract. Stock quotes are
    /// also indexed by symbol.
    pub fn set_quote(&self, contract: &Contract, quote: Quote) {
        if contract.right == Right::Stock {
            self.stock_ids
                .insert(contract.symbol.clone(), contract.con_id);
        }
        self.quotes.insert(contract.con_id, quote);
    }

    /// Adds or replaces vendor greeks for a contract.
    pub fn set_vendor_greeks(&self, contract: &Contract, greeks: GreeksSet) {
        self.greeks.insert(contract.con_id, greeks);
    }

    /// Adds or replaces the return history for a symbol.
    pub fn set_returns(&self, series: ReturnSeries) {
        self.returns.insert(series.symbol.clone(), series);
    }

    /// Adds or replaces a vendor fundamental beta.
    pub fn set_fundamental_beta(&self, symbol: impl Into<String>, beta: f64) {
        self.betas.insert(symbol.into(), beta);
    }

    /// Removes the quote for a contract, simulating a feed gap.
    pub fn clear_quote(&self, contract: &Contract) {
        self.quotes.remove(&contract.con_id);
    }
}

#[async_trait]
impl MarketDataSource for StaticMarketData {
    async fn positions(&self) -> SourceResult<Vec<Position>> {
        let mut out: Vec<Position> = self.positions.iter().map(|e| e.value().clone()).collect();
        // DashMap iteration order is arbitrary; keep replay deterministic.
        out.sort_by_key(|p| p.contract.con_id);
        Ok(out)
    }

    async fn quote(&self, contract: &Contract) -> SourceResult<Quote> {
        if let Some(q) = self.quotes.get(&contract.con_id) {
            return Ok(*q.value());
        }
        if contract.right == Right::Stock {
            if let Some(id) = self.stock_ids.get(&contract.symbol) {
                if let Some(q) = self.quotes.get(id.value()) {
                    return Ok(*q.value());
                }
            }
        }
        Err(SourceError::NotFound(contract.symbol.clone()))
    }

    async fn vendor_greeks(&self, contract: &Contract) -> SourceResult<Option<GreeksSet>> {
        Ok(self.greeks.get(&contract.con_id).map(|e| *e.value()))
    }

    async fn daily_returns(&self, symbol: &str, lookback_days: u32) -> SourceResult<ReturnSeries> {
        let mut series = self
            .returns
            .get(symbol)
            .map(|e| e.value().clone())
            .unwrap_or_else(|| ReturnSeries::new(symbol, Vec::new()));
        let keep = lookback_days as usize;
        if series.points.len() > keep {
            series.points = series.points.split_off(series.points.len() - keep);
        }
        Ok(series)
    }

    async fn fundamental_beta(&self, symbol: &str) -> SourceResult<Option<f64>> {
        Ok(self.betas.get(symbol).map(|e| *e.value()))
    }
}
