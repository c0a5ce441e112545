//! Underlying and portfolio rollups.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::buckets::{Composition, LongShort};
use crate::error::{PortfolioError, PortfolioResult};
use crate::types::PositionExposure;

/// Exposure rolled up across every position on one underlying.
///
/// Holds indices into the caller's exposure slice rather than the
/// positions themselves; aggregates never own positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderlyingAggregate {
    /// Underlying root symbol.
    pub symbol: String,
    /// Spot used for dollarizing, taken from the first position on the
    /// symbol carrying one.
    pub spot: Option<f64>,
    /// Net share-equivalent delta across resolvable positions.
    pub net_delta_shares: f64,
    /// `net_delta_shares * spot`; `None` without a spot.
    pub dollar_delta: Option<f64>,
    /// Resolved beta against the benchmark; `None` when unresolved.
    pub beta: Option<f64>,
    /// `beta * dollar_delta`; `None` when either input is missing.
    pub beta_weighted_dollar_delta: Option<f64>,
    /// Summed dollar gamma.
    pub gamma_dollars: f64,
    /// Summed dollar vega per 1 vol point.
    pub vega_dollars: f64,
    /// Summed dollar theta per calendar day.
    pub theta_dollars: f64,
    /// Indices of constituent positions in the caller's exposure slice.
    pub position_indices: Vec<usize>,
}

/// Whole-book totals for one cycle. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Cycle timestamp shared by every record in the snapshot.
    pub timestamp: DateTime<Utc>,
    /// Benchmark the beta weighting is expressed against.
    pub benchmark_symbol: String,
    /// Benchmark spot this cycle, when observable.
    pub benchmark_spot: Option<f64>,
    /// Raw delta in share-equivalents, the sum of every underlying's
    /// `net_delta_shares`.
    pub raw_delta_shares: f64,
    /// Sum of per-underlying dollar deltas (spot-resolved only).
    pub dollar_delta: f64,
    /// Sum of beta-weighted dollar deltas over underlyings with a
    /// resolved beta.
    pub beta_weighted_dollar_delta: f64,
    /// Summed dollar gamma.
    pub gamma_dollars: f64,
    /// Summed dollar vega per 1 vol point.
    pub vega_dollars: f64,
    /// Summed dollar theta per calendar day.
    pub theta_dollars: f64,
    /// Directional dollar-delta buckets.
    pub long_short: LongShort,
    /// Options versus stock composition.
    pub composition: Composition,
    /// Total positions observed this cycle.
    pub position_count: usize,
    /// Positions excluded from totals for want of resolvable greeks.
    pub excluded_count: usize,
}

/// Rolls exposures up to per-underlying aggregates and one portfolio
/// snapshot.
///
/// `betas` maps symbols to resolved betas; a symbol absent from the
/// map has a null beta and is excluded from the beta-weighted total
/// while remaining in every raw total. Underlyings come back sorted by
/// symbol so identical inputs produce identical output.
///
/// # Errors
///
/// [`PortfolioError::EmptyPortfolio`] when `exposures` is empty.
pub fn aggregate(
    exposures: &[PositionExposure],
    betas: &BTreeMap<String, f64>,
    benchmark_symbol: &str,
    benchmark_spot: Option<f64>,
    timestamp: DateTime<Utc>,
) -> PortfolioResult<(Vec<UnderlyingAggregate>, PortfolioSnapshot)> {
    if exposures.is_empty() {
        return Err(PortfolioError::EmptyPortfolio);
    }

    let mut grouped: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, e) in exposures.iter().enumerate() {
        grouped
            .entry(e.position.contract.symbol.as_str())
            .or_default()
            .push(i);
    }

    let mut underlyings = Vec::with_capacity(grouped.len());
    let mut excluded_count = 0;

    for (symbol, indices) in grouped {
        let mut net_delta_shares = 0.0;
        let mut gamma_dollars = 0.0;
        let mut vega_dollars = 0.0;
        let mut theta_dollars = 0.0;
        let mut spot = None;

        for &i in &indices {
            let e = &exposures[i];
            if spot.is_none() {
                spot = e.spot;
            }
            match e.delta_shares() {
                Some(ds) => net_delta_shares += ds,
                None => excluded_count += 1,
            }
            gamma_dollars += e.gamma_dollars().unwrap_or(0.0);
            vega_dollars += e.vega_dollars().unwrap_or(0.0);
            theta_dollars += e.theta_dollars().unwrap_or(0.0);
        }

        let dollar_delta = spot.map(|s| net_delta_shares * s);
        let beta = betas.get(symbol).copied();
        let beta_weighted_dollar_delta = match (beta, dollar_delta) {
            (Some(b), Some(dd)) => Some(b * dd),
            _ => None,
        };

        underlyings.push(UnderlyingAggregate {
            symbol: symbol.to_string(),
            spot,
            net_delta_shares,
            dollar_delta,
            beta,
            beta_weighted_dollar_delta,
            gamma_dollars,
            vega_dollars,
            theta_dollars,
            position_indices: indices,
        });
    }

    let snapshot = PortfolioSnapshot {
        timestamp,
        benchmark_symbol: benchmark_symbol.to_string(),
        benchmark_spot,
        raw_delta_shares: underlyings.iter().map(|u| u.net_delta_shares).sum(),
        dollar_delta: underlyings.iter().filter_map(|u| u.dollar_delta).sum(),
        beta_weighted_dollar_delta: underlyings
            .iter()
            .filter_map(|u| u.beta_weighted_dollar_delta)
            .sum(),
        gamma_dollars: underlyings.iter().map(|u| u.gamma_dollars).sum(),
        vega_dollars: underlyings.iter().map(|u| u.vega_dollars).sum(),
        theta_dollars: underlyings.iter().map(|u| u.theta_dollars).sum(),
        long_short: LongShort::bucketize(exposures),
        composition: Composition::of(exposures),
        position_count: exposures.len(),
        excluded_count,
    };

    Ok((underlyings, snapshot))
}
