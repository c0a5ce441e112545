//! Output records.
//!
//! The only artifact crossing the output boundary. One JSON object per
//! line, discriminated by `scope`; downstream consumers group lines by
//! `timestamp` to reconstruct one consistent snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use vanna_core::{GreeksSource, Right};
use vanna_portfolio::{PortfolioSnapshot, PositionExposure, UnderlyingAggregate};
use vanna_risk::{RiskAssessment, RiskFlag, ScenarioId, ScenarioResult};

/// One output line, discriminated by scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum OutputRecord {
    /// Per-underlying rollup.
    Underlying {
        /// Cycle timestamp.
        timestamp: DateTime<Utc>,
        /// Underlying root symbol.
        symbol: String,
        /// Net share-equivalent delta.
        net_delta_shares: f64,
        /// Dollar delta, null without a spot.
        dollar_delta: Option<f64>,
        /// Resolved beta, null when unresolved.
        beta: Option<f64>,
        /// Beta-weighted dollar delta.
        beta_weighted_dollar_delta: Option<f64>,
        /// Dollar gamma.
        #[serde(rename = "gamma_$")]
        gamma_dollars: f64,
        /// Dollar vega per 1 vol point.
        #[serde(rename = "vega_$")]
        vega_dollars: f64,
        /// Dollar theta per calendar day.
        #[serde(rename = "theta_$")]
        theta_dollars: f64,
    },
    /// Per-option-position detail.
    Option {
        /// Cycle timestamp.
        timestamp: DateTime<Utc>,
        /// Underlying root symbol.
        symbol: String,
        /// Option strike.
        strike: f64,
        /// Expiry calendar date.
        expiry: Option<NaiveDate>,
        /// Call or put.
        right: Right,
        /// Signed position quantity in contracts.
        quantity: f64,
        /// Implied volatility, null when unresolved.
        iv: Option<f64>,
        /// Per-unit delta.
        delta: Option<f64>,
        /// Per-unit gamma.
        gamma: Option<f64>,
        /// Per-unit vega per 1 vol point.
        vega: Option<f64>,
        /// Per-unit theta per calendar day.
        theta: Option<f64>,
        /// `delta * multiplier`.
        delta_contract: Option<f64>,
        /// `theta * multiplier`.
        theta_contract: Option<f64>,
        /// Underlying spot at observation.
        spot: Option<f64>,
        /// Where the greeks came from, null when none resolved.
        greeks_source: Option<GreeksSource>,
        /// Whole calendar days to expiry close.
        days_to_exp: Option<i64>,
        /// Risk-neutral probability of expiring in the money.
        prob_itm: Option<f64>,
        /// Percent spot move to reach the strike.
        pct_move_to_itm: Option<f64>,
        /// Percent spot move to double the option value.
        pct_move_to_double: Option<f64>,
        /// Option price used for analytics.
        option_price: Option<f64>,
    },
    /// Per-stock-position detail.
    Stock {
        /// Cycle timestamp.
        timestamp: DateTime<Utc>,
        /// Symbol held.
        symbol: String,
        /// Signed share quantity.
        quantity: f64,
        /// Spot at observation.
        spot: Option<f64>,
        /// Dollar delta (`quantity * spot`).
        dollar_delta: Option<f64>,
    },
    /// Whole-book totals.
    Portfolio {
        /// Cycle timestamp.
        timestamp: DateTime<Utc>,
        /// Raw delta in share-equivalents.
        raw_delta_shares: f64,
        /// Summed dollar delta.
        dollar_delta: f64,
        /// Beta-weighted dollar delta over resolved underlyings.
        beta_weighted_dollar_delta: f64,
        /// Dollar gamma.
        #[serde(rename = "gamma_$")]
        gamma_dollars: f64,
        /// Dollar vega per 1 vol point.
        #[serde(rename = "vega_$")]
        vega_dollars: f64,
        /// Dollar theta per calendar day.
        #[serde(rename = "theta_$")]
        theta_dollars: f64,
        /// Benchmark used for weighting.
        benchmark_symbol: String,
        /// Benchmark spot this cycle.
        benchmark_spot: Option<f64>,
        /// Sum of positive position dollar deltas.
        long_dollar_delta: f64,
        /// Sum of negative position dollar deltas.
        short_dollar_delta: f64,
        /// Absolute option notional.
        option_notional: f64,
        /// Absolute stock notional.
        stock_notional: f64,
        /// Positions observed this cycle.
        position_count: usize,
        /// Positions excluded from totals.
        excluded_count: usize,
    },
    /// Concentration, flags, and stress projections.
    RiskAssessment {
        /// Cycle timestamp.
        timestamp: DateTime<Utc>,
        /// Symbol share of absolute beta-weighted exposure, 0..1.
        concentration: BTreeMap<String, f64>,
        /// Herfindahl index of the concentration map.
        herfindahl: f64,
        /// Raised flags.
        flags: Vec<RiskFlag>,
        /// Stress projections keyed by scenario id.
        stress: BTreeMap<ScenarioId, ScenarioResult>,
    },
}

impl OutputRecord {
    /// Builds an underlying-scope record.
    #[must_use]
    pub fn underlying(u: &UnderlyingAggregate, timestamp: DateTime<Utc>) -> Self {
        Self::Underlying {
            timestamp,
            symbol: u.symbol.clone(),
            net_delta_shares: u.net_delta_shares,
            dollar_delta: u.dollar_delta,
            beta: u.beta,
            beta_weighted_dollar_delta: u.beta_weighted_dollar_delta,
            gamma_dollars: u.gamma_dollars,
            vega_dollars: u.vega_dollars,
            theta_dollars: u.theta_dollars,
        }
    }

    /// Builds an option- or stock-scope record from one exposure.
    ///
    /// Exercise analytics are supplied by the caller because they need
    /// pricing inputs the exposure does not carry.
    #[must_use]
    pub fn position(
        e: &PositionExposure,
        timestamp: DateTime<Utc>,
        days_to_exp: Option<i64>,
        prob_itm: Option<f64>,
        pct_move_to_itm: Option<f64>,
        pct_move_to_double: Option<f64>,
    ) -> Self {
        let contract = &e.position.contract;
        if contract.right == Right::Stock {
            return Self::Stock {
                timestamp,
                symbol: contract.symbol.clone(),
                quantity: e.position.quantity,
                spot: e.spot,
                dollar_delta: e.dollar_delta(),
            };
        }

        let g = e.greeks.as_ref();
        Self::Option {
            timestamp,
            symbol: contract.symbol.clone(),
            strike: contract.strike,
            expiry: contract.expiry,
            right: contract.right,
            quantity: e.position.quantity,
            iv: g.and_then(|g| g.iv),
            delta: g.and_then(|g| g.delta),
            gamma: g.and_then(|g| g.gamma),
            vega: g.and_then(|g| g.vega),
            theta: g.and_then(|g| g.theta),
            delta_contract: e.delta_contract(),
            theta_contract: e.theta_contract(),
            spot: e.spot,
            greeks_source: g.filter(|g| !g.is_empty()).map(|g| g.source),
            days_to_exp,
            prob_itm,
            pct_move_to_itm,
            pct_move_to_double,
            option_price: e.option_price,
        }
    }

    /// Builds the portfolio-scope record.
    #[must_use]
    pub fn portfolio(s: &PortfolioSnapshot) -> Self {
        Self::Portfolio {
            timestamp: s.timestamp,
            raw_delta_shares: s.raw_delta_shares,
            dollar_delta: s.dollar_delta,
            beta_weighted_dollar_delta: s.beta_weighted_dollar_delta,
            gamma_dollars: s.gamma_dollars,
            vega_dollars: s.vega_dollars,
            theta_dollars: s.theta_dollars,
            benchmark_symbol: s.benchmark_symbol.clone(),
            benchmark_spot: s.benchmark_spot,
            long_dollar_delta: s.long_short.long_dollar_delta,
            short_dollar_delta: s.long_short.short_dollar_delta,
            option_notional: s.composition.option_notional,
            stock_notional: s.composition.stock_notional,
            position_count: s.position_count,
            excluded_count: s.excluded_count,
        }
    }

    /// Builds the risk-assessment-scope record.
    #[must_use]
    pub fn risk_assessment(a: &RiskAssessment, timestamp: DateTime<Utc>) -> Self {
        Self::RiskAssessment {
            timestamp,
            concentration: a.concentration.clone(),
            herfindahl: a.herfindahl,
            flags: a.flags.clone(),
            stress: a.stress.clone(),
        }
    }

    /// The cycle timestamp stamped on this record.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Underlying { timestamp, .. }
            | Self::Option { timestamp, .. }
            | Self::Stock { timestamp, .. }
            | Self::Portfolio { timestamp, .. }
            | Self::RiskAssessment { timestamp, .. } => *timestamp,
        }
    }
}
