//! Deterministic stress scenarios.
//!
//! Each scenario is a fixed shock to spot, implied vol, or time, and
//! every option is revalued through the full pricing model at the
//! shocked inputs rather than extrapolated through its local greeks.
//! Scenarios are single-factor unless the id itself names a
//! combination.
//!
//! Stocks respond linearly: a spot shock scales their dollar delta and
//! leaves their share delta at the position quantity.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use vanna_core::Right;
use vanna_pricing::{black_scholes, PricingInputs};
use vanna_portfolio::{PortfolioSnapshot, PositionExposure};

/// Floor applied to shocked implied vols.
const MIN_SHOCKED_IV: f64 = 1e-4;

const DAYS_PER_YEAR: f64 = 365.25;

/// The fixed scenario grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    /// Spot -10%.
    SpotDown10,
    /// Spot -5%.
    SpotDown5,
    /// Spot +5%.
    SpotUp5,
    /// Spot +10%.
    SpotUp10,
    /// Implied vol -10 points.
    VolDown10,
    /// Implied vol +10 points.
    VolUp10,
    /// Seven calendar days forward.
    TimeForward7d,
    /// Spot -10% with implied vol +10 points, jointly.
    SpotDown10VolUp10,
}

impl ScenarioId {
    /// Every scenario, in a fixed evaluation order.
    pub const ALL: [ScenarioId; 8] = [
        ScenarioId::SpotDown10,
        ScenarioId::SpotDown5,
        ScenarioId::SpotUp5,
        ScenarioId::SpotUp10,
        ScenarioId::VolDown10,
        ScenarioId::VolUp10,
        ScenarioId::TimeForward7d,
        ScenarioId::SpotDown10VolUp10,
    ];

    /// Relative spot shock, e.g. `-0.10`.
    #[must_use]
    pub fn spot_shock(self) -> f64 {
        match self {
            ScenarioId::SpotDown10 | ScenarioId::SpotDown10VolUp10 => -0.10,
            ScenarioId::SpotDown5 => -0.05,
            ScenarioId::SpotUp5 => 0.05,
            ScenarioId::SpotUp10 => 0.10,
            _ => 0.0,
        }
    }

    /// Implied vol shock in vol points.
    #[must_use]
    pub fn vol_shock_points(self) -> f64 {
        match self {
            ScenarioId::VolDown10 => -10.0,
            ScenarioId::VolUp10 | ScenarioId::SpotDown10VolUp10 => 10.0,
            _ => 0.0,
        }
    }

    /// Calendar days added to the clock.
    #[must_use]
    pub fn time_shift_days(self) -> f64 {
        match self {
            ScenarioId::TimeForward7d => 7.0,
            _ => 0.0,
        }
    }
}

/// Projected portfolio sensitivities under one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Projected net delta in share-equivalents.
    pub delta_shares: f64,
    /// Projected dollar theta per calendar day.
    pub theta_dollars: f64,
    /// Projected dollar vega per 1 vol point.
    pub vega_dollars: f64,
    /// `delta_shares` minus the baseline value.
    pub delta_change: f64,
    /// `theta_dollars` minus the baseline value.
    pub theta_change: f64,
    /// `vega_dollars` minus the baseline value.
    pub vega_change: f64,
}

/// Projects the whole grid over the book.
///
/// Read-only: the baseline snapshot and exposures are never mutated.
/// An option that cannot be repriced (missing spot, greeks, or IV)
/// keeps its baseline contribution in every projection, so only the
/// repriceable book moves the change columns.
#[must_use]
pub fn run_scenarios(
    exposures: &[PositionExposure],
    rate: f64,
    dividend_yields: &BTreeMap<String, f64>,
    baseline: &PortfolioSnapshot,
) -> BTreeMap<ScenarioId, ScenarioResult> {
    ScenarioId::ALL
        .iter()
        .map(|&id| {
            let r = project(exposures, rate, dividend_yields, baseline, id);
            (id, r)
        })
        .collect()
}

fn project(
    exposures: &[PositionExposure],
    rate: f64,
    dividend_yields: &BTreeMap<String, f64>,
    baseline: &PortfolioSnapshot,
    id: ScenarioId,
) -> ScenarioResult {
    let mut delta_shares = 0.0;
    let mut theta_dollars = 0.0;
    let mut vega_dollars = 0.0;

    for e in exposures {
        let contract = &e.position.contract;
        let scale = e.position.quantity * contract.multiplier;

        if contract.right == Right::Stock {
            // Spot shocks scale a stock's dollar exposure, not its
            // share count.
            delta_shares += e.position.quantity;
            continue;
        }

        let repriceable = match (e.spot, e.greeks.as_ref(), e.time_to_expiry_years) {
            (Some(spot), Some(greeks), Some(t)) => greeks.iv.map(|iv| (spot, iv, t)),
            _ => None,
        };
        let Some((spot, iv, t)) = repriceable else {
            carry_baseline(e, &mut delta_shares, &mut theta_dollars, &mut vega_dollars);
            continue;
        };

        let shocked = PricingInputs {
            spot: spot * (1.0 + id.spot_shock()),
            strike: contract.strike,
            time_to_expiry_years: (t - id.time_shift_days() / DAYS_PER_YEAR).max(0.0),
            rate,
            dividend_yield: dividend_yields.get(&contract.symbol).copied(),
            right: contract.right,
        };
        let shocked_iv = (iv + id.vol_shock_points() / 100.0).max(MIN_SHOCKED_IV);

        match black_scholes(&shocked, shocked_iv) {
            Ok(g) => {
                delta_shares += g.delta * scale;
                theta_dollars += g.theta * scale;
                vega_dollars += g.vega * scale;
            }
            Err(err) => {
                warn!("{}: stress revaluation failed: {}", contract.symbol, err);
                carry_baseline(e, &mut delta_shares, &mut theta_dollars, &mut vega_dollars);
            }
        }
    }

    ScenarioResult {
        delta_shares,
        theta_dollars,
        vega_dollars,
        delta_change: delta_shares - baseline.raw_delta_shares,
        theta_change: theta_dollars - baseline.theta_dollars,
        vega_change: vega_dollars - baseline.vega_dollars,
    }
}

/// Passes a position's baseline numbers through a projection that
/// cannot reprice it. Mirrors what the aggregation counted, so the
/// position's change contribution stays zero.
fn carry_baseline(
    e: &PositionExposure,
    delta_shares: &mut f64,
    theta_dollars: &mut f64,
    vega_dollars: &mut f64,
) {
    *delta_shares += e.delta_shares().unwrap_or(0.0);
    *theta_dollars += e.theta_dollars().unwrap_or(0.0);
    *vega_dollars += e.vega_dollars().unwrap_or(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};
    use vanna_core::{Contract, GreeksSet, GreeksSource, Position};
    use vanna_portfolio::aggregate;

    fn call_exposure(quantity: f64, iv: f64) -> PositionExposure {
        let contract = Contract::option(
            "NVDA",
            NaiveDate::from_ymd_opt(2026, 9, 18).unwrap(),
            Right::Call,
            100.0,
            1,
        );
        let inputs = PricingInputs {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry_years: 0.5,
            rate: 0.05,
            dividend_yield: None,
            right: Right::Call,
        };
        let g = black_scholes(&inputs, iv).unwrap();
        PositionExposure {
            position: Position::new("U100", contract, quantity, 8.0),
            spot: Some(100.0),
            greeks: Some(g.to_greeks_set()),
            time_to_expiry_years: Some(0.5),
            option_price: Some(g.price),
        }
    }

    fn baseline(exposures: &[PositionExposure]) -> PortfolioSnapshot {
        let (_, snapshot) = aggregate(
            exposures,
            &BTreeMap::new(),
            "SPY",
            None,
            DateTime::<Utc>::MIN_UTC,
        )
        .unwrap();
        snapshot
    }

    #[test]
    fn test_spot_up_raises_call_delta() {
        let exposures = vec![call_exposure(1.0, 0.25)];
        let base = baseline(&exposures);
        let results = run_scenarios(&exposures, 0.05, &BTreeMap::new(), &base);

        let up = &results[&ScenarioId::SpotUp10];
        let down = &results[&ScenarioId::SpotDown10];
        assert!(up.delta_change > 0.0);
        assert!(down.delta_change < 0.0);
        assert!(up.delta_shares <= 100.0);
    }

    #[test]
    fn test_vol_down_hits_floor_not_negative() {
        // 5 vol baseline, -10 point shock floors instead of crossing zero.
        let exposures = vec![call_exposure(1.0, 0.05)];
        let base = baseline(&exposures);
        let results = run_scenarios(&exposures, 0.05, &BTreeMap::new(), &base);
        let r = &results[&ScenarioId::VolDown10];
        assert!(r.delta_shares.is_finite());
        assert!(r.vega_dollars >= 0.0);
    }

    #[test]
    fn test_time_forward_raises_theta_magnitude_atm() {
        let exposures = vec![call_exposure(1.0, 0.25)];
        let base = baseline(&exposures);
        let results = run_scenarios(&exposures, 0.05, &BTreeMap::new(), &base);
        let r = &results[&ScenarioId::TimeForward7d];
        // Closer to expiry an ATM option decays faster.
        assert!(r.theta_dollars < base.theta_dollars);
    }

    #[test]
    fn test_stock_share_delta_unmoved_by_spot_shock() {
        let exposures = vec![PositionExposure {
            position: Position::new("U100", Contract::stock("SPY", 9), 300.0, 550.0),
            spot: Some(560.0),
            greeks: None,
            time_to_expiry_years: None,
            option_price: None,
        }];
        let base = baseline(&exposures);
        let results = run_scenarios(&exposures, 0.05, &BTreeMap::new(), &base);
        for r in results.values() {
            assert_eq!(r.delta_shares, 300.0);
            assert_eq!(r.delta_change, 0.0);
        }
    }

    #[test]
    fn test_unresolvable_option_excluded_from_projection() {
        let mut e = call_exposure(1.0, 0.25);
        e.greeks = None;
        let good = call_exposure(2.0, 0.25);
        let exposures = vec![e, good.clone()];
        let base = baseline(&exposures);

        let with_gap = run_scenarios(&exposures, 0.05, &BTreeMap::new(), &base);
        let only_good = run_scenarios(&[good], 0.05, &BTreeMap::new(), &baseline(&exposures));
        assert_eq!(
            with_gap[&ScenarioId::SpotUp5].delta_shares,
            only_good[&ScenarioId::SpotUp5].delta_shares
        );
    }

    #[test]
    fn test_vendor_delta_without_iv_carries_through_unshocked() {
        // Vendor gave a delta but no IV and nothing to backsolve from;
        // the position counts in the baseline, so projections must not
        // report its whole delta as a change.
        let contract = Contract::option(
            "NVDA",
            NaiveDate::from_ymd_opt(2026, 9, 18).unwrap(),
            Right::Call,
            100.0,
            1,
        );
        let exposures = vec![PositionExposure {
            position: Position::new("U100", contract, 2.0, 8.0),
            spot: Some(100.0),
            greeks: Some(GreeksSet {
                iv: None,
                delta: Some(0.6),
                gamma: None,
                vega: None,
                theta: None,
                source: GreeksSource::Vendor,
            }),
            time_to_expiry_years: Some(0.5),
            option_price: None,
        }];
        let base = baseline(&exposures);
        assert_eq!(base.raw_delta_shares, 120.0);

        let results = run_scenarios(&exposures, 0.05, &BTreeMap::new(), &base);
        for r in results.values() {
            assert_eq!(r.delta_shares, 120.0);
            assert_eq!(r.delta_change, 0.0);
        }
    }

    #[test]
    fn test_combined_scenario_applies_both_shocks() {
        let exposures = vec![call_exposure(1.0, 0.25)];
        let base = baseline(&exposures);
        let results = run_scenarios(&exposures, 0.05, &BTreeMap::new(), &base);

        let combined = &results[&ScenarioId::SpotDown10VolUp10];
        let spot_only = &results[&ScenarioId::SpotDown10];
        // Extra vol cushions the delta drop of the spot move.
        assert!(combined.delta_shares > spot_only.delta_shares);
        assert!(combined.vega_dollars != spot_only.vega_dollars);
    }

    #[test]
    fn test_projection_never_mutates_baseline() {
        let exposures = vec![call_exposure(1.0, 0.25)];
        let base = baseline(&exposures);
        let before = base.clone();
        let _ = run_scenarios(&exposures, 0.05, &BTreeMap::new(), &base);
        assert_eq!(base, before);
    }
}
