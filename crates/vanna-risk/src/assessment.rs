//! Concentration scoring and risk flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vanna_portfolio::{PortfolioSnapshot, UnderlyingAggregate};

use crate::stress::{ScenarioId, ScenarioResult};

/// Configurable limits for flag generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Single-name share of beta-weighted exposure that trips the
    /// concentration flag.
    #[serde(default = "default_concentration_share")]
    pub concentration_share: f64,
    /// Absolute daily dollar theta that trips the theta-burn flag.
    #[serde(default = "default_theta_burn_dollars")]
    pub theta_burn_dollars: f64,
    /// Absolute benchmark-equivalent delta shares that trip the
    /// directional-exposure flag.
    #[serde(default = "default_high_beta_delta_shares")]
    pub high_beta_delta_shares: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            concentration_share: default_concentration_share(),
            theta_burn_dollars: default_theta_burn_dollars(),
            high_beta_delta_shares: default_high_beta_delta_shares(),
        }
    }
}

fn default_concentration_share() -> f64 {
    0.35
}

fn default_theta_burn_dollars() -> f64 {
    1_000.0
}

fn default_high_beta_delta_shares() -> f64 {
    2_000.0
}

/// A flagged concern over the current book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskFlag {
    /// One underlying dominates beta-weighted exposure.
    Concentration {
        /// The dominating symbol.
        symbol: String,
        /// Its share of total beta-weighted exposure, 0..1.
        share: f64,
    },
    /// Daily theta decay exceeds the configured dollar limit.
    ThetaBurn {
        /// Portfolio dollar theta per calendar day.
        theta_dollars: f64,
    },
    /// Benchmark-equivalent delta exceeds the configured share limit.
    HighBetaDelta {
        /// Beta-weighted exposure expressed in benchmark shares.
        benchmark_equivalent_shares: f64,
    },
}

/// Risk picture for one cycle: concentration map, flags, and stress
/// projections. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Symbol share of total absolute beta-weighted dollar delta,
    /// 0..1, summing to 1 across symbols with nonzero exposure.
    pub concentration: BTreeMap<String, f64>,
    /// Herfindahl index of the concentration map (1 = single name).
    pub herfindahl: f64,
    /// Flagged concerns, empty when the book is inside every limit.
    pub flags: Vec<RiskFlag>,
    /// Stress projections keyed by scenario.
    pub stress: BTreeMap<ScenarioId, ScenarioResult>,
}

/// Scores concentration and raises flags over an aggregated book.
///
/// Pure projection over the inputs; the snapshot is never mutated.
#[must_use]
pub fn assess(
    underlyings: &[UnderlyingAggregate],
    portfolio: &PortfolioSnapshot,
    thresholds: &RiskThresholds,
    stress: BTreeMap<ScenarioId, ScenarioResult>,
) -> RiskAssessment {
    let total_abs: f64 = underlyings
        .iter()
        .filter_map(|u| u.beta_weighted_dollar_delta)
        .map(f64::abs)
        .sum();

    let mut concentration = BTreeMap::new();
    if total_abs > 0.0 {
        for u in underlyings {
            if let Some(bw) = u.beta_weighted_dollar_delta {
                if bw != 0.0 {
                    concentration.insert(u.symbol.clone(), bw.abs() / total_abs);
                }
            }
        }
    }

    let herfindahl = concentration.values().map(|s| s * s).sum();

    let mut flags = Vec::new();
    for (symbol, &share) in &concentration {
        if share > thresholds.concentration_share {
            flags.push(RiskFlag::Concentration {
                symbol: symbol.clone(),
                share,
            });
        }
    }
    if portfolio.theta_dollars.abs() > thresholds.theta_burn_dollars {
        flags.push(RiskFlag::ThetaBurn {
            theta_dollars: portfolio.theta_dollars,
        });
    }
    if let Some(bench_spot) = portfolio.benchmark_spot {
        if bench_spot > 0.0 {
            let shares = portfolio.beta_weighted_dollar_delta / bench_spot;
            if shares.abs() > thresholds.high_beta_delta_shares {
                flags.push(RiskFlag::HighBetaDelta {
                    benchmark_equivalent_shares: shares,
                });
            }
        }
    }

    RiskAssessment {
        concentration,
        herfindahl,
        flags,
        stress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Utc};
    use vanna_portfolio::{Composition, LongShort};

    fn underlying(symbol: &str, bw: Option<f64>) -> UnderlyingAggregate {
        UnderlyingAggregate {
            symbol: symbol.to_string(),
            spot: Some(100.0),
            net_delta_shares: 100.0,
            dollar_delta: Some(10_000.0),
            beta: bw.map(|_| 1.0),
            beta_weighted_dollar_delta: bw,
            gamma_dollars: 0.0,
            vega_dollars: 0.0,
            theta_dollars: 0.0,
            position_indices: vec![0],
        }
    }

    fn portfolio(theta: f64, bw_delta: f64, bench_spot: Option<f64>) -> PortfolioSnapshot {
        PortfolioSnapshot {
            timestamp: DateTime::<Utc>::MIN_UTC,
            benchmark_symbol: "SPY".to_string(),
            benchmark_spot: bench_spot,
            raw_delta_shares: 0.0,
            dollar_delta: 0.0,
            beta_weighted_dollar_delta: bw_delta,
            gamma_dollars: 0.0,
            vega_dollars: 0.0,
            theta_dollars: theta,
            long_short: LongShort::default(),
            composition: Composition::default(),
            position_count: 1,
            excluded_count: 0,
        }
    }

    #[test]
    fn test_concentration_shares_sum_to_one() {
        let underlyings = vec![
            underlying("AAPL", Some(30_000.0)),
            underlying("NVDA", Some(-50_000.0)),
            underlying("XYZ", None),
        ];
        let a = assess(
            &underlyings,
            &portfolio(0.0, 0.0, None),
            &RiskThresholds::default(),
            BTreeMap::new(),
        );

        let sum: f64 = a.concentration.values().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
        assert!(!a.concentration.contains_key("XYZ"));
        assert_relative_eq!(a.concentration["NVDA"], 0.625, epsilon = 1e-12);
    }

    #[test]
    fn test_no_exposure_empty_concentration() {
        let underlyings = vec![underlying("XYZ", None)];
        let a = assess(
            &underlyings,
            &portfolio(0.0, 0.0, None),
            &RiskThresholds::default(),
            BTreeMap::new(),
        );
        assert!(a.concentration.is_empty());
        assert_eq!(a.herfindahl, 0.0);
    }

    #[test]
    fn test_concentration_flag_raised_above_threshold() {
        let underlyings = vec![
            underlying("NVDA", Some(80_000.0)),
            underlying("AAPL", Some(20_000.0)),
        ];
        let a = assess(
            &underlyings,
            &portfolio(0.0, 0.0, None),
            &RiskThresholds::default(),
            BTreeMap::new(),
        );
        assert!(a
            .flags
            .iter()
            .any(|f| matches!(f, RiskFlag::Concentration { symbol, share }
                if symbol == "NVDA" && (*share - 0.8).abs() < 1e-12)));
    }

    #[test]
    fn test_theta_burn_flag() {
        let a = assess(
            &[],
            &portfolio(-1_500.0, 0.0, None),
            &RiskThresholds::default(),
            BTreeMap::new(),
        );
        assert!(matches!(a.flags[0], RiskFlag::ThetaBurn { theta_dollars } if theta_dollars == -1_500.0));
    }

    #[test]
    fn test_high_beta_delta_flag_in_benchmark_shares() {
        // 1,400,000 of bw dollar delta over a 560 benchmark = 2500 shares.
        let a = assess(
            &[],
            &portfolio(0.0, 1_400_000.0, Some(560.0)),
            &RiskThresholds::default(),
            BTreeMap::new(),
        );
        assert!(matches!(
            a.flags[0],
            RiskFlag::HighBetaDelta { benchmark_equivalent_shares }
                if (benchmark_equivalent_shares - 2_500.0).abs() < 1e-9
        ));
    }

    #[test]
    fn test_no_benchmark_spot_skips_delta_flag() {
        let a = assess(
            &[],
            &portfolio(0.0, 1_400_000.0, None),
            &RiskThresholds::default(),
            BTreeMap::new(),
        );
        assert!(a.flags.is_empty());
    }

    #[test]
    fn test_herfindahl_single_name_is_one() {
        let underlyings = vec![underlying("NVDA", Some(10_000.0))];
        let a = assess(
            &underlyings,
            &portfolio(0.0, 0.0, None),
            &RiskThresholds::default(),
            BTreeMap::new(),
        );
        assert_relative_eq!(a.herfindahl, 1.0, epsilon = 1e-12);
    }
}
