//! Long/short bucketing and book composition.

use serde::{Deserialize, Serialize};

use vanna_core::Right;

use crate::types::PositionExposure;

/// Dollar delta split by direction.
///
/// Each position lands in exactly one bucket by the sign of its dollar
/// delta; positions without a resolvable dollar delta land in neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LongShort {
    /// Sum of positive position dollar deltas.
    pub long_dollar_delta: f64,
    /// Sum of negative position dollar deltas (non-positive).
    pub short_dollar_delta: f64,
}

impl LongShort {
    /// Buckets every exposure by the sign of its dollar delta.
    #[must_use]
    pub fn bucketize(exposures: &[PositionExposure]) -> Self {
        let mut out = Self::default();
        for dd in exposures.iter().filter_map(PositionExposure::dollar_delta) {
            if dd >= 0.0 {
                out.long_dollar_delta += dd;
            } else {
                out.short_dollar_delta += dd;
            }
        }
        out
    }

    /// Gross exposure: `long - short` (both-sides magnitude).
    #[must_use]
    pub fn gross(&self) -> f64 {
        self.long_dollar_delta - self.short_dollar_delta
    }

    /// Net exposure: `long + short`.
    #[must_use]
    pub fn net(&self) -> f64 {
        self.long_dollar_delta + self.short_dollar_delta
    }
}

/// Notional split between options and stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    /// Absolute notional held in options.
    pub option_notional: f64,
    /// Absolute notional held in stock.
    pub stock_notional: f64,
    /// Number of option positions.
    pub option_positions: usize,
    /// Number of stock positions.
    pub stock_positions: usize,
}

impl Composition {
    /// Splits a book's notional between options and stock.
    #[must_use]
    pub fn of(exposures: &[PositionExposure]) -> Self {
        let mut out = Self::default();
        for e in exposures {
            let notional = e.notional().map_or(0.0, f64::abs);
            if e.position.contract.right == Right::Stock {
                out.stock_positions += 1;
                out.stock_notional += notional;
            } else {
                out.option_positions += 1;
                out.option_notional += notional;
            }
        }
        out
    }

    /// Fraction of total notional held in options, 0 when flat.
    #[must_use]
    pub fn option_share(&self) -> f64 {
        let total = self.option_notional + self.stock_notional;
        if total > 0.0 {
            self.option_notional / total
        } else {
            0.0
        }
    }
}
