//! Per-position aggregation inputs.

use serde::{Deserialize, Serialize};

use vanna_core::{GreeksSet, Position, Right};

/// One position joined to the market data resolved for it this cycle.
///
/// Everything beyond the position itself is nullable: a feed gap leaves
/// `spot` or `greeks` as `None` and the position drops out of the
/// affected totals. The dollarizing helpers below return `None`
/// whenever a required input is missing, which the aggregation layer
/// treats as "excluded from this total".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionExposure {
    /// The position being exposed.
    pub position: Position,
    /// Underlying spot at observation time.
    pub spot: Option<f64>,
    /// Resolved greeks (vendor, model, or mixed); `None` when
    /// unresolvable this cycle.
    pub greeks: Option<GreeksSet>,
    /// Year fraction to expiry; `None` for stock.
    pub time_to_expiry_years: Option<f64>,
    /// Option price used for analytics (mid, else theoretical).
    pub option_price: Option<f64>,
}

impl PositionExposure {
    /// Unit delta: 1 for stock, the resolved model/vendor delta for
    /// options, `None` when unresolved.
    #[must_use]
    pub fn unit_delta(&self) -> Option<f64> {
        match self.position.contract.right {
            Right::Stock => Some(1.0),
            _ => self.greeks.as_ref().and_then(|g| g.delta),
        }
    }

    /// Share-equivalent delta: `delta * quantity * multiplier`.
    #[must_use]
    pub fn delta_shares(&self) -> Option<f64> {
        let scale = self.position.quantity * self.position.contract.multiplier;
        self.unit_delta().map(|d| d * scale)
    }

    /// Per-contract dollar delta: `delta * multiplier`.
    #[must_use]
    pub fn delta_contract(&self) -> Option<f64> {
        self.unit_delta()
            .map(|d| d * self.position.contract.multiplier)
    }

    /// Per-contract theta: `theta * multiplier`, dollars per calendar
    /// day.
    #[must_use]
    pub fn theta_contract(&self) -> Option<f64> {
        self.greeks
            .as_ref()
            .and_then(|g| g.theta)
            .map(|t| t * self.position.contract.multiplier)
    }

    /// Dollar delta of the whole position: `delta_shares * spot`.
    #[must_use]
    pub fn dollar_delta(&self) -> Option<f64> {
        Some(self.delta_shares()? * self.spot?)
    }

    /// Dollar gamma: `gamma * quantity * multiplier * spot`. Zero for
    /// stock.
    #[must_use]
    pub fn gamma_dollars(&self) -> Option<f64> {
        if self.position.contract.right == Right::Stock {
            return Some(0.0);
        }
        let gamma = self.greeks.as_ref().and_then(|g| g.gamma)?;
        let scale = self.position.quantity * self.position.contract.multiplier;
        Some(gamma * scale * self.spot?)
    }

    /// Dollar vega per 1 vol point across the position. Zero for stock.
    #[must_use]
    pub fn vega_dollars(&self) -> Option<f64> {
        if self.position.contract.right == Right::Stock {
            return Some(0.0);
        }
        let vega = self.greeks.as_ref().and_then(|g| g.vega)?;
        Some(vega * self.position.quantity * self.position.contract.multiplier)
    }

    /// Dollar theta per calendar day across the position. Zero for
    /// stock.
    #[must_use]
    pub fn theta_dollars(&self) -> Option<f64> {
        if self.position.contract.right == Right::Stock {
            return Some(0.0);
        }
        let theta = self.greeks.as_ref().and_then(|g| g.theta)?;
        Some(theta * self.position.quantity * self.position.contract.multiplier)
    }

    /// Market value of the position, spot-based for stock and
    /// price-based for options.
    #[must_use]
    pub fn notional(&self) -> Option<f64> {
        let scale = self.position.quantity * self.position.contract.multiplier;
        match self.position.contract.right {
            Right::Stock => Some(self.spot? * scale),
            _ => Some(self.option_price? * scale),
        }
    }

    /// True when the position can contribute to delta totals.
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        self.unit_delta().is_some()
    }
}
