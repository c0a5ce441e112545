//! Greeks sets with nullable fields and a source tag.

use serde::{Deserialize, Serialize};

/// Where the fields of a [`GreeksSet`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreeksSource {
    /// All populated fields were supplied by the market data vendor.
    Vendor,
    /// All populated fields were computed by the pricing model.
    Model,
    /// Vendor fields with null gaps filled independently by the model.
    Mixed,
}

/// First-order sensitivities for one contract, each nullable.
///
/// Conventions: `delta` per underlying unit, `vega` in dollars per 1
/// vol point, `theta` in dollars per calendar day. Vendor-supplied
/// fields are never overwritten by the model; each null field is filled
/// independently (partial fallback, not all-or-nothing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreeksSet {
    /// Implied volatility (annualized, decimal).
    pub iv: Option<f64>,
    /// Sensitivity of option value to spot.
    pub delta: Option<f64>,
    /// Rate of change of delta with spot.
    pub gamma: Option<f64>,
    /// Sensitivity to a 1-point implied-vol move.
    pub vega: Option<f64>,
    /// Value decay per calendar day.
    pub theta: Option<f64>,
    /// Origin of the populated fields.
    pub source: GreeksSource,
}

impl GreeksSet {
    /// An all-null set attributed to the model.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            iv: None,
            delta: None,
            gamma: None,
            vega: None,
            theta: None,
            source: GreeksSource::Model,
        }
    }

    /// True if no field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iv.is_none()
            && self.delta.is_none()
            && self.gamma.is_none()
            && self.vega.is_none()
            && self.theta.is_none()
    }

    /// True when delta is present, the minimum needed for aggregation.
    #[must_use]
    pub fn has_delta(&self) -> bool {
        self.delta.is_some()
    }

    /// Fills every null field from `model`, leaving populated fields
    /// untouched. Retags the set `Mixed` when at least one field was
    /// filled next to an existing vendor field.
    pub fn fill_missing_from(&mut self, model: &GreeksSet) {
        let had_vendor = !self.is_empty() && self.source == GreeksSource::Vendor;
        let mut filled = false;

        for (slot, candidate) in [
            (&mut self.iv, model.iv),
            (&mut self.delta, model.delta),
            (&mut self.gamma, model.gamma),
            (&mut self.vega, model.vega),
            (&mut self.theta, model.theta),
        ] {
            if slot.is_none() && candidate.is_some() {
                *slot = candidate;
                filled = true;
            }
        }

        if filled && had_vendor {
            self.source = GreeksSource::Mixed;
        } else if filled && self.source == GreeksSource::Vendor {
            self.source = GreeksSource::Model;
        }
    }
}

impl Default for GreeksSet {
    fn default() -> Self {
        Self::empty()
    }
}
