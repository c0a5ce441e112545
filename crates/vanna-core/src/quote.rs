//! Market quotes.

use serde::{Deserialize, Serialize};

/// True if `value` is a finite number greater than zero.
///
/// Vendor feeds deliver NaN, negative sentinel values and stale zeros;
/// every price selection in the engine goes through this filter.
#[must_use]
pub fn is_positive_finite(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v.is_finite() && v > 0.0)
}

/// An observed market quote for one contract.
///
/// All fields are nullable: a snapshot taken outside trading hours may
/// carry only `close`, an illiquid option may carry only `bid`/`ask`.
/// `spot` is the underlying price at observation time and is populated
/// on option quotes for pricing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Best bid.
    pub bid: Option<f64>,
    /// Best ask.
    pub ask: Option<f64>,
    /// Last trade price.
    pub last: Option<f64>,
    /// Prior session close.
    pub close: Option<f64>,
    /// Underlying spot price at observation time.
    pub spot: Option<f64>,
}

impl Quote {
    /// Best available price: `(bid + ask) / 2` when both sides are
    /// present and positive, else `last`, else `close`.
    #[must_use]
    pub fn mid(&self) -> Option<f64> {
        if is_positive_finite(self.bid) && is_positive_finite(self.ask) {
            return Some(0.5 * (self.bid.unwrap() + self.ask.unwrap()));
        }
        if is_positive_finite(self.last) {
            return self.last;
        }
        if is_positive_finite(self.close) {
            return self.close;
        }
        None
    }

    /// Underlying spot, filtered through the positive-finite check.
    #[must_use]
    pub fn valid_spot(&self) -> Option<f64> {
        if is_positive_finite(self.spot) {
            self.spot
        } else {
            None
        }
    }
}
