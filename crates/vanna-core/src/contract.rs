//! Contract identity.
//!
//! A [`Contract`] identifies one tradable instrument: a stock, or an
//! option on a stock. Contracts are immutable once observed in a cycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The right conveyed by a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Right {
    /// Call option.
    #[serde(rename = "C")]
    Call,
    /// Put option.
    #[serde(rename = "P")]
    Put,
    /// Plain stock (or ETF) position.
    #[serde(rename = "STK")]
    Stock,
}

impl Right {
    /// True for calls and puts.
    #[must_use]
    pub fn is_option(self) -> bool {
        matches!(self, Self::Call | Self::Put)
    }

    /// True for calls.
    #[must_use]
    pub fn is_call(self) -> bool {
        matches!(self, Self::Call)
    }
}

/// Identity of one tradable instrument.
///
/// An option's underlying is its root `symbol`, independent of
/// expiry/strike; stock contracts carry `strike = 0`, `multiplier = 1`
/// and no expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Underlying root symbol (e.g. "NVDA").
    pub symbol: String,
    /// Option expiry calendar date; `None` for stock.
    pub expiry: Option<NaiveDate>,
    /// Right conveyed.
    pub right: Right,
    /// Option strike price; 0 for stock.
    pub strike: f64,
    /// Contract multiplier (100 for US equity options, 1 for stock).
    pub multiplier: f64,
    /// Vendor contract id, opaque to the engine.
    pub con_id: i64,
}

impl Contract {
    /// Creates a stock contract.
    pub fn stock(symbol: impl Into<String>, con_id: i64) -> Self {
        Self {
            symbol: symbol.into(),
            expiry: None,
            right: Right::Stock,
            strike: 0.0,
            multiplier: 1.0,
            con_id,
        }
    }

    /// Creates an option contract with the standard 100x multiplier.
    pub fn option(
        symbol: impl Into<String>,
        expiry: NaiveDate,
        right: Right,
        strike: f64,
        con_id: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            expiry: Some(expiry),
            right,
            strike,
            multiplier: 100.0,
            con_id,
        }
    }

    /// True when this contract is an option.
    #[must_use]
    pub fn is_option(&self) -> bool {
        self.right.is_option()
    }

    /// Checks the structural invariants of the contract.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a negative strike or
    /// non-positive multiplier, and [`CoreError::InvalidContract`] for
    /// an option without an expiry date.
    pub fn validate(&self) -> CoreResult<()> {
        if self.strike < 0.0 || !self.strike.is_finite() {
            return Err(CoreError::validation("strike", self.strike));
        }
        if self.multiplier <= 0.0 || !self.multiplier.is_finite() {
            return Err(CoreError::validation("multiplier", self.multiplier));
        }
        if self.is_option() && self.expiry.is_none() {
            return Err(CoreError::invalid_contract(
                &self.symbol,
                "option without expiry date",
            ));
        }
        Ok(())
    }
}
