//! Closed-form Black-Scholes price and greeks.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use vanna_core::{GreeksSet, GreeksSource, Right};

use crate::error::{PricingError, PricingResult};

static STANDARD_NORMAL: Lazy<Normal> =
    Lazy::new(|| Normal::new(0.0, 1.0).expect("standard normal parameters are valid"));

/// Standard normal CDF.
#[must_use]
pub(crate) fn norm_cdf(x: f64) -> f64 {
    STANDARD_NORMAL.cdf(x)
}

/// Standard normal PDF.
#[must_use]
pub(crate) fn norm_pdf(x: f64) -> f64 {
    STANDARD_NORMAL.pdf(x)
}

/// Calendar days per year used for the theta day-count.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Market inputs to the pricing model, excluding volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
    /// Underlying spot price.
    pub spot: f64,
    /// Option strike.
    pub strike: f64,
    /// Time to expiry in years of 365.25 days; `<= 0` means expired.
    pub time_to_expiry_years: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Continuous dividend yield; when present the spot is discounted
    /// by the present value of dividends (`S·e^{-qT}`) before
    /// evaluation.
    pub dividend_yield: Option<f64>,
    /// Call or put.
    pub right: Right,
}

impl PricingInputs {
    fn validate(&self) -> PricingResult<()> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(PricingError::validation("spot", self.spot));
        }
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(PricingError::validation("strike", self.strike));
        }
        Ok(())
    }

    /// Spot adjusted for the present value of dividends over the
    /// remaining life.
    #[must_use]
    pub(crate) fn dividend_adjusted_spot(&self) -> f64 {
        match self.dividend_yield {
            Some(q) if self.time_to_expiry_years > 0.0 => {
                self.spot * (-q * self.time_to_expiry_years).exp()
            }
            _ => self.spot,
        }
    }
}

/// Full model output for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsGreeks {
    /// Theoretical value per underlying unit.
    pub price: f64,
    /// Delta per underlying unit.
    pub delta: f64,
    /// Gamma per underlying unit.
    pub gamma: f64,
    /// Vega per 1 vol point.
    pub vega: f64,
    /// Theta per calendar day.
    pub theta: f64,
    /// The volatility the evaluation used.
    pub iv: f64,
}

impl BsGreeks {
    /// Converts to a model-sourced [`GreeksSet`].
    #[must_use]
    pub fn to_greeks_set(&self) -> GreeksSet {
        GreeksSet {
            iv: if self.iv > 0.0 { Some(self.iv) } else { None },
            delta: Some(self.delta),
            gamma: Some(self.gamma),
            vega: Some(self.vega),
            theta: Some(self.theta),
            source: GreeksSource::Model,
        }
    }
}

/// Evaluates the Black-Scholes model at a known volatility.
///
/// An expired or degenerate evaluation (`T <= 0` or `iv <= 0`) returns
/// intrinsic value with `delta = ±1/0` by moneyness and zero
/// gamma/vega/theta; it is not an error.
///
/// # Errors
///
/// [`PricingError::Validation`] for non-positive spot or strike, or a
/// stock right.
pub fn black_scholes(inputs: &PricingInputs, iv: f64) -> PricingResult<BsGreeks> {
    if !inputs.right.is_option() {
        return Err(PricingError::validation("right", f64::NAN));
    }
    inputs.validate()?;

    let t = inputs.time_to_expiry_years;
    if t <= 0.0 || iv <= 0.0 {
        return Ok(intrinsic(inputs, iv));
    }

    let s = inputs.dividend_adjusted_spot();
    let k = inputs.strike;
    let r = inputs.rate;
    let sqrt_t = t.sqrt();

    let d1 = ((s / k).ln() + (r + 0.5 * iv * iv) * t) / (iv * sqrt_t);
    let d2 = d1 - iv * sqrt_t;
    let discount = (-r * t).exp();

    let (delta, theta_annual, price) = if inputs.right.is_call() {
        let theta =
            -s * norm_pdf(d1) * iv / (2.0 * sqrt_t) - r * k * discount * norm_cdf(d2);
        (
            norm_cdf(d1),
            theta,
            s * norm_cdf(d1) - k * discount * norm_cdf(d2),
        )
    } else {
        let theta =
            -s * norm_pdf(d1) * iv / (2.0 * sqrt_t) + r * k * discount * norm_cdf(-d2);
        (
            -norm_cdf(-d1),
            theta,
            k * discount * norm_cdf(-d2) - s * norm_cdf(-d1),
        )
    };

    Ok(BsGreeks {
        price,
        delta,
        gamma: norm_pdf(d1) / (s * iv * sqrt_t),
        // Per 1 vol point (0.01 of annualized vol).
        vega: s * norm_pdf(d1) * sqrt_t / 100.0,
        theta: theta_annual / DAYS_PER_YEAR,
        iv,
    })
}

/// Intrinsic-value regime for expired or zero-vol evaluations.
fn intrinsic(inputs: &PricingInputs, iv: f64) -> BsGreeks {
    let s = inputs.spot;
    let k = inputs.strike;
    let (price, delta) = if inputs.right.is_call() {
        ((s - k).max(0.0), if s > k { 1.0 } else { 0.0 })
    } else {
        ((k - s).max(0.0), if s < k { -1.0 } else { 0.0 })
    };
    BsGreeks {
        price,
        delta,
        gamma: 0.0,
        vega: 0.0,
        theta: 0.0,
        iv: iv.max(0.0),
    }
}
