//! Exercise analytics.
//!
//! Per-option diagnostics surfaced on snapshot records:
//!
//! - probability of expiring in the money
//! - percent spot move required to reach the strike
//! - percent spot move required to double the option's value
//!
//! All return `None` rather than erroring when the inputs cannot
//! support the calculation, matching the nullable-field convention of
//! the output records.

use vanna_core::Right;

use crate::black_scholes::{norm_cdf, PricingInputs};

/// Risk-neutral probability the option expires in the money.
///
/// `N(d2)` for calls, `N(-d2)` for puts. Requires a live option
/// (`T > 0`) and a positive vol; expired or vol-less contracts yield
/// `None`.
#[must_use]
pub fn prob_itm(inputs: &PricingInputs, iv: f64) -> Option<f64> {
    if !inputs.right.is_option() {
        return None;
    }
    let t = inputs.time_to_expiry_years;
    if t <= 0.0 || iv <= 0.0 || !iv.is_finite() {
        return None;
    }
    if inputs.spot <= 0.0 || inputs.strike <= 0.0 {
        return None;
    }

    let spot = inputs.dividend_adjusted_spot();
    let sqrt_t = t.sqrt();
    let d2 = ((spot / inputs.strike).ln() + (inputs.rate - 0.5 * iv * iv) * t) / (iv * sqrt_t);

    Some(match inputs.right {
        Right::Call => norm_cdf(d2),
        Right::Put => norm_cdf(-d2),
        Right::Stock => unreachable!(),
    })
}

/// Percent spot move that would put the option at the money.
///
/// Zero when the option is already in the money: a call needs an
/// upward move only while spot is below the strike, a put a downward
/// move only while spot is above it.
#[must_use]
pub fn pct_move_to_itm(spot: f64, strike: f64, right: Right) -> Option<f64> {
    if !right.is_option() || spot <= 0.0 || strike <= 0.0 {
        return None;
    }
    let raw = (strike - spot) / spot * 100.0;
    Some(match right {
        Right::Call => raw.max(0.0),
        Right::Put => raw.min(0.0),
        Right::Stock => unreachable!(),
    })
}

/// Percent spot move required to double the option's value, from a
/// second-order expansion in delta and gamma.
///
/// Solves `|delta| dS + gamma/2 dS^2 = price` for the favorable move
/// size `dS`, falling back to the first-order estimate when gamma is
/// negligible. The result is signed: positive for calls, negative for
/// puts. `None` when price or both sensitivities are unusable.
#[must_use]
pub fn pct_move_to_double(
    spot: f64,
    right: Right,
    delta: f64,
    gamma: f64,
    price: f64,
) -> Option<f64> {
    if !right.is_option() || spot <= 0.0 {
        return None;
    }
    if !(price.is_finite() && price > 0.0) {
        return None;
    }
    let abs_delta = delta.abs();
    if !abs_delta.is_finite() || !gamma.is_finite() {
        return None;
    }

    let ds = if gamma > 1e-12 {
        let disc = abs_delta * abs_delta + 2.0 * gamma * price;
        (-abs_delta + disc.sqrt()) / gamma
    } else if abs_delta > 1e-12 {
        price / abs_delta
    } else {
        return None;
    };

    let pct = ds / spot * 100.0;
    Some(match right {
        Right::Call => pct,
        Right::Put => -pct,
        Right::Stock => unreachable!(),
    })
}
