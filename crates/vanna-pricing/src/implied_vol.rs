//! Implied volatility from an observed market price.

use vanna_core::is_positive_finite;
use vanna_math::solvers::{bisection, newton_raphson, SolverConfig};

use crate::black_scholes::{black_scholes, PricingInputs};
use crate::error::{PricingError, PricingResult};

/// Lower bound of the vol search bracket.
pub const IV_MIN: f64 = 1e-6;

/// Upper bound of the vol search bracket (500% annualized).
pub const IV_MAX: f64 = 5.0;

/// Absolute price tolerance for the solve.
const PRICE_TOLERANCE: f64 = 1e-6;

/// Starting vol for the Newton attempt.
const NEWTON_SEED: f64 = 0.3;

/// Iteration budget; a bisection over `[1e-6, 5]` reaches the price
/// tolerance well inside this.
const MAX_ITERATIONS: u32 = 100;

/// Solves for the volatility that reprices `market_price`.
///
/// Newton-Raphson on the analytic vega first; when vega is too small to
/// drive the iteration (deep in/out of the money) or the iterate leaves
/// the bracket, falls back to bisection over `[IV_MIN, IV_MAX]`. The
/// option price is monotone in vol so the bracket is valid whenever the
/// target lies in the achievable range. Targets at or outside the range
/// clamp to the nearest bound rather than failing, matching upstream
/// feed behavior for deep in/out-of-the-money quotes.
///
/// # Errors
///
/// [`PricingError::Validation`] for non-positive inputs;
/// [`PricingError::Convergence`] when the solve exhausts its iteration
/// budget. Callers resolve a convergence failure to null IV and null
/// greeks; it never aborts a cycle.
pub fn implied_vol(inputs: &PricingInputs, market_price: f64) -> PricingResult<f64> {
    if !is_positive_finite(Some(market_price)) {
        return Err(PricingError::validation("market_price", market_price));
    }
    if inputs.time_to_expiry_years <= 0.0 {
        return Err(PricingError::validation(
            "time_to_expiry_years",
            inputs.time_to_expiry_years,
        ));
    }

    let price_at = |sigma: f64| -> PricingResult<f64> {
        Ok(black_scholes(inputs, sigma)?.price)
    };

    let p_lo = price_at(IV_MIN)?;
    let p_hi = price_at(IV_MAX)?;

    // Clamp targets outside the achievable range.
    if market_price <= p_lo {
        return Ok(IV_MIN);
    }
    if market_price >= p_hi {
        return Ok(IV_MAX);
    }

    let objective = |sigma: f64| match black_scholes(inputs, sigma) {
        Ok(g) => g.price - market_price,
        // Unreachable for sigma within the bracket; keep the sign of
        // the low end so bisection stays well-defined.
        Err(_) => p_lo - market_price,
    };
    // Raw dprice/dsigma; `BsGreeks::vega` is quoted per vol point.
    let vega = |sigma: f64| match black_scholes(inputs, sigma) {
        Ok(g) => g.vega * 100.0,
        Err(_) => 0.0,
    };

    let config = SolverConfig::new(PRICE_TOLERANCE, MAX_ITERATIONS);
    if let Ok(result) = newton_raphson(&objective, vega, NEWTON_SEED, &config) {
        if (IV_MIN..=IV_MAX).contains(&result.root) {
            return Ok(result.root);
        }
    }

    let result = bisection(objective, IV_MIN, IV_MAX, &config)?;
    Ok(result.root)
}
