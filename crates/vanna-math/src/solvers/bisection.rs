//! Bisection root-finding.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Bisection over the bracket `[lo, hi]`.
///
/// Requires `f(lo)` and `f(hi)` to have opposite signs. Converges when
/// either `|f(mid)|` or the bracket width drops below the configured
/// tolerance. Linear but unconditionally convergent, which is why the
/// implied-vol solve prefers it over Newton in the wings where vega is
/// tiny.
///
/// # Errors
///
/// [`MathError::InvalidBracket`] if the endpoints do not straddle a
/// root; [`MathError::ConvergenceFailed`] if the iteration budget runs
/// out (with the tolerances used in this workspace, 100 iterations
/// always suffice for a bracket of width 5).
pub fn bisection<F>(f: F, lo: f64, hi: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut flo = f(lo);
    let fhi = f(hi);

    if flo == 0.0 {
        return Ok(SolverResult {
            root: lo,
            iterations: 0,
            residual: 0.0,
        });
    }
    if fhi == 0.0 {
        return Ok(SolverResult {
            root: hi,
            iterations: 0,
            residual: 0.0,
        });
    }
    if flo.signum() == fhi.signum() {
        return Err(MathError::InvalidBracket { lo, hi });
    }

    for iteration in 1..=config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let fmid = f(mid);

        if fmid.abs() < config.tolerance || (hi - lo) < config.tolerance {
            return Ok(SolverResult {
                root: mid,
                iterations: iteration,
                residual: fmid,
            });
        }

        if fmid.signum() == flo.signum() {
            lo = mid;
            flo = fmid;
        } else {
            hi = mid;
        }
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        f(0.5 * (lo + hi)).abs(),
    ))
}
