//! Newton-Raphson root-finding.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Newton-Raphson iteration `x_{n+1} = x_n - f(x_n) / f'(x_n)`.
///
/// Quadratic convergence near the root, but diverges when the
/// derivative vanishes; the implied-vol path uses it only where vega is
/// healthy and falls back to [`bisection`](crate::solvers::bisection)
/// otherwise.
///
/// # Errors
///
/// [`MathError::Degenerate`] if `|f'(x)|` drops below 1e-12;
/// [`MathError::ConvergenceFailed`] when the iteration budget runs out.
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
        let fx = f(x);
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let dfx = df(x);
        if dfx.abs() < 1e-12 {
            return Err(MathError::degenerate("newton derivative", dfx));
        }

        let step = fx / dfx;
        x -= step;

        if step.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
            });
        }
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        f(x).abs(),
    ))
}
