//! Root-finding algorithms.
//!
//! Two solvers cover the engine's needs:
//!
//! - [`bisection`]: guaranteed bracketing method, used for the
//!   implied-volatility solve where the price function is monotone in
//!   vol but its derivative (vega) can vanish deep in/out of the money
//! - [`newton_raphson`]: quadratic convergence when a well-behaved
//!   derivative is available
//!
//! # Example: implied vol shape
//!
//! ```rust
//! use vanna_math::solvers::{bisection, SolverConfig};
//!
//! // Toy monotone "price" function of sigma.
//! let f = |sigma: f64| sigma * sigma - 0.09;
//! let result = bisection(f, 1e-6, 5.0, &SolverConfig::default()).unwrap();
//! assert!((result.root - 0.3).abs() < 1e-5);
//! ```

mod bisection;
mod newton;

pub use bisection::bisection;
pub use newton::newton_raphson;

/// Default convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default maximum iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Tolerance for convergence, applied to |f(x)| and bracket width.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
}

/// Outcome of a successful solve.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The located root.
    pub root: f64,
    /// Iterations consumed.
    pub iterations: u32,
    /// Residual `f(root)` at the accepted root.
    pub residual: f64,
}
