//! Error types for pricing operations.

use thiserror::Error;
use vanna_math::MathError;

/// Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors from the pricing model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// A numeric input is outside the model's domain (e.g. spot <= 0).
    #[error("invalid pricing input {name}: {value}")]
    Validation {
        /// Name of the offending input.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// The implied-volatility solve did not converge. The caller
    /// resolves IV and greeks to null; this is never fatal to a cycle.
    #[error("implied vol did not converge after {iterations} iterations (residual {residual})")]
    Convergence {
        /// Iterations performed.
        iterations: u32,
        /// Final price residual.
        residual: f64,
    },
}

impl PricingError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(name: &'static str, value: f64) -> Self {
        Self::Validation { name, value }
    }
}

impl From<MathError> for PricingError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::ConvergenceFailed {
                iterations,
                residual,
            } => Self::Convergence {
                iterations,
                residual,
            },
            // Bracket/degenerate failures in the vol solve also mean
            // "no vol consistent with this price".
            other => Self::Convergence {
                iterations: 0,
                residual: match other {
                    MathError::Degenerate { value, .. } => value,
                    _ => f64::NAN,
                },
            },
        }
    }
}
