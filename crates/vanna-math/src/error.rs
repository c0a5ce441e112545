//! Error types for numerical routines.

use thiserror::Error;

/// Result type for math operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors from solvers and regression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// An iterative solver exhausted its iteration budget.
    #[error("convergence failed after {iterations} iterations (residual {residual})")]
    ConvergenceFailed {
        /// Iterations performed.
        iterations: u32,
        /// Final residual magnitude.
        residual: f64,
    },

    /// A bracketing solver was given bounds that do not straddle a root.
    #[error("invalid bracket [{lo}, {hi}]: f has the same sign at both ends")]
    InvalidBracket {
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
    },

    /// A derivative or variance in a denominator is effectively zero.
    #[error("degenerate denominator in {context}: {value}")]
    Degenerate {
        /// What was being computed.
        context: &'static str,
        /// The near-zero value.
        value: f64,
    },

    /// Too few samples for a statistical estimate.
    #[error("insufficient data: {actual} samples, {required} required")]
    InsufficientData {
        /// Minimum sample count required.
        required: usize,
        /// Samples actually available.
        actual: usize,
    },
}

impl MathError {
    /// Creates a convergence failure.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates a degenerate-denominator error.
    #[must_use]
    pub fn degenerate(context: &'static str, value: f64) -> Self {
        Self::Degenerate { context, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::convergence_failed(100, 1e-3);
        assert!(err.to_string().contains("100"));

        let err = MathError::InsufficientData {
            required: 30,
            actual: 12,
        };
        assert!(err.to_string().contains("30"));
        assert!(err.to_string().contains("12"));
    }
}
