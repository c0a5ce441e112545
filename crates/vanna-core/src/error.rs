//! Error types for core domain validation.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while validating domain values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A numeric input is outside its valid domain.
    #[error("invalid {name}: {value}")]
    Validation {
        /// Name of the offending field.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// A contract is structurally inconsistent (e.g. an option without
    /// an expiry date).
    #[error("invalid contract '{symbol}': {reason}")]
    InvalidContract {
        /// Underlying symbol of the contract.
        symbol: String,
        /// Why the contract is invalid.
        reason: String,
    },
}

impl CoreError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(name: &'static str, value: f64) -> Self {
        Self::Validation { name, value }
    }

    /// Creates an invalid contract error.
    pub fn invalid_contract(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidContract {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}
