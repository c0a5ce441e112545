//! # Vanna Math
//!
//! Numerical utilities for the Vanna options risk engine:
//!
//! - [`solvers`] - bracketing and Newton root-finders used by the
//!   implied-volatility solve
//! - [`regression`] - ordinary-least-squares beta over pairwise-aligned
//!   return series
//!
//! The crate carries no domain types; it works on plain `f64` so the
//! pricing and risk crates can drive it with closures.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod regression;
pub mod solvers;

pub use error::{MathError, MathResult};
