//! # Vanna Core
//!
//! Core domain types for the Vanna options risk engine.
//!
//! Everything here is a plain value type, reconstructed fresh every
//! snapshot cycle from the market data adapter's current state. No type
//! in this crate performs I/O or pricing; higher crates
//! (`vanna-pricing`, `vanna-portfolio`, `vanna-engine`) own those
//! concerns.
//!
//! ## Module Overview
//!
//! - [`contract`] - [`Contract`] identity and option [`Right`]
//! - [`quote`] - [`Quote`] with bid/ask/last/close and mid derivation
//! - [`greeks`] - [`GreeksSet`] with nullable fields and a source tag
//! - [`position`] - signed [`Position`] owned by one cycle
//! - [`expiry`] - US-equity option expiry clock math (4pm ET in UTC)
//! - [`error`] - [`CoreError`] validation taxonomy

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod contract;
pub mod error;
pub mod expiry;
pub mod greeks;
pub mod position;
pub mod quote;

pub use contract::{Contract, Right};
pub use error::{CoreError, CoreResult};
pub use expiry::{days_to_expiry, expiry_close_utc, time_to_expiry_years};
pub use greeks::{GreeksSet, GreeksSource};
pub use position::Position;
pub use quote::{is_positive_finite, Quote};
