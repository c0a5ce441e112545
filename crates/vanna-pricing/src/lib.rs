//! # Vanna Pricing
//!
//! Black-Scholes pricing model for the Vanna options risk engine.
//!
//! Given `(spot, strike, time to expiry, rate, right)` plus either an
//! implied volatility or a market price, this crate produces a
//! [`vanna_core::GreeksSet`]:
//!
//! - [`black_scholes`](black_scholes::black_scholes) - closed-form
//!   price and greeks for a known vol
//! - [`implied_vol`](implied_vol::implied_vol) - bisection solve of vol
//!   from an observed price over the no-arbitrage bracket
//! - [`fill_greeks`](fill::fill_greeks) - per-field vendor/model merge:
//!   vendor fields are never overwritten, null fields are filled
//!   independently, and a failed solve degrades to null (never panics
//!   a cycle)
//! - [`exercise`] - probability-of-ITM and move-to-target analytics
//!   surfaced on option records
//!
//! ## Conventions
//!
//! Vega is quoted per 1 implied-vol point; theta per *calendar* day
//! (annual theta / 365). The same conventions hold in the stress
//! revaluation path, so scenario deltas are comparable to baseline.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod black_scholes;
pub mod error;
pub mod exercise;
pub mod fill;
pub mod implied_vol;

pub use black_scholes::{black_scholes, BsGreeks, PricingInputs};
pub use error::{PricingError, PricingResult};
pub use exercise::{pct_move_to_double, pct_move_to_itm, prob_itm};
pub use fill::fill_greeks;
pub use implied_vol::{implied_vol, IV_MAX, IV_MIN};
