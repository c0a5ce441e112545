//! # Vanna Portfolio
//!
//! Exposure aggregation for options books.
//!
//! Rolls per-position greeks up the position -> underlying -> portfolio
//! hierarchy. All functions are pure: the caller supplies positions
//! with their resolved quotes and greeks, aggregation returns fresh
//! value types and mutates nothing.
//!
//! ## Aggregation Invariants
//!
//! - The portfolio's raw delta equals the sum of per-underlying net
//!   delta shares exactly (no position counted twice or dropped).
//! - For every underlying with a resolved beta, the beta-weighted
//!   dollar delta equals `beta * dollar_delta`.
//! - A position whose greeks could not be resolved is excluded from
//!   every total but still visible to the caller, so the exclusion is
//!   auditable rather than silent.
//!
//! ## Module Overview
//!
//! - [`types`] - [`PositionExposure`], the per-position input joining a
//!   position to its spot, greeks and option price
//! - [`aggregate`] - Underlying and portfolio rollups
//! - [`buckets`] - Long/short dollar-delta buckets and book composition
//! - [`error`] - [`PortfolioError`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod buckets;
pub mod error;
pub mod types;

pub use aggregate::{aggregate, PortfolioSnapshot, UnderlyingAggregate};
pub use buckets::{Composition, LongShort};
pub use error::{PortfolioError, PortfolioResult};
pub use types::PositionExposure;
