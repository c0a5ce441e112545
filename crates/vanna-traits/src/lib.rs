//! # Vanna Traits
//!
//! Trait definitions for the Vanna risk engine.
//!
//! The engine is wired to market data via dependency injection: the
//! snapshot cycle holds an `Arc<dyn MarketDataSource>` and never knows
//! whether positions and quotes come from a broker gateway, a file
//! replay, or the in-memory source used by tests.
//!
//! ## Module Structure
//!
//! - [`market_data`]: The [`MarketDataSource`] trait (positions,
//!   quotes, vendor greeks, return history, fundamental betas)
//! - [`memory`]: [`StaticMarketData`], a concurrent in-memory source
//!   for tests and offline replay
//! - [`error`]: [`SourceError`], the common failure type for sources

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod market_data;
pub mod memory;

pub use error::{SourceError, SourceResult};
pub use market_data::{MarketDataSource, ReturnSeries};
pub use memory::StaticMarketData;
