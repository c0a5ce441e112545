//! # Vanna Risk
//!
//! Risk analytics over an aggregated options book.
//!
//! ## Module Overview
//!
//! - [`beta`] - [`BetaResolver`]: vendor fundamental beta with an OLS
//!   regression fallback, cached per symbol with TTL invalidation
//! - [`assessment`] - Concentration scoring and risk flags
//! - [`stress`] - Deterministic stress scenarios via full model
//!   revaluation at shocked inputs
//!
//! The assessment and stress layers are pure projections: they read an
//! aggregated snapshot and never mutate it. The beta resolver is the
//! one stateful component, owning the process-lifetime history cache.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assessment;
pub mod beta;
pub mod stress;

pub use assessment::{assess, RiskAssessment, RiskFlag, RiskThresholds};
pub use beta::{BetaConfig, BetaResolver};
pub use stress::{run_scenarios, ScenarioId, ScenarioResult};
