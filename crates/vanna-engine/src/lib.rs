//! # Vanna Engine
//!
//! The snapshot loop: on a fixed cadence, pull the current book from
//! the market data source, resolve greeks and betas, aggregate, score
//! risk, and emit one consistent set of newline-delimited JSON records.
//!
//! ## Cycle Shape
//!
//! `IDLE -> FETCHING -> COMPUTING -> WRITING -> IDLE`, one cycle at a
//! time. Every record in a cycle carries the same timestamp; records
//! are fully computed before the first byte is written, and the
//! latest-only target is replaced atomically so a reader never sees a
//! torn snapshot.
//!
//! ## Module Overview
//!
//! - [`config`] - [`EngineConfig`], TOML-loadable with serde defaults
//! - [`cycle`] - One fetch/compute pass producing a record set
//! - [`records`] - [`OutputRecord`], the tagged output union
//! - [`writer`] - Atomic latest-only and append-only NDJSON writers
//! - [`scheduler`] - The interval loop with cooperative shutdown
//! - [`error`] - [`EngineError`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod cycle;
pub mod error;
pub mod records;
pub mod scheduler;
pub mod writer;

pub use config::{BetaSettings, EngineConfig, OutputConfig};
pub use cycle::{run_cycle, CycleContext};
pub use error::{EngineError, EngineResult};
pub use records::OutputRecord;
pub use scheduler::{CycleState, SnapshotScheduler};
pub use writer::SnapshotWriter;
