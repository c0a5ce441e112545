//! Engine configuration.
//!
//! Every field carries a serde default so a minimal TOML file (or none
//! at all) yields a working configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use vanna_risk::{BetaConfig, RiskThresholds};

use crate::error::{EngineError, EngineResult};

/// Beta resolver settings as configured, converted to [`BetaConfig`]
/// at engine start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaSettings {
    /// Trailing sessions for the regression window.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Minimum aligned samples for a regression estimate.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Vendor beta cache lifetime, seconds.
    #[serde(default = "default_vendor_ttl_secs")]
    pub vendor_ttl_secs: u64,
    /// Return history cache lifetime, seconds.
    #[serde(default = "default_returns_ttl_secs")]
    pub returns_ttl_secs: u64,
}

impl Default for BetaSettings {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            min_samples: default_min_samples(),
            vendor_ttl_secs: default_vendor_ttl_secs(),
            returns_ttl_secs: default_returns_ttl_secs(),
        }
    }
}

impl BetaSettings {
    /// Converts to the resolver's runtime configuration.
    #[must_use]
    pub fn to_beta_config(&self) -> BetaConfig {
        BetaConfig {
            lookback_days: self.lookback_days,
            min_samples: self.min_samples,
            vendor_ttl: Duration::from_secs(self.vendor_ttl_secs),
            returns_ttl: Duration::from_secs(self.returns_ttl_secs),
        }
    }
}

/// Output targets. Both are optional; an engine with neither computes
/// snapshots that go nowhere, which is still useful under test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Latest-only target, atomically replaced every cycle.
    #[serde(default)]
    pub latest_path: Option<PathBuf>,
    /// Append-only history target, one line per record, never
    /// truncated.
    #[serde(default)]
    pub history_path: Option<PathBuf>,
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds between cycle starts.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,
    /// Benchmark symbol for beta weighting.
    #[serde(default = "default_benchmark")]
    pub benchmark: String,
    /// Annualized risk-free rate fed to the pricing model.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Per-symbol annualized dividend yields; symbols absent from the
    /// map price dividend-free.
    #[serde(default)]
    pub dividend_yields: BTreeMap<String, f64>,
    /// Risk flag limits.
    #[serde(default)]
    pub thresholds: RiskThresholds,
    /// Beta resolver settings.
    #[serde(default)]
    pub beta: BetaSettings,
    /// Output targets.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            benchmark: default_benchmark(),
            risk_free_rate: default_risk_free_rate(),
            dividend_yields: BTreeMap::new(),
            thresholds: RiskThresholds::default(),
            beta: BetaSettings::default(),
            output: OutputConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] when the file is unreadable or does not
    /// parse.
    pub fn from_toml_file(path: &Path) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&raw).map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))
    }

    /// Cycle interval as a [`Duration`].
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs.max(0.01))
    }
}

fn default_interval_secs() -> f64 {
    2.0
}

fn default_benchmark() -> String {
    "SPY".to_string()
}

fn default_risk_free_rate() -> f64 {
    0.05
}

fn default_lookback_days() -> u32 {
    252
}

fn default_min_samples() -> usize {
    30
}

fn default_vendor_ttl_secs() -> u64 {
    24 * 3600
}

fn default_returns_ttl_secs() -> u64 {
    3600
}
