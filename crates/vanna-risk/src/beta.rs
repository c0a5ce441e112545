//! Beta resolution with caching.
//!
//! Resolution order per symbol:
//!
//! 1. vendor fundamental beta, cached for 24 hours by default
//! 2. OLS regression of the symbol's daily returns on the benchmark's
//!    over a trailing lookback window
//!
//! Both paths fail soft: connectivity errors, short histories and a
//! flat benchmark all resolve to `None`, logged against the symbol.
//! The symbol is then excluded from beta-weighted totals while staying
//! in every raw total.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use log::{debug, warn};

use vanna_math::regression::{align_by_key, ols_beta};
use vanna_traits::{MarketDataSource, ReturnSeries};

/// Tuning for the beta resolver.
#[derive(Debug, Clone)]
pub struct BetaConfig {
    /// Trailing sessions fetched for the regression.
    pub lookback_days: u32,
    /// Minimum aligned pairs required for a regression estimate.
    pub min_samples: usize,
    /// How long a vendor beta lookup (hit or miss) stays cached.
    pub vendor_ttl: Duration,
    /// How long a fetched return series stays cached.
    pub returns_ttl: Duration,
}

impl Default for BetaConfig {
    fn default() -> Self {
        Self {
            lookback_days: 252,
            min_samples: 30,
            vendor_ttl: Duration::from_secs(24 * 3600),
            returns_ttl: Duration::from_secs(3600),
        }
    }
}

struct CachedBeta {
    beta: Option<f64>,
    fetched_at: Instant,
}

struct CachedReturns {
    series: ReturnSeries,
    fetched_at: Instant,
}

/// Resolves per-symbol betas against the configured benchmark.
///
/// Owns the process-lifetime history cache; both caches are keyed by
/// symbol and invalidated by TTL, never explicitly.
pub struct BetaResolver {
    source: Arc<dyn MarketDataSource>,
    config: BetaConfig,
    vendor_cache: DashMap<String, CachedBeta>,
    returns_cache: DashMap<String, CachedReturns>,
}

impl BetaResolver {
    /// Creates a resolver over the given source.
    pub fn new(source: Arc<dyn MarketDataSource>, config: BetaConfig) -> Self {
        Self {
            source,
            config,
            vendor_cache: DashMap::new(),
            returns_cache: DashMap::new(),
        }
    }

    /// Resolves the beta of `symbol` against `benchmark`, or `None`
    /// when no usable estimate exists this cycle.
    pub async fn resolve(&self, symbol: &str, benchmark: &str) -> Option<f64> {
        if symbol == benchmark {
            return Some(1.0);
        }
        if let Some(beta) = self.vendor_beta(symbol).await {
            return Some(beta);
        }
        self.regression_beta(symbol, benchmark).await
    }

    async fn vendor_beta(&self, symbol: &str) -> Option<f64> {
        if let Some(cached) = self.vendor_cache.get(symbol) {
            if cached.fetched_at.elapsed() < self.config.vendor_ttl {
                return cached.beta;
            }
        }

        let beta = match self.source.fundamental_beta(symbol).await {
            Ok(beta) => beta,
            Err(err) => {
                warn!("{symbol}: vendor beta lookup failed: {err}");
                return None;
            }
        };

        // A vendor miss is cached too, so a symbol without coverage is
        // not re-queried every cycle.
        self.vendor_cache.insert(
            symbol.to_string(),
            CachedBeta {
                beta,
                fetched_at: Instant::now(),
            },
        );
        beta
    }

    async fn regression_beta(&self, symbol: &str, benchmark: &str) -> Option<f64> {
        let sym_returns = self.returns(symbol).await?;
        let bench_returns = self.returns(benchmark).await?;

        let pairs = align_by_key(sym_returns.points, bench_returns.points);
        match ols_beta(&pairs, self.config.min_samples) {
            Ok(beta) => {
                debug!("{symbol}: regression beta {beta:.3} from {} pairs", pairs.len());
                Some(beta)
            }
            Err(err) => {
                warn!("{symbol}: beta regression unavailable: {err}");
                None
            }
        }
    }

    async fn returns(&self, symbol: &str) -> Option<ReturnSeries> {
        if let Some(cached) = self.returns_cache.get(symbol) {
            if cached.fetched_at.elapsed() < self.config.returns_ttl {
                return Some(cached.series.clone());
            }
        }

        match self
            .source
            .daily_returns(symbol, self.config.lookback_days)
            .await
        {
            Ok(series) => {
                self.returns_cache.insert(
                    symbol.to_string(),
                    CachedReturns {
                        series: series.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                Some(series)
            }
            Err(err) => {
                warn!("{symbol}: return history fetch failed: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use vanna_traits::StaticMarketData;

    fn series(symbol: &str, scale: f64, n: u32) -> ReturnSeries {
        let points = (0..n)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
                    + chrono::Days::new(u64::from(i));
                let bench = 0.01 * f64::from(i % 7) - 0.03;
                (date, scale * bench)
            })
            .collect();
        ReturnSeries::new(symbol, points)
    }

    fn resolver(src: StaticMarketData) -> BetaResolver {
        BetaResolver::new(Arc::new(src), BetaConfig::default())
    }

    #[tokio::test]
    async fn test_benchmark_beta_is_one() {
        let r = resolver(StaticMarketData::new());
        assert_eq!(r.resolve("SPY", "SPY").await, Some(1.0));
    }

    #[tokio::test]
    async fn test_vendor_beta_preferred() {
        let src = StaticMarketData::new();
        src.set_fundamental_beta("NVDA", 1.8);
        src.set_returns(series("NVDA", 3.0, 60));
        src.set_returns(series("SPY", 1.0, 60));

        let r = resolver(src);
        assert_eq!(r.resolve("NVDA", "SPY").await, Some(1.8));
    }

    #[tokio::test]
    async fn test_regression_fallback_recovers_slope() {
        let src = StaticMarketData::new();
        src.set_returns(series("NVDA", 2.0, 60));
        src.set_returns(series("SPY", 1.0, 60));

        let r = resolver(src);
        let beta = r.resolve("NVDA", "SPY").await.unwrap();
        assert_relative_eq!(beta, 2.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn test_short_history_resolves_to_none() {
        let src = StaticMarketData::new();
        src.set_returns(series("NVDA", 2.0, 10));
        src.set_returns(series("SPY", 1.0, 10));

        let r = resolver(src);
        assert_eq!(r.resolve("NVDA", "SPY").await, None);
    }

    #[tokio::test]
    async fn test_flat_benchmark_resolves_to_none() {
        let src = StaticMarketData::new();
        src.set_returns(series("NVDA", 2.0, 60));
        let flat = ReturnSeries::new(
            "SPY",
            (0..60u32)
                .map(|i| {
                    let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
                        + chrono::Days::new(u64::from(i));
                    (date, 0.0)
                })
                .collect(),
        );
        src.set_returns(flat);

        let r = resolver(src);
        assert_eq!(r.resolve("NVDA", "SPY").await, None);
    }

    #[tokio::test]
    async fn test_vendor_miss_cached() {
        let src = StaticMarketData::new();
        src.set_returns(series("NVDA", 2.0, 60));
        src.set_returns(series("SPY", 1.0, 60));

        let r = resolver(src);
        // First resolve caches the vendor miss and falls back.
        assert!(r.resolve("NVDA", "SPY").await.is_some());
        assert!(r.vendor_cache.contains_key("NVDA"));
        assert_eq!(r.vendor_cache.get("NVDA").unwrap().beta, None);
    }
}
