//! The snapshot loop.
//!
//! Fixed-interval ticks drive one cycle at a time through
//! `IDLE -> FETCHING/COMPUTING -> WRITING -> IDLE`. A failed cycle
//! logs and returns to idle for the next tick; shutdown is cooperative
//! and never leaves a torn snapshot, because writing only starts once
//! a cycle's records are fully computed.

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{info, warn};

use crate::cycle::{run_cycle, CycleContext};
use crate::error::EngineError;
use crate::writer::SnapshotWriter;

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Waiting for the next tick.
    Idle,
    /// Pulling positions and market data.
    Fetching,
    /// Aggregating and scoring.
    Computing,
    /// Emitting the record set.
    Writing,
}

/// Drives cycles on a fixed cadence until shut down.
pub struct SnapshotScheduler {
    ctx: CycleContext,
    writer: SnapshotWriter,
    state: CycleState,
}

impl SnapshotScheduler {
    /// Creates a scheduler over a cycle context.
    #[must_use]
    pub fn new(ctx: CycleContext) -> Self {
        let writer = SnapshotWriter::new(&ctx.config.output);
        Self {
            ctx,
            writer,
            state: CycleState::Idle,
        }
    }

    /// Current loop state.
    #[must_use]
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Runs the loop until `shutdown` flips to `true` or its sender is
    /// dropped.
    ///
    /// An in-flight cycle interrupted by shutdown is abandoned before
    /// its write starts, so the last persisted snapshot stays complete.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.ctx.config.interval());
        info!(
            interval_secs = self.ctx.config.interval_secs,
            benchmark = %self.ctx.config.benchmark,
            "snapshot loop started"
        );

        loop {
            self.state = CycleState::Idle;
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    // A dropped sender means nobody can ask us to stop;
                    // treat it as shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            self.state = CycleState::Fetching;
            let records = tokio::select! {
                r = run_cycle(&self.ctx, Utc::now()) => r,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("shutdown during cycle, abandoning without write");
                        break;
                    }
                    continue;
                }
            };
            self.state = CycleState::Computing;

            let records = match records {
                Ok(records) => records,
                Err(EngineError::NoPositions) => {
                    info!("empty book, cycle skipped");
                    continue;
                }
                Err(err) => {
                    warn!("cycle failed: {err}");
                    continue;
                }
            };

            self.state = CycleState::Writing;
            if let Err(err) = self.writer.write_cycle(&records) {
                warn!("snapshot write failed: {err}");
            }
        }

        self.state = CycleState::Idle;
        info!("snapshot loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;
    use vanna_core::{Contract, Position, Quote, Right};
    use vanna_risk::{BetaConfig, BetaResolver};
    use vanna_traits::{MarketDataSource, StaticMarketData};

    use crate::config::{EngineConfig, OutputConfig};

    fn seeded_context(output: OutputConfig, interval_secs: f64) -> CycleContext {
        let src = StaticMarketData::new();
        let call = Contract::option(
            "NVDA",
            NaiveDate::from_ymd_opt(2099, 6, 18).unwrap(),
            Right::Call,
            160.0,
            1,
        );
        src.set_position(Position::new("U100", call.clone(), 1.0, 10.0));
        src.set_quote(
            &call,
            Quote {
                bid: Some(14.0),
                ask: Some(14.4),
                last: None,
                close: None,
                spot: Some(160.0),
            },
        );

        let source: Arc<dyn MarketDataSource> = Arc::new(src);
        CycleContext {
            beta: BetaResolver::new(source.clone(), BetaConfig::default()),
            source,
            config: EngineConfig {
                interval_secs,
                output,
                ..EngineConfig::default()
            },
        }
    }

    #[tokio::test]
    async fn test_loop_writes_and_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let latest = dir.path().join("latest.ndjson");
        let ctx = seeded_context(
            OutputConfig {
                latest_path: Some(latest.clone()),
                history_path: None,
            },
            0.01,
        );

        let (tx, rx) = watch::channel(false);
        let mut scheduler = SnapshotScheduler::new(ctx);
        let handle = tokio::spawn(async move {
            scheduler.run(rx).await;
            scheduler
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(true).unwrap();
        let scheduler = handle.await.unwrap();

        assert_eq!(scheduler.state(), CycleState::Idle);
        let contents = std::fs::read_to_string(&latest).unwrap();
        assert!(!contents.is_empty());
        for line in contents.lines() {
            serde_json::from_str::<crate::records::OutputRecord>(line).unwrap();
        }
    }

    #[tokio::test]
    async fn test_shutdown_before_first_tick() {
        let ctx = seeded_context(OutputConfig::default(), 60.0);
        let (tx, rx) = watch::channel(false);
        let mut scheduler = SnapshotScheduler::new(ctx);

        tx.send(true).unwrap();
        // First tick of a tokio interval fires immediately, so one
        // cycle may complete; the loop must still exit promptly.
        tokio::time::timeout(Duration::from_secs(5), scheduler.run(rx))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_sender_stops_loop() {
        let ctx = seeded_context(OutputConfig::default(), 60.0);
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let mut scheduler = SnapshotScheduler::new(ctx);

        // With no sender left the loop cannot be signalled; it must
        // exit instead of spinning on the closed channel.
        tokio::time::timeout(Duration::from_secs(5), scheduler.run(rx))
            .await
            .unwrap();
        assert_eq!(scheduler.state(), CycleState::Idle);
    }
}
