//! Snapshot output.
//!
//! Two targets, both newline-delimited JSON:
//!
//! - **latest-only**: the full record set is serialized to a sibling
//!   temporary file and renamed over the target, so a concurrent
//!   reader sees either the previous complete snapshot or the new one,
//!   never a torn file
//! - **append**: one write per cycle onto an unbounded history, never
//!   rewritten
//!
//! Serialization happens fully in memory before the first byte touches
//! disk; a record that fails to serialize aborts the write with the
//! previous snapshot intact.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::OutputConfig;
use crate::error::EngineResult;
use crate::records::OutputRecord;

/// Writes one cycle's records to the configured targets.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    latest_path: Option<PathBuf>,
    history_path: Option<PathBuf>,
}

impl SnapshotWriter {
    /// Creates a writer over the configured targets.
    #[must_use]
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            latest_path: output.latest_path.clone(),
            history_path: output.history_path.clone(),
        }
    }

    /// Writes one complete cycle.
    ///
    /// # Errors
    ///
    /// Serialization or I/O failures; on failure the latest-only target
    /// still holds the previous complete snapshot.
    pub fn write_cycle(&self, records: &[OutputRecord]) -> EngineResult<()> {
        let mut buf = String::new();
        for r in records {
            buf.push_str(&serde_json::to_string(r)?);
            buf.push('\n');
        }

        if let Some(path) = &self.latest_path {
            replace_atomically(path, &buf)?;
            debug!(path = %path.display(), records = records.len(), "latest snapshot replaced");
        }
        if let Some(path) = &self.history_path {
            let mut f = OpenOptions::new().create(true).append(true).open(path)?;
            f.write_all(buf.as_bytes())?;
            debug!(path = %path.display(), records = records.len(), "history appended");
        }
        Ok(())
    }
}

fn replace_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(contents.as_bytes())?;
        f.sync_all()?;
    }
    fs::rename(&tmp, path)
}
