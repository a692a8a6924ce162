//! Scoped wall-clock timing for use cases.

use regosql_types::RunMeta;
use std::time::Instant;
use time::OffsetDateTime;

/// Measures one operation from construction to drop.
///
/// Dropping the guard emits a `tracing` event with the elapsed time, so the duration is
/// logged even when the operation returns early with an error.
#[derive(Debug)]
pub struct Stopwatch {
    operation: &'static str,
    started: Instant,
    started_at: OffsetDateTime,
}

impl Stopwatch {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            started: Instant::now(),
            started_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Run metadata as of now. The guard keeps running until dropped.
    pub fn run_meta(&self) -> RunMeta {
        let finished_at = OffsetDateTime::now_utc();
        RunMeta {
            started_at: self.started_at,
            finished_at: finished_at.max(self.started_at),
            duration_ms: self.elapsed_ms(),
        }
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        tracing::info!(
            operation = self.operation,
            elapsed_ms = self.elapsed_ms(),
            "operation finished"
        );
    }
}
