//! Pipeline counters
//!
//! The orchestrator only knows the [`MetricsRecorder`] trait. [`PipelineMetrics`]
//! is the in-process recorder used by the CLI; it keeps one atomic counter per
//! [`Counter`] and can be snapshotted at any time.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters incremented by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    /// A file was processed and moved to `processed`
    FileSuccess,
    /// A file exhausted its retries and was moved to `failed`
    FileFailure,
}

impl Counter {
    /// Metric name as exported
    pub fn name(&self) -> &'static str {
        match self {
            Counter::FileSuccess => "files.processed.success",
            Counter::FileFailure => "files.processed.failure",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sink for counter increments
pub trait MetricsRecorder: Send + Sync {
    /// Increment `counter` by one
    fn increment(&self, counter: Counter);
}

/// Point-in-time copy of the pipeline counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub success: u64,
    pub failure: u64,
}

impl MetricsSnapshot {
    /// Files that reached a terminal directory
    pub fn total(&self) -> u64 {
        self.success + self.failure
    }
}

/// Atomic in-process recorder
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    success: AtomicU64,
    failure: AtomicU64,
}

impl PipelineMetrics {
    /// Create a recorder with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current counter values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            success: self.success.load(Ordering::Relaxed),
            failure: self.failure.load(Ordering::Relaxed),
        }
    }
}

impl MetricsRecorder for PipelineMetrics {
    fn increment(&self, counter: Counter) {
        let cell = match counter {
            Counter::FileSuccess => &self.success,
            Counter::FileFailure => &self.failure,
        };
        let value = cell.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(counter = %counter, value = value, "Counter incremented");
    }
}
