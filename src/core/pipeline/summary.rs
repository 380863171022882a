//! Run summary and reporting

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Where a file ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Converted and moved to `processed/`
    Processed {
        /// Lines written to the output file
        lines: usize,
    },
    /// Retries exhausted, moved to `failed/`
    Failed,
    /// Retries exhausted and the move to `failed/` also failed; the file was
    /// left in the input directory
    Stranded,
}

/// Result of handling one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub filename: String,
    pub attempts: usize,
    pub outcome: FileOutcome,
    /// Last error seen, for files that did not succeed
    pub error: Option<String>,
}

/// Summary of one pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Files found in the input directory
    pub discovered_files: usize,

    /// Files moved to `processed/`
    pub processed_files: usize,

    /// Files moved to `failed/`
    pub failed_files: usize,

    /// Files that could not be moved anywhere
    pub stranded_files: Vec<String>,

    /// Output lines written across all processed files
    pub records_written: usize,

    /// Whether the shutdown timeout expired before every worker finished
    pub timed_out: bool,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Failed and stranded files with their last error
    pub errors: Vec<FileReport>,
}

impl RunSummary {
    /// Create an empty summary for `discovered_files` files
    pub fn new(discovered_files: usize) -> Self {
        Self {
            started_at: Utc::now(),
            discovered_files,
            processed_files: 0,
            failed_files: 0,
            stranded_files: Vec::new(),
            records_written: 0,
            timed_out: false,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Fold one file report into the totals
    pub fn record(&mut self, report: FileReport) {
        match report.outcome {
            FileOutcome::Processed { lines } => {
                self.processed_files += 1;
                self.records_written += lines;
            }
            FileOutcome::Failed => {
                self.failed_files += 1;
                self.errors.push(report);
            }
            FileOutcome::Stranded => {
                self.stranded_files.push(report.filename.clone());
                self.errors.push(report);
            }
        }
    }

    /// Files with a reported outcome
    pub fn completed_files(&self) -> usize {
        self.processed_files + self.failed_files + self.stranded_files.len()
    }

    /// Files without a reported outcome (aborted at shutdown)
    pub fn unfinished_files(&self) -> usize {
        self.discovered_files.saturating_sub(self.completed_files())
    }

    /// Check if every discovered file was processed
    pub fn is_successful(&self) -> bool {
        self.processed_files == self.discovered_files
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.discovered_files == 0 {
            return 100.0;
        }
        (self.processed_files as f64 / self.discovered_files as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            discovered = self.discovered_files,
            processed = self.processed_files,
            failed = self.failed_files,
            stranded = self.stranded_files.len(),
            unfinished = self.unfinished_files(),
            records_written = self.records_written,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Run completed"
        );

        for report in &self.errors {
            tracing::warn!(
                filename = %report.filename,
                attempts = report.attempts,
                outcome = ?report.outcome,
                error = report.error.as_deref().unwrap_or("unknown"),
                "File did not succeed"
            );
        }

        if self.timed_out {
            tracing::warn!(
                unfinished = self.unfinished_files(),
                "Shutdown timeout expired before all files finished"
            );
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new(0)
    }
}
