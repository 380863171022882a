//! Run command implementation
//!
//! This module implements the `run` command, the composition root of the
//! pipeline: it builds the source, transformer, sink and metrics recorder and
//! hands them to the orchestrator.

use crate::config::{load_config_or_default, BridgeConfig};
use crate::core::pipeline::{PipelineSettings, RunSummary, UserOrchestrator};
use crate::core::sink::UserSink;
use crate::core::source::UserSource;
use crate::core::transform::UserTransformer;
use crate::metrics::{Counter, MetricsSnapshot, PipelineMetrics};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory containing the user export files
    #[arg(long, value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Directory receiving the converted files
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Override the number of worker tasks
    #[arg(long)]
    pub threads: Option<usize>,

    /// Override the queue capacity
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Override the number of attempts per file
    #[arg(long)]
    pub max_attempts: Option<usize>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let metrics = Arc::new(PipelineMetrics::new());
        let orchestrator = UserOrchestrator::new(
            Arc::new(UserSource::new()),
            Arc::new(UserTransformer::new()),
            Arc::new(UserSink::new()),
            metrics.clone(),
            PipelineSettings::from_config(&config),
        );

        match orchestrator.run(&self.input_dir, &self.output_dir).await {
            Ok(summary) => {
                print_summary(&summary, metrics.snapshot());
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Run aborted");
                eprintln!("Run aborted: {e}");
                Ok(5)
            }
        }
    }

    fn apply_overrides(&self, config: &mut BridgeConfig) {
        if let Some(threads) = self.threads {
            tracing::info!(threads = threads, "Overriding thread pool size from CLI");
            config.pipeline.thread_pool_size = threads;
        }
        if let Some(capacity) = self.queue_capacity {
            tracing::info!(queue_capacity = capacity, "Overriding queue capacity from CLI");
            config.pipeline.queue_capacity = capacity;
        }
        if let Some(attempts) = self.max_attempts {
            tracing::info!(max_attempts = attempts, "Overriding max attempts from CLI");
            config.retry.max_attempts = attempts;
        }
    }
}

fn print_summary(summary: &RunSummary, counters: MetricsSnapshot) {
    println!();
    println!("Run Summary:");
    println!("  Files discovered: {}", summary.discovered_files);
    println!("  Processed: {}", summary.processed_files);
    println!("  Failed: {}", summary.failed_files);
    println!("  Records written: {}", summary.records_written);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!(
        "  Counters: {}={} {}={}",
        Counter::FileSuccess,
        counters.success,
        Counter::FileFailure,
        counters.failure
    );

    if !summary.stranded_files.is_empty() {
        println!();
        println!("Files left in the input directory (manual action needed):");
        for name in &summary.stranded_files {
            println!("  - {name}");
        }
    }

    if summary.timed_out {
        println!();
        println!(
            "Shutdown timeout expired; {} file(s) did not finish",
            summary.unfinished_files()
        );
    }
}
