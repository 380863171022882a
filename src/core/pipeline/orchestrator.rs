//! File-level orchestration
//!
//! The orchestrator discovers input files and feeds them to a fixed pool of
//! worker tasks through a bounded queue. When the queue is full the submitting
//! task handles the file itself. Each file is converted under
//! [`retry_with_backoff`]; once retries are exhausted the file is moved to
//! `failed/` as a separate recovery step.

use super::context::FileContext;
use super::lifecycle::LifecycleDirs;
use super::retry::{retry_with_backoff, BackoffPolicy};
use super::summary::{FileOutcome, FileReport, RunSummary};
use crate::config::BridgeConfig;
use crate::core::traits::{Sink, Source, Transformer};
use crate::domain::{BridgeError, RawUser, Result, TargetUser};
use crate::log_file_outcome;
use crate::metrics::{Counter, MetricsRecorder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tracing::Instrument;

/// Runtime settings for the orchestrator
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Number of worker tasks
    pub pool_size: usize,

    /// Capacity of the pending-file queue
    pub queue_capacity: usize,

    /// Raw records transformed per chunk
    pub batch_size: usize,

    /// File name suffix selecting input files
    pub file_extension: String,

    /// How long to wait for workers after the last file is submitted
    pub shutdown_timeout: Duration,

    /// Per-file retry policy
    pub retry: BackoffPolicy,
}

impl PipelineSettings {
    /// Derive settings from a validated configuration
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            pool_size: config.pipeline.effective_pool_size(),
            queue_capacity: config.pipeline.queue_capacity,
            batch_size: config.pipeline.batch_size,
            file_extension: config.pipeline.file_extension.clone(),
            shutdown_timeout: config.pipeline.shutdown_timeout(),
            retry: BackoffPolicy::from_config(&config.retry),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&BridgeConfig::default())
    }
}

/// Orchestrator over the user record stages
pub type UserOrchestrator = Orchestrator<RawUser, TargetUser>;

/// Runs the source, transformer and sink over every file of an input directory
pub struct Orchestrator<I, O> {
    source: Arc<dyn Source<Item = I>>,
    transformer: Arc<dyn Transformer<Input = I, Output = O>>,
    sink: Arc<dyn Sink<Item = O>>,
    metrics: Arc<dyn MetricsRecorder>,
    settings: PipelineSettings,
}

impl<I, O> Orchestrator<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Create a new orchestrator from its collaborators
    pub fn new(
        source: Arc<dyn Source<Item = I>>,
        transformer: Arc<dyn Transformer<Input = I, Output = O>>,
        sink: Arc<dyn Sink<Item = O>>,
        metrics: Arc<dyn MetricsRecorder>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            transformer,
            sink,
            metrics,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Convert every matching file in `input_dir`, writing to `output_dir`
    ///
    /// Per-file failures never fail the run; they are reflected in the
    /// returned summary, the metrics and the file's final location.
    ///
    /// # Errors
    ///
    /// Returns an error if the lifecycle directories cannot be created or the
    /// input directory cannot be listed. No file is touched in that case.
    pub async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<RunSummary> {
        let started = Instant::now();
        let dirs = LifecycleDirs::new(input_dir, output_dir);
        dirs.ensure()?;
        let files = dirs.discover(&self.settings.file_extension)?;

        let mut summary = RunSummary::new(files.len());
        let pool_size = self.settings.pool_size.max(1);
        let queue_capacity = self.settings.queue_capacity.max(1);

        tracing::info!(
            input = %input_dir.display(),
            output = %output_dir.display(),
            files = files.len(),
            workers = pool_size,
            queue_capacity = queue_capacity,
            "Starting run"
        );

        let processor = Arc::new(FileProcessor {
            source: self.source.clone(),
            transformer: self.transformer.clone(),
            sink: self.sink.clone(),
            metrics: self.metrics.clone(),
            dirs,
            retry: self.settings.retry.clone(),
            batch_size: self.settings.batch_size.max(1),
        });

        let (task_tx, task_rx) = mpsc::channel::<PathBuf>(queue_capacity);
        let task_rx = Arc::new(Mutex::new(task_rx));
        let (report_tx, mut report_rx) = mpsc::unbounded_channel::<FileReport>();

        let mut handles = Vec::with_capacity(pool_size);
        for worker_id in 0..pool_size {
            handles.push(tokio::spawn(worker_loop(
                worker_id,
                processor.clone(),
                task_rx.clone(),
                report_tx.clone(),
            )));
        }
        drop(report_tx);

        for file in files {
            match task_tx.try_send(file) {
                Ok(()) => {}
                Err(TrySendError::Full(file)) => {
                    tracing::debug!(file = %file.display(), "Queue full, handling file on submitter");
                    summary.record(processor.handle(file).await);
                }
                Err(TrySendError::Closed(file)) => {
                    tracing::warn!(file = %file.display(), "No workers left, handling file on submitter");
                    summary.record(processor.handle(file).await);
                }
            }
        }
        drop(task_tx);

        let abort_handles: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();
        match tokio::time::timeout(
            self.settings.shutdown_timeout,
            futures::future::join_all(handles),
        )
        .await
        {
            Ok(results) => {
                for (worker_id, result) in results.into_iter().enumerate() {
                    if let Err(e) = result {
                        tracing::error!(worker = worker_id, error = %e, "Worker task panicked");
                    }
                }
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.settings.shutdown_timeout.as_secs(),
                    "Shutdown timeout exceeded, aborting remaining workers"
                );
                for handle in &abort_handles {
                    handle.abort();
                }
                summary.timed_out = true;
            }
        }

        while let Ok(report) = report_rx.try_recv() {
            summary.record(report);
        }

        summary.duration = started.elapsed();
        summary.log_summary();
        Ok(summary)
    }
}

async fn worker_loop<I, O>(
    worker_id: usize,
    processor: Arc<FileProcessor<I, O>>,
    queue: Arc<Mutex<mpsc::Receiver<PathBuf>>>,
    reports: mpsc::UnboundedSender<FileReport>,
) where
    I: Send + 'static,
    O: Send + 'static,
{
    tracing::debug!(worker = worker_id, "Worker started");
    loop {
        let next = queue.lock().await.recv().await;
        let Some(file) = next else {
            break;
        };

        let report = processor.handle(file).await;
        if reports.send(report).is_err() {
            break;
        }
    }
    tracing::debug!(worker = worker_id, "Worker stopped");
}

/// Everything a worker needs to handle one file
struct FileProcessor<I, O> {
    source: Arc<dyn Source<Item = I>>,
    transformer: Arc<dyn Transformer<Input = I, Output = O>>,
    sink: Arc<dyn Sink<Item = O>>,
    metrics: Arc<dyn MetricsRecorder>,
    dirs: LifecycleDirs,
    retry: BackoffPolicy,
    batch_size: usize,
}

impl<I, O> FileProcessor<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Run one file to a terminal state
    async fn handle(&self, input: PathBuf) -> FileReport {
        let mut ctx = FileContext::new(&input);
        let span = ctx.span();

        async move {
            let result =
                retry_with_backoff(&self.retry, &mut ctx, |attempt| self.attempt(attempt)).await;

            match result {
                Ok(lines) => {
                    self.metrics.increment(Counter::FileSuccess);
                    log_file_outcome!(ctx.filename, "processed", ctx.attempt);
                    FileReport {
                        filename: ctx.filename,
                        attempts: ctx.attempt,
                        outcome: FileOutcome::Processed { lines },
                        error: None,
                    }
                }
                Err(e) => {
                    let outcome = self.recover(&ctx, &e).await;
                    FileReport {
                        filename: ctx.filename,
                        attempts: ctx.attempt,
                        outcome,
                        error: Some(e.to_string()),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// One attempt: convert on the blocking pool, then move to `processed/`
    async fn attempt(&self, ctx: FileContext) -> Result<usize> {
        let source = self.source.clone();
        let transformer = self.transformer.clone();
        let sink = self.sink.clone();
        let input = ctx.input.clone();
        let output = self.dirs.output_path(&ctx.input);
        let batch_size = self.batch_size;
        let span = tracing::Span::current();

        let lines = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            convert_file(
                source.as_ref(),
                transformer.as_ref(),
                sink.as_ref(),
                &input,
                &output,
                batch_size,
            )
        })
        .await??;

        self.dirs.move_to_processed(&ctx.input).await?;
        Ok(lines)
    }

    /// Move an exhausted file to `failed/`
    ///
    /// A failed move is logged and leaves the file where it is.
    async fn recover(&self, ctx: &FileContext, error: &BridgeError) -> FileOutcome {
        tracing::error!(
            error = %error,
            kind = error.kind(),
            attempts = ctx.attempt,
            "Failed to process file after retries"
        );

        match self.dirs.move_to_failed(&ctx.input).await {
            Ok(target) => {
                self.metrics.increment(Counter::FileFailure);
                tracing::info!(destination = %target.display(), "Moved failed file");
                log_file_outcome!(ctx.filename, "failed", ctx.attempt);
                FileOutcome::Failed
            }
            Err(move_error) => {
                tracing::error!(
                    error = %move_error,
                    "Failed to move file to failed directory, leaving it in place"
                );
                log_file_outcome!(ctx.filename, "stranded", ctx.attempt);
                FileOutcome::Stranded
            }
        }
    }
}

/// Decode, transform and write one file
///
/// Records are transformed in chunks of `batch_size`; the whole transformed
/// set is held until decoding finishes so that a decode failure leaves no
/// output file. The input is closed before writing starts.
pub fn convert_file<I, O>(
    source: &dyn Source<Item = I>,
    transformer: &dyn Transformer<Input = I, Output = O>,
    sink: &dyn Sink<Item = O>,
    input: &Path,
    output: &Path,
    batch_size: usize,
) -> Result<usize> {
    let batch_size = batch_size.max(1);
    let mut records = source.read(input)?;
    let mut transformed = Vec::new();
    let mut chunk = Vec::with_capacity(batch_size.min(1024));

    for record in records.by_ref() {
        chunk.push(record?);
        if chunk.len() >= batch_size {
            transformed.extend(chunk.drain(..).map(|r| transformer.transform(r)));
            tracing::debug!(records = transformed.len(), "Transformed batch");
        }
    }
    transformed.extend(chunk.into_iter().map(|r| transformer.transform(r)));
    drop(records);

    sink.write(&mut transformed.into_iter(), output)
}
