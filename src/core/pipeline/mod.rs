//! Concurrent batch pipeline
//!
//! - [`orchestrator`] - worker pool, admission and shutdown
//! - [`retry`] - exponential backoff wrapper
//! - [`lifecycle`] - discovery and `processed/` / `failed/` moves
//! - [`context`] - per-file diagnostic context
//! - [`summary`] - run totals

pub mod context;
pub mod lifecycle;
pub mod orchestrator;
pub mod retry;
pub mod summary;

pub use context::FileContext;
pub use lifecycle::LifecycleDirs;
pub use orchestrator::{convert_file, Orchestrator, PipelineSettings, UserOrchestrator};
pub use retry::{retry_with_backoff, BackoffPolicy};
pub use summary::{FileOutcome, FileReport, RunSummary};
