//! Core business logic for userbridge.
//!
//! # Modules
//!
//! - [`traits`] - Stage traits shared by the pipeline
//! - [`source`] - Streaming decoder for `{"value": [...]}` documents
//! - [`transform`] - Raw user to target user mapping
//! - [`sink`] - Newline-delimited JSON writer
//! - [`pipeline`] - Orchestration, retry and file lifecycle
//!
//! # Conversion Workflow
//!
//! 1. **Discover**: list `*.json` files in the input directory
//! 2. **Schedule**: queue one task per file on the worker pool
//! 3. **Decode**: stream raw records out of the file
//! 4. **Transform**: map each record to the target schema
//! 5. **Write**: emit one JSON line per record to the output directory
//! 6. **Settle**: move the file to `processed/`, or to `failed/` once retries
//!    are exhausted
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use userbridge::core::pipeline::{PipelineSettings, UserOrchestrator};
//! use userbridge::core::sink::UserSink;
//! use userbridge::core::source::UserSource;
//! use userbridge::core::transform::UserTransformer;
//! use userbridge::metrics::PipelineMetrics;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = Arc::new(PipelineMetrics::new());
//! let orchestrator = UserOrchestrator::new(
//!     Arc::new(UserSource::new()),
//!     Arc::new(UserTransformer::new()),
//!     Arc::new(UserSink::new()),
//!     metrics.clone(),
//!     PipelineSettings::default(),
//! );
//!
//! let summary = orchestrator.run(Path::new("in"), Path::new("out")).await?;
//! println!("Processed: {}", summary.processed_files);
//! println!("Failed: {}", summary.failed_files);
//! # Ok(())
//! # }
//! ```

pub mod pipeline;
pub mod sink;
pub mod source;
pub mod traits;
pub mod transform;
