// userbridge - identity-provider user export converter
// Copyright (c) 2025 Userbridge Contributors
// Licensed under the MIT License

//! # userbridge - user export converter
//!
//! userbridge converts directory "users" exports (JSON documents with a
//! top-level `value` array) into newline-delimited JSON in an internal target
//! schema, processing many files concurrently.
//!
//! ## Overview
//!
//! This library provides:
//! - **Decoding** of large exports one record at a time
//! - **Transforming** raw users into the target schema
//! - **Writing** one JSON object per line
//! - **Orchestrating** a bounded worker pool with per-file retry and a
//!   `processed/` / `failed/` file lifecycle
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline stages and orchestration
//! - [`domain`] - Record types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`metrics`] - Success and failure counters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use userbridge::config::load_config_or_default;
//! use userbridge::core::pipeline::{PipelineSettings, UserOrchestrator};
//! use userbridge::core::sink::UserSink;
//! use userbridge::core::source::UserSource;
//! use userbridge::core::transform::UserTransformer;
//! use userbridge::metrics::PipelineMetrics;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default(None)?;
//!     let orchestrator = UserOrchestrator::new(
//!         Arc::new(UserSource::new()),
//!         Arc::new(UserTransformer::new()),
//!         Arc::new(UserSink::new()),
//!         Arc::new(PipelineMetrics::new()),
//!         PipelineSettings::from_config(&config),
//!     );
//!
//!     let summary = orchestrator.run(Path::new("in"), Path::new("out")).await?;
//!     println!("Converted {} records", summary.records_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], whose error type is
//! [`domain::BridgeError`]. Errors raised while a file is processed never
//! escape the orchestrator; they drive that file's retries and final location.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod metrics;
