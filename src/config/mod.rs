//! Configuration management for userbridge.
//!
//! TOML-based configuration with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `USERBRIDGE_<SECTION>_<KEY>` overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use userbridge::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("userbridge.toml")?;
//! println!("Workers: {}", config.pipeline.effective_pool_size());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [pipeline]
//! thread_pool_size = 4
//! queue_capacity = 100
//!
//! [retry]
//! max_attempts = 3
//! initial_delay_ms = 1000
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_or_default};
pub use schema::{ApplicationConfig, BridgeConfig, LoggingConfig, PipelineConfig, RetryConfig};
