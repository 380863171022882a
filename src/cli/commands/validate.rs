//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the userbridge configuration file.

use crate::config::load_config_or_default;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("<defaults>");
        tracing::info!(config_path = %source, "Validating configuration");

        println!("Validating configuration: {source}");
        println!();

        // Loading applies env overrides and runs validate()
        let config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Worker Threads: {} (configured {})",
            config.pipeline.effective_pool_size(),
            config.pipeline.thread_pool_size
        );
        println!("  Queue Capacity: {}", config.pipeline.queue_capacity);
        println!("  Batch Size: {}", config.pipeline.batch_size);
        println!("  File Extension: {}", config.pipeline.file_extension);
        println!(
            "  Shutdown Timeout: {}s",
            config.pipeline.shutdown_timeout_secs
        );
        println!("  Max Attempts: {}", config.retry.max_attempts);
        println!(
            "  Backoff: {}ms x{} (max {}ms)",
            config.retry.initial_delay_ms,
            config.retry.backoff_multiplier,
            config.retry.max_delay_ms
        );
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }

        Ok(0)
    }
}
