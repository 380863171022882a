//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "userbridge.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate: userbridge --config {} validate-config", self.output);
                println!(
                    "  3. Run: userbridge --config {} run --input-dir <DIR> --output-dir <DIR>",
                    self.output
                );
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }
}

/// Sample configuration with every setting at its default
pub fn sample_config() -> &'static str {
    r#"# userbridge configuration
# Every setting is optional; the values below are the defaults.
# Any value can reference an environment variable as ${VAR_NAME}, and any
# setting can be overridden with USERBRIDGE_<SECTION>_<KEY>.

[application]
# trace, debug, info, warn, error
log_level = "info"

[pipeline]
# Worker tasks; 0 uses the number of available CPUs
thread_pool_size = 0
# Pending files held in the queue before the submitter handles files itself
queue_capacity = 100
# Raw records transformed per chunk
batch_size = 50000
# Only files ending with this suffix are picked up
file_extension = ".json"
# Seconds to wait for in-flight files before aborting them
shutdown_timeout_secs = 3600

[retry]
# Total attempts per file, including the first
max_attempts = 3
initial_delay_ms = 1000
backoff_multiplier = 2.0
max_delay_ms = 30000

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"
# daily, hourly, never
local_rotation = "daily"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_parses_and_validates() {
        let config: BridgeConfig = toml::from_str(sample_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.pipeline.queue_capacity, 100);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("userbridge.toml");
        fs::write(&output, "keep me").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

        let args = InitArgs { force: true, ..args };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), sample_config());
    }
}
