//! Configuration schema types
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields a working configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main userbridge configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Worker pool, queue and file selection
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Per-file retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.pipeline.validate()?;
        self.retry.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of worker tasks (0 = available parallelism)
    #[serde(default)]
    pub thread_pool_size: usize,

    /// Capacity of the pending-file queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Raw records accumulated before a chunk is transformed
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Only files whose name ends with this suffix are picked up
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// How long to wait for in-flight files once everything is submitted
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl PipelineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.thread_pool_size > 1024 {
            return Err(format!(
                "pipeline.thread_pool_size must be between 0 and 1024, got {}",
                self.thread_pool_size
            ));
        }

        if self.queue_capacity == 0 {
            return Err("pipeline.queue_capacity must be > 0".to_string());
        }

        if self.batch_size == 0 {
            return Err("pipeline.batch_size must be > 0".to_string());
        }

        if self.file_extension.is_empty() {
            return Err("pipeline.file_extension cannot be empty".to_string());
        }

        if self.shutdown_timeout_secs == 0 {
            return Err("pipeline.shutdown_timeout_secs must be > 0".to_string());
        }

        Ok(())
    }

    /// Worker count with `0` resolved to the machine's available parallelism
    pub fn effective_pool_size(&self) -> usize {
        if self.thread_pool_size > 0 {
            return self.thread_pool_size;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Shutdown timeout as a duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            thread_pool_size: 0,
            queue_capacity: default_queue_capacity(),
            batch_size: default_batch_size(),
            file_extension: default_file_extension(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per file, the first one included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Delay before the second attempt, in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Upper bound for any single delay, in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 || self.max_attempts > 10 {
            return Err(format!(
                "retry.max_attempts must be between 1 and 10, got {}",
                self.max_attempts
            ));
        }

        if self.initial_delay_ms == 0 {
            return Err("retry.initial_delay_ms must be > 0".to_string());
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier <= 1.0 {
            return Err(format!(
                "retry.backoff_multiplier must be > 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if self.max_delay_ms < self.initial_delay_ms {
            return Err(format!(
                "retry.max_delay_ms ({}) must be >= retry.initial_delay_ms ({})",
                self.max_delay_ms, self.initial_delay_ms
            ));
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_queue_capacity() -> usize {
    100
}

fn default_batch_size() -> usize {
    50_000
}

fn default_file_extension() -> String {
    ".json".to_string()
}

fn default_shutdown_timeout_secs() -> u64 {
    3600
}

fn default_max_attempts() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pipeline_config_validation() {
        let mut config = PipelineConfig::default();
        assert!(config.validate().is_ok());

        config.queue_capacity = 0;
        assert!(config.validate().is_err());

        config.queue_capacity = 10;
        config.batch_size = 0;
        assert!(config.validate().is_err());

        config.batch_size = 10;
        config.file_extension = String::new();
        assert!(config.validate().is_err());

        config.file_extension = ".json".to_string();
        config.thread_pool_size = 2048;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_pool_size() {
        let mut config = PipelineConfig::default();
        assert!(config.effective_pool_size() >= 1);

        config.thread_pool_size = 3;
        assert_eq!(config.effective_pool_size(), 3);
    }

    #[test]
    fn test_retry_config_validation() {
        let mut config = RetryConfig::default();
        assert!(config.validate().is_ok());

        config.max_attempts = 0;
        assert!(config.validate().is_err());

        config.max_attempts = 3;
        config.backoff_multiplier = 0.5;
        assert!(config.validate().is_err());

        config.backoff_multiplier = 1.0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("backoff_multiplier"));

        config.backoff_multiplier = 2.0;
        config.initial_delay_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("initial_delay_ms"));

        config.initial_delay_ms = 1000;
        config.max_delay_ms = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: BridgeConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.pipeline.queue_capacity, 100);
        assert_eq!(config.pipeline.batch_size, 50_000);
        assert_eq!(config.pipeline.file_extension, ".json");
        assert_eq!(config.pipeline.shutdown_timeout(), Duration::from_secs(3600));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_delay_ms, 1000);
        assert_eq!(config.retry.backoff_multiplier, 2.0);
    }
}
