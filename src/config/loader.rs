//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BridgeConfig;
use crate::domain::errors::BridgeError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BridgeConfig
/// 4. Applies environment variable overrides (USERBRIDGE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced variable is not
/// set, the TOML is invalid, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use userbridge::config::loader::load_config;
///
/// let config = load_config("userbridge.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BridgeConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BridgeError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BridgeError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: BridgeConfig = toml::from_str(&contents)
        .map_err(|e| BridgeError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

/// Loads configuration from `path` if given, otherwise from defaults
///
/// Environment overrides and validation apply in both cases.
pub fn load_config_or_default(path: Option<&str>) -> Result<BridgeConfig> {
    match path {
        Some(path) => load_config(path),
        None => finish(BridgeConfig::default()),
    }
}

fn finish(mut config: BridgeConfig) -> Result<BridgeConfig> {
    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        BridgeError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BridgeError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using USERBRIDGE_* prefix
///
/// Environment variables follow the pattern: USERBRIDGE_<SECTION>_<KEY>, for
/// example USERBRIDGE_PIPELINE_QUEUE_CAPACITY. Unparseable numbers are ignored.
fn apply_env_overrides(config: &mut BridgeConfig) {
    if let Ok(val) = std::env::var("USERBRIDGE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Pipeline overrides
    if let Ok(val) = std::env::var("USERBRIDGE_PIPELINE_THREAD_POOL_SIZE") {
        if let Ok(size) = val.parse() {
            config.pipeline.thread_pool_size = size;
        }
    }
    if let Ok(val) = std::env::var("USERBRIDGE_PIPELINE_QUEUE_CAPACITY") {
        if let Ok(capacity) = val.parse() {
            config.pipeline.queue_capacity = capacity;
        }
    }
    if let Ok(val) = std::env::var("USERBRIDGE_PIPELINE_BATCH_SIZE") {
        if let Ok(size) = val.parse() {
            config.pipeline.batch_size = size;
        }
    }
    if let Ok(val) = std::env::var("USERBRIDGE_PIPELINE_FILE_EXTENSION") {
        config.pipeline.file_extension = val;
    }
    if let Ok(val) = std::env::var("USERBRIDGE_PIPELINE_SHUTDOWN_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.pipeline.shutdown_timeout_secs = secs;
        }
    }

    // Retry overrides
    if let Ok(val) = std::env::var("USERBRIDGE_RETRY_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.retry.max_attempts = attempts;
        }
    }
    if let Ok(val) = std::env::var("USERBRIDGE_RETRY_INITIAL_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.retry.initial_delay_ms = delay;
        }
    }
    if let Ok(val) = std::env::var("USERBRIDGE_RETRY_BACKOFF_MULTIPLIER") {
        if let Ok(multiplier) = val.parse() {
            config.retry.backoff_multiplier = multiplier;
        }
    }
    if let Ok(val) = std::env::var("USERBRIDGE_RETRY_MAX_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.retry.max_delay_ms = delay;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("USERBRIDGE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("USERBRIDGE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
