//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::NamedTempFile;
use userbridge::config::{load_config, load_config_or_default};
use userbridge::core::pipeline::PipelineSettings;
use userbridge::domain::BridgeError;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("USERBRIDGE_APPLICATION_LOG_LEVEL");
    std::env::remove_var("USERBRIDGE_PIPELINE_THREAD_POOL_SIZE");
    std::env::remove_var("USERBRIDGE_PIPELINE_QUEUE_CAPACITY");
    std::env::remove_var("USERBRIDGE_RETRY_MAX_ATTEMPTS");
    std::env::remove_var("TEST_USERBRIDGE_LOG_DIR");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[pipeline]
thread_pool_size = 6
queue_capacity = 12
batch_size = 1000
file_extension = ".users.json"
shutdown_timeout_secs = 60

[retry]
max_attempts = 4
initial_delay_ms = 250
backoff_multiplier = 3.0
max_delay_ms = 5000

[logging]
local_enabled = true
local_path = "/var/log/userbridge"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.pipeline.thread_pool_size, 6);
    assert_eq!(config.pipeline.file_extension, ".users.json");
    assert_eq!(config.retry.backoff_multiplier, 3.0);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");

    let settings = PipelineSettings::from_config(&config);
    assert_eq!(settings.pool_size, 6);
    assert_eq!(settings.queue_capacity, 12);
    assert_eq!(settings.batch_size, 1000);
    assert_eq!(settings.shutdown_timeout, Duration::from_secs(60));
    assert_eq!(settings.retry.max_attempts, 4);
    assert_eq!(
        settings.retry.delays(),
        vec![
            Duration::from_millis(250),
            Duration::from_millis(750),
            Duration::from_millis(2250)
        ]
    );
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[pipeline]\nthread_pool_size = 2\n");

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.pipeline.thread_pool_size, 2);
    assert_eq!(config.pipeline.queue_capacity, 100);
    assert_eq!(config.pipeline.batch_size, 50_000);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.initial_delay_ms, 1000);
    assert_eq!(config.retry.max_delay_ms, 30_000);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_USERBRIDGE_LOG_DIR", "/tmp/userbridge-logs");

    let file = write_config("[logging]\nlocal_path = \"${TEST_USERBRIDGE_LOG_DIR}\"\n");

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.logging.local_path, "/tmp/userbridge-logs");

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_configuration_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[logging]\nlocal_path = \"${TEST_USERBRIDGE_LOG_DIR}\"\n");

    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, BridgeError::Configuration(_)));
    assert!(err.to_string().contains("TEST_USERBRIDGE_LOG_DIR"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("USERBRIDGE_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("USERBRIDGE_PIPELINE_QUEUE_CAPACITY", "7");
    std::env::set_var("USERBRIDGE_RETRY_MAX_ATTEMPTS", "5");
    std::env::set_var("USERBRIDGE_PIPELINE_THREAD_POOL_SIZE", "not-a-number");

    let file = write_config("[pipeline]\nqueue_capacity = 50\nthread_pool_size = 3\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.pipeline.queue_capacity, 7);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.pipeline.thread_pool_size, 3);

    let defaults = load_config_or_default(None).unwrap();
    assert_eq!(defaults.pipeline.queue_capacity, 7);

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"loud\"\n",
        "[pipeline]\nqueue_capacity = 0\n",
        "[pipeline]\nbatch_size = 0\n",
        "[retry]\nmax_attempts = 0\n",
        "[retry]\nbackoff_multiplier = 0.5\n",
        "[retry]\nbackoff_multiplier = 1.0\n",
        "[retry]\ninitial_delay_ms = 0\n",
        "[retry]\ninitial_delay_ms = 5000\nmax_delay_ms = 100\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ];

    for case in cases {
        let file = write_config(case);
        let err = load_config(file.path()).unwrap_err();
        assert!(
            matches!(err, BridgeError::Configuration(_)),
            "expected configuration error for {case:?}"
        );
    }
}

#[test]
fn test_malformed_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[pipeline\nqueue_capacity = ");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}
