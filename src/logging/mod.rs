//! Logging and observability
//!
//! Structured logging through `tracing`, plus a few macros that keep the
//! field names of recurring pipeline events consistent.
//!
//! # Example
//!
//! ```no_run
//! use userbridge::logging::init_logging;
//! use userbridge::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a failed attempt that will be retried
///
/// # Example
///
/// ```no_run
/// use userbridge::log_retry_attempt;
///
/// log_retry_attempt!(1, 3, 1000u64, "Invalid JSON format at byte 0");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Attempt failed, retrying"
        );
    };
}

/// Log the terminal outcome of one input file
///
/// # Example
///
/// ```no_run
/// use userbridge::log_file_outcome;
///
/// log_file_outcome!("users.json", "processed", 3);
/// ```
#[macro_export]
macro_rules! log_file_outcome {
    ($filename:expr, $outcome:expr, $attempts:expr) => {
        tracing::info!(
            filename = %$filename,
            outcome = $outcome,
            attempts = $attempts,
            "File finished"
        );
    };
}
