//! CLI command implementations
//!
//! Commands return the process exit code: 0 on success (including runs in
//! which individual files failed), 2 for configuration errors and 5 for
//! fatal errors.

pub mod init;
pub mod run;
pub mod validate;
