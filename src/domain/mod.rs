//! Domain models and types for userbridge.
//!
//! The domain layer provides:
//! - **User records** in the identity-provider schema ([`RawUser`]) and the
//!   internal target schema ([`TargetUser`])
//! - **Error types** ([`BridgeError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, BridgeError>`]:
//!
//! ```rust
//! use userbridge::domain::{BridgeError, Result};
//!
//! fn example() -> Result<()> {
//!     let bytes = std::fs::read("users.json")?;
//!     if bytes.is_empty() {
//!         return Err(BridgeError::Format("empty document".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;
pub mod user;

pub use errors::BridgeError;
pub use result::Result;
pub use user::{RawSignInActivity, RawUser, TargetUser};
