//! Result type alias for userbridge

use super::errors::BridgeError;

/// Result type alias for userbridge operations
///
/// # Examples
///
/// ```
/// use userbridge::domain::result::Result;
/// use userbridge::domain::errors::BridgeError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BridgeError::Format("not an object".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BridgeError>;
