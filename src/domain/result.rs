//! Result type alias for redsync
//!
//! This module provides a convenient Result type alias that uses RedsyncError
//! as the error type.

use super::errors::RedsyncError;

/// Result type alias for redsync operations
///
/// This is a convenience type alias that uses `RedsyncError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use redsync::domain::result::Result;
/// use redsync::domain::errors::RedsyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RedsyncError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RedsyncError>;
