//! Error context extension trait
//!
//! This module provides a context extension trait similar to `anyhow::Context`
//! that works with `Result<T, RedsyncError>`. This allows adding rich context
//! to errors throughout the library code while maintaining type safety.
//!
//! # Examples
//!
//! ```rust
//! use redsync::domain::{RedsyncError, Result};
//! use redsync::domain::context::ResultExt;
//!
//! fn read_report(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .context(format!("Failed to read report: {}", path))
//! }
//!
//! fn lookup(field: &str) -> Result<()> {
//!     fetch_names(field)
//!         .with_context(|| format!("Failed to resolve export names for: {}", field))?;
//!     Ok(())
//! }
//! # fn fetch_names(field: &str) -> Result<()> { Ok(()) }
//! ```

use crate::domain::errors::RedsyncError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
///
/// This trait provides `.context()` and `.with_context()` methods
/// for adding contextual information to errors, similar to `anyhow::Context`.
///
/// The key difference from anyhow is that this maintains the `RedsyncError`
/// type throughout the library code, ensuring type safety and domain-specific
/// errors.
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// The context is evaluated eagerly, so use `.with_context()` if the
    /// context string is expensive to compute.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// Similar to `.context()` but the context is computed lazily only if an
    /// error occurs.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

/// Implementation for `Result<T, E>` where `E` can be converted to `RedsyncError`
///
/// This allows `.context()` and `.with_context()` to work with any error type
/// that implements `Into<RedsyncError>`, including `RedsyncError` itself and
/// the transport-level `ApiError`.
impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<RedsyncError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| {
            let base_error = e.into();
            RedsyncError::Other(format!("{context}: {base_error}"))
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let base_error = e.into();
            let context = f();
            RedsyncError::Other(format!("{context}: {base_error}"))
        })
    }
}
