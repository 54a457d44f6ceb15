//! REDCap requester trait definition
//!
//! This module defines the `Requester` trait that abstracts the authenticated
//! HTTP boundary of the REDCap API. The downloader, the project orchestrator,
//! and the text extractor all talk to the server through this trait, which
//! keeps them testable against in-memory implementations.

use crate::domain::{FieldDescriptor, MetadataField, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// Trait for authenticated REDCap API access
///
/// Every call is an authenticated POST against the project endpoint; the
/// implementation supplies the token and output format and maps non-2xx
/// responses to [`crate::domain::ApiError`].
///
/// # Example
///
/// ```no_run
/// use redsync::adapters::redcap::{HttpRequester, Requester};
/// use redsync::config::{ApiConfig, secret_string};
/// use std::collections::BTreeMap;
///
/// # async fn example() -> redsync::domain::Result<()> {
/// let config = ApiConfig {
///     url: "https://redcap.example.edu/api/".to_string(),
///     token: secret_string("48F35658A6AD741128CB8CE03A3774FC".to_string()),
///     timeout_seconds: 30,
///     tls_verify: true,
/// };
/// let requester = HttpRequester::new(&config)?;
///
/// let mut payload = BTreeMap::new();
/// payload.insert("content".to_string(), "record".to_string());
/// let records = requester.post(&payload).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Requester: Send + Sync {
    /// Issue one authenticated POST with the given string-keyed payload
    ///
    /// The payload is merged over the implementation's base parameters
    /// (token, output format), so callers can override defaults.
    ///
    /// # Errors
    ///
    /// Returns an `Api` error for connection failures, non-2xx statuses, and
    /// unparseable response bodies.
    async fn post(&self, payload: &BTreeMap<String, String>) -> Result<Value>;

    /// Fetch the project's data dictionary rows (content=metadata)
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the request fails or the payload does not
    /// deserialize into metadata rows.
    async fn metadata(&self) -> Result<Vec<MetadataField>>;

    /// Fetch the export/import field name descriptors (content=exportFieldNames)
    ///
    /// One descriptor per exported field; checkbox fields contribute one
    /// descriptor per choice.
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the request fails or the payload does not
    /// deserialize into descriptors.
    async fn export_field_names(&self) -> Result<Vec<FieldDescriptor>>;

    /// Fetch the server's version string (content=version; plain-text body)
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the request fails.
    async fn version(&self) -> Result<String>;

    /// Produce a wire-safe representation of a parameter value
    ///
    /// Trims surrounding whitespace and strips control characters. Static
    /// per-batch parameters are sanitized once at downloader construction,
    /// not per batch.
    fn sanitize_param(&self, value: &str) -> String {
        value.trim().chars().filter(|c| !c.is_control()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopRequester;

    #[async_trait]
    impl Requester for NoopRequester {
        async fn post(&self, _payload: &BTreeMap<String, String>) -> Result<Value> {
            Ok(Value::Array(vec![]))
        }

        async fn metadata(&self) -> Result<Vec<MetadataField>> {
            Ok(vec![])
        }

        async fn export_field_names(&self) -> Result<Vec<FieldDescriptor>> {
            Ok(vec![])
        }

        async fn version(&self) -> Result<String> {
            Ok("14.0.0".to_string())
        }
    }

    #[test]
    fn test_sanitize_param_trims_whitespace() {
        let requester = NoopRequester;
        assert_eq!(requester.sanitize_param("  raw  "), "raw");
    }

    #[test]
    fn test_sanitize_param_strips_control_characters() {
        let requester = NoopRequester;
        assert_eq!(requester.sanitize_param("a\u{0}b\nc"), "abc");
    }

    #[test]
    fn test_sanitize_param_keeps_inner_spaces() {
        let requester = NoopRequester;
        assert_eq!(requester.sanitize_param("raw or label"), "raw or label");
    }
}
