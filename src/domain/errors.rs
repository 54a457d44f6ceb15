//! Domain error types
//!
//! This module defines the error hierarchy for redsync. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main redsync error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum RedsyncError {
    /// Configuration-related errors (invalid chunk size, malformed URL, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport-level errors from the REDCap API
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Lookup of a field with no export-field-name entry
    #[error("Unknown field: '{0}' has no export field names")]
    UnknownField(String),

    /// A payload whose shape contradicts the project metadata
    #[error("Unexpected data shape: {0}")]
    DataShape(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// CSV writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// REDCap API transport errors
///
/// Errors that occur when talking to a REDCap server. These errors don't
/// expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the REDCap server
    #[error("Failed to connect to REDCap server: {0}")]
    ConnectionFailed(String),

    /// Token rejected by the server
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Response body could not be parsed
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl ApiError {
    /// Map an HTTP status and response body to the matching variant.
    ///
    /// 401/403 are reported as authentication failures since REDCap signals
    /// a bad token that way.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ApiError::AuthenticationFailed(message),
            400..=499 => ApiError::ClientError { status, message },
            _ => ApiError::ServerError { status, message },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RedsyncError {
    fn from(err: std::io::Error) -> Self {
        RedsyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RedsyncError {
    fn from(err: serde_json::Error) -> Self {
        RedsyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RedsyncError {
    fn from(err: toml::de::Error) -> Self {
        RedsyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv errors
impl From<csv::Error> for RedsyncError {
    fn from(err: csv::Error) -> Self {
        RedsyncError::Csv(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redsync_error_display() {
        let err = RedsyncError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_api_error_conversion() {
        let api_err = ApiError::ConnectionFailed("Network error".to_string());
        let err: RedsyncError = api_err.into();
        assert!(matches!(err, RedsyncError::Api(_)));
    }

    #[test]
    fn test_api_error_from_status_auth() {
        let err = ApiError::from_status(403, "Forbidden".to_string());
        assert!(matches!(err, ApiError::AuthenticationFailed(_)));
    }

    #[test]
    fn test_api_error_from_status_client() {
        let err = ApiError::from_status(422, "Unprocessable".to_string());
        assert!(matches!(err, ApiError::ClientError { status: 422, .. }));
    }

    #[test]
    fn test_api_error_from_status_server() {
        let err = ApiError::from_status(503, "Unavailable".to_string());
        assert!(matches!(err, ApiError::ServerError { status: 503, .. }));
    }

    #[test]
    fn test_unknown_field_display() {
        let err = RedsyncError::UnknownField("race".to_string());
        assert!(err.to_string().contains("race"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: RedsyncError = io_err.into();
        assert!(matches!(err, RedsyncError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: RedsyncError = json_err.into();
        assert!(matches!(err, RedsyncError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: RedsyncError = toml_err.into();
        assert!(matches!(err, RedsyncError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_redsync_error_implements_std_error() {
        let err = RedsyncError::DataShape("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_api_error_implements_std_error() {
        let err = ApiError::Timeout("30s elapsed".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
