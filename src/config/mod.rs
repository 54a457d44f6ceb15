//! Configuration management for redsync.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use redsync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("redsync.toml")?;
//!
//! println!("API endpoint: {}", config.api.url);
//! println!("Chunk size: {}", config.export.chunk_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ApiConfig`] - REDCap endpoint, token, timeout, TLS
//! - [`ExportConfig`] - Chunk size and static export parameters
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! url = "https://redcap.example.edu/api/"
//! token = "${REDCAP_API_TOKEN}"
//!
//! [export]
//! chunk_size = 100
//!
//! [export.extra_params]
//! rawOrLabel = "raw"
//! ```
//!
//! # Environment Variables
//!
//! Use `${VAR_NAME}` syntax for substitution inside the TOML file, and
//! `REDSYNC_<SECTION>_<KEY>` variables (e.g. `REDSYNC_API_TOKEN`) to
//! override loaded values.
//!
//! Configuration is validated on load; invalid values (a zero chunk size,
//! a malformed URL, an empty token) fail fast with a `Configuration` error.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{ApiConfig, ApplicationConfig, ExportConfig, LoggingConfig, RedsyncConfig};
pub use secret::{secret_string, SecretString, SecretValue};
