//! External system integrations for redsync.
//!
//! This module provides adapters for integrating with external systems:
//!
//! - [`redcap`] - REDCap server integration (trait-based requester)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with mock implementations. Everything above this layer
//! talks to the server through the [`redcap::Requester`] trait, so tests can
//! substitute an in-memory implementation and integration tests can point the
//! HTTP implementation at a mock server.
//!
//! ```rust,no_run
//! use redsync::adapters::redcap::{HttpRequester, Requester};
//! use redsync::config::{ApiConfig, secret_string};
//!
//! # async fn example() -> redsync::domain::Result<()> {
//! let config = ApiConfig {
//!     url: "https://redcap.example.edu/api/".to_string(),
//!     token: secret_string("48F35658A6AD741128CB8CE03A3774FC".to_string()),
//!     timeout_seconds: 30,
//!     tls_verify: true,
//! };
//!
//! let requester = HttpRequester::new(&config)?;
//! let version = requester.version().await?;
//! # Ok(())
//! # }
//! ```

pub mod redcap;
