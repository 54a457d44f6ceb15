// Redsync - REDCap record synchronization client
// Copyright (c) 2026 Redsync Contributors
// Licensed under the MIT License

//! # Redsync - REDCap record synchronization client
//!
//! Redsync is a client-side access layer for the REDCap clinical-data-capture
//! REST API. It authenticates with a per-project token, retrieves project
//! metadata, exports records in bounded chunks with partial-failure
//! bookkeeping, and resolves the platform's checkbox field-naming scheme.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Downloading** record exports one bounded batch at a time, collecting
//!   failed batches instead of aborting
//! - **Resolving** checkbox fields to their exported per-choice field names
//! - **Caching** project metadata, the export field map, and the server
//!   version, with fixture injection for tests
//! - **Extracting** free-text entries into flat triples and CSV reports
//!
//! ## Architecture
//!
//! Redsync follows a layered architecture:
//!
//! - [`core`] - Business logic (download, resolver, project, textract)
//! - [`adapters`] - External integration (the REDCap requester)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redsync::config::load_config;
//! use redsync::core::project::Project;
//! use redsync::domain::RecordId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = load_config("redsync.toml")?;
//!
//!     // Connect to the project
//!     let mut project = Project::from_config(&config)?;
//!     println!("Server version: {}", project.version().await?);
//!
//!     // Export records in chunks
//!     let ids = vec![RecordId::new("1")?, RecordId::new("2")?];
//!     let downloader =
//!         project.downloader(config.export.chunk_size, &config.export.extra_params)?;
//!     let result = downloader.download(&ids).await?;
//!
//!     println!("Exported {} batches", result.succeeded.len());
//!     if !result.is_complete() {
//!         // Failed batches never abort the rest; resubmit them explicitly
//!         let retry = downloader.download(&result.failed_ids()).await?;
//!         println!("Retry exported {} batches", retry.succeeded.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Checkbox Fields
//!
//! REDCap exports each checkbox option under a generated field name
//! (`field` + `___` + coded choice). The export field map answers which
//! export names stand behind a base field:
//!
//! ```rust,no_run
//! # async fn example(project: &mut redsync::core::project::Project) -> redsync::domain::Result<()> {
//! let names = project.cbnames("meds").await?;
//! assert_eq!(names, vec!["meds___1", "meds___2", "meds___999"]);
//! # Ok(())
//! # }
//! ```
//!
//! Looking up a field with no exported variants is an
//! [`domain::RedsyncError::UnknownField`] error rather than a silent
//! fallback, so typos surface early.
//!
//! ## Error Handling
//!
//! Redsync uses the [`domain::RedsyncError`] type for all errors. Transport
//! failures during a chunked download are collected per batch and returned
//! in the result; everything else surfaces immediately:
//!
//! ```rust,no_run
//! use redsync::domain::RedsyncError;
//!
//! fn example() -> Result<(), RedsyncError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = redsync::config::load_config("redsync.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Redsync uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting chunked download");
//! warn!(batch_len = 50, "Batch export failed, continuing");
//! ```

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
