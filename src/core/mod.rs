//! Core business logic for redsync.
//!
//! This module contains the record synchronization and field-name
//! resolution logic.
//!
//! # Modules
//!
//! - [`download`] - Chunked record export with partial-failure bookkeeping
//! - [`resolver`] - Checkbox export-field-name resolution
//! - [`project`] - Project orchestration with lazily cached remote state
//! - [`textract`] - Free-text extraction and CSV reporting
//!
//! # Bulk Export Workflow
//!
//! The typical bulk export workflow:
//!
//! 1. **Connect**: Build a [`project::Project`] from configuration
//! 2. **Partition**: The downloader slices the id list into bounded batches
//! 3. **Download**: One request per batch; failures are collected, not raised
//! 4. **Resubmit**: Failed batch ids are returned for explicit retry
//! 5. **Resolve**: Checkbox queries run against the cached export field map
//!
//! # Example
//!
//! ```rust,no_run
//! use redsync::config::load_config;
//! use redsync::core::project::Project;
//! use redsync::domain::RecordId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("redsync.toml")?;
//! let project = Project::from_config(&config)?;
//!
//! let ids: Vec<RecordId> = (1..=500)
//!     .map(|n| RecordId::new(n.to_string()))
//!     .collect::<Result<_, _>>()?;
//!
//! let downloader = project.downloader(config.export.chunk_size, &config.export.extra_params)?;
//! let result = downloader.download(&ids).await?;
//!
//! println!("Succeeded: {}", result.succeeded.len());
//! println!("Failed: {}", result.failed.len());
//! # Ok(())
//! # }
//! ```

pub mod download;
pub mod project;
pub mod resolver;
pub mod textract;
