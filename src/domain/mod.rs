//! Domain models and types for redsync.
//!
//! This module contains the core domain models, types, and business rules:
//!
//! - **Strongly-typed identifiers** ([`RecordId`])
//! - **Metadata models** ([`DataDictionary`], [`MetadataField`],
//!   [`FieldDescriptor`], [`ExportFieldMap`])
//! - **Record containers** ([`Record`], [`RecordSet`])
//! - **Error types** ([`RedsyncError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, RedsyncError>`]:
//!
//! ```rust
//! use redsync::domain::{RedsyncError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = redsync::config::load_config("redsync.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! # Type Safety
//!
//! Record identifiers use the newtype pattern so they cannot be confused
//! with field names or raw wire strings:
//!
//! ```rust
//! use redsync::domain::RecordId;
//!
//! # fn example() -> Result<(), String> {
//! let record_id = RecordId::new("1042")?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod dictionary;
pub mod errors;
pub mod fields;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use context::ResultExt;
pub use dictionary::{DataDictionary, MetadataField};
pub use errors::{ApiError, RedsyncError};
pub use fields::{ExportFieldMap, FieldDescriptor};
pub use ids::RecordId;
pub use record::{Record, RecordSet};
pub use result::Result;
