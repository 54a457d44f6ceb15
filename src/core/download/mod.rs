//! Chunked record download
//!
//! This module handles bulk record exports over unbounded id lists:
//! partitioning into bounded batches, one request per batch, and
//! partial-failure bookkeeping so a single bad batch never aborts the rest.

pub mod batch;
pub mod downloader;

pub use batch::{partition, Batches, RecordBatch};
pub use downloader::{ChunkedDownloader, DownloadResult};
