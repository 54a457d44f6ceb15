//! Chunked, partial-failure-aware record downloader
//!
//! One export request per batch, issued and awaited sequentially. A batch
//! that fails at the transport level is recorded and the remaining batches
//! still run; the caller decides whether to resubmit the failures.

use super::batch::{partition, Batches, RecordBatch};
use crate::adapters::redcap::Requester;
use crate::domain::{RecordId, RedsyncError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Outcome of one bulk download call
///
/// Every dispatched batch lands in exactly one of the two lists, in input
/// batch order. Batches abandoned after a shutdown signal appear in neither.
#[derive(Debug, Clone, Default)]
pub struct DownloadResult {
    /// Batches that exported, each with its parsed JSON payload
    pub succeeded: Vec<(RecordBatch, Value)>,

    /// Batches whose request failed at the transport level
    pub failed: Vec<RecordBatch>,
}

impl DownloadResult {
    /// Number of batches actually dispatched
    pub fn dispatched(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether every dispatched batch succeeded
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Flattened ids of all failed batches, for explicit resubmission
    pub fn failed_ids(&self) -> Vec<RecordId> {
        self.failed
            .iter()
            .flat_map(|batch| batch.ids().iter().cloned())
            .collect()
    }

    /// Parsed payloads of the successful batches, in dispatch order
    pub fn payloads(&self) -> impl Iterator<Item = &Value> {
        self.succeeded.iter().map(|(_, payload)| payload)
    }
}

/// Downloads record exports one bounded batch at a time
///
/// Holds an immutable chunk size, a static parameter set sanitized once at
/// construction, and a shared requester. Requests run strictly one at a
/// time; an optional shutdown signal is checked between batches.
pub struct ChunkedDownloader {
    requester: Arc<dyn Requester>,
    chunk_size: usize,
    static_params: BTreeMap<String, String>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl std::fmt::Debug for ChunkedDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedDownloader")
            .field("chunk_size", &self.chunk_size)
            .field("static_params", &self.static_params)
            .field("shutdown", &self.shutdown.is_some())
            .finish_non_exhaustive()
    }
}

impl ChunkedDownloader {
    /// Create a downloader with pre-sanitized static parameters
    ///
    /// `extra_params` are sent with every batch request; their values are
    /// passed through [`Requester::sanitize_param`] here, once, not per
    /// batch.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if `chunk_size` is zero.
    pub fn new(
        requester: Arc<dyn Requester>,
        chunk_size: usize,
        extra_params: &BTreeMap<String, String>,
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RedsyncError::Configuration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        let static_params = extra_params
            .iter()
            .map(|(key, value)| (key.clone(), requester.sanitize_param(value)))
            .collect();

        Ok(Self {
            requester,
            chunk_size,
            static_params,
            shutdown: None,
        })
    }

    /// Attach a shutdown signal checked between batches
    ///
    /// When the signal reads true, the remaining batches are abandoned and
    /// the partial result so far is returned; abandoned batches appear in
    /// neither outcome list.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// The configured batch size
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Partition `ids` into dispatch batches
    ///
    /// The returned sequence is finite and consumed once per download call;
    /// it operates on a private copy of `ids`.
    pub fn partition(&self, ids: &[RecordId]) -> Result<Batches> {
        partition(ids, self.chunk_size)
    }

    /// Export every id, one batch request at a time
    ///
    /// Each batch payload is `content=record` plus the static parameters
    /// plus the batch's comma-joined `records` list. A transport failure
    /// routes the batch to `failed` and the loop continues; no batch can
    /// abort the rest. No automatic retry happens here — resubmit
    /// [`DownloadResult::failed_ids`] explicitly if desired.
    ///
    /// # Errors
    ///
    /// Transport errors never propagate. Anything else (a non-transport
    /// error from the requester) surfaces immediately.
    pub async fn download(&self, ids: &[RecordId]) -> Result<DownloadResult> {
        let mut result = DownloadResult::default();

        for batch in self.partition(ids)? {
            if self.shutdown_requested() {
                tracing::warn!(
                    dispatched = result.dispatched(),
                    "Shutdown requested, abandoning remaining batches"
                );
                break;
            }

            let payload = self.batch_payload(&batch);
            match self.requester.post(&payload).await {
                Ok(value) => {
                    tracing::debug!(batch_len = batch.len(), "Batch exported");
                    result.succeeded.push((batch, value));
                }
                Err(RedsyncError::Api(e)) => {
                    tracing::warn!(
                        batch_len = batch.len(),
                        error = %e,
                        "Batch export failed, continuing with remaining batches"
                    );
                    result.failed.push(batch);
                }
                Err(other) => return Err(other),
            }
        }

        tracing::info!(
            succeeded = result.succeeded.len(),
            failed = result.failed.len(),
            "Chunked download finished"
        );

        Ok(result)
    }

    fn batch_payload(&self, batch: &RecordBatch) -> BTreeMap<String, String> {
        let mut payload = BTreeMap::new();
        payload.insert("content".to_string(), "record".to_string());
        for (key, value) in &self.static_params {
            payload.insert(key.clone(), value.clone());
        }
        payload.insert("records".to_string(), batch.to_wire());
        payload
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiError, FieldDescriptor, MetadataField};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory requester that records every payload and fails on demand
    struct ScriptedRequester {
        calls: Mutex<Vec<BTreeMap<String, String>>>,
        fail_on_records: Vec<String>,
    }

    impl ScriptedRequester {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on_records: Vec::new(),
            }
        }

        fn failing_on(records: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on_records: records.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call(&self, index: usize) -> BTreeMap<String, String> {
            self.calls.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl Requester for ScriptedRequester {
        async fn post(&self, payload: &BTreeMap<String, String>) -> Result<Value> {
            self.calls.lock().unwrap().push(payload.clone());
            let records = payload.get("records").cloned().unwrap_or_default();
            if self.fail_on_records.contains(&records) {
                return Err(RedsyncError::Api(ApiError::ServerError {
                    status: 500,
                    message: "injected".to_string(),
                }));
            }
            Ok(json!([{"record_id": records}]))
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

    fn ids(names: &[&str]) -> Vec<RecordId> {
        names
            .iter()
            .map(|n| RecordId::new(*n).unwrap())
            .collect()
    }

    #[test]
    fn test_constructor_rejects_zero_chunk_size() {
        let requester = Arc::new(ScriptedRequester::new());
        let err = ChunkedDownloader::new(requester, 0, &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, RedsyncError::Configuration(_)));
    }

    #[test]
    fn test_static_params_sanitized_at_construction() {
        let requester = Arc::new(ScriptedRequester::new());
        let mut extra = BTreeMap::new();
        extra.insert("rawOrLabel".to_string(), "  raw\n".to_string());

        let downloader = ChunkedDownloader::new(requester, 2, &extra).unwrap();
        assert_eq!(
            downloader.static_params.get("rawOrLabel").map(String::as_str),
            Some("raw")
        );
    }

    #[tokio::test]
    async fn test_download_dispatches_one_request_per_batch() {
        let requester = Arc::new(ScriptedRequester::new());
        let downloader = ChunkedDownloader::new(requester.clone(), 2, &BTreeMap::new()).unwrap();

        let result = downloader.download(&ids(&["A", "B", "C", "D", "E"])).await.unwrap();

        assert_eq!(requester.call_count(), 3);
        assert_eq!(result.succeeded.len(), 3);
        assert!(result.failed.is_empty());
        assert!(result.is_complete());

        let first = requester.call(0);
        assert_eq!(first.get("content").map(String::as_str), Some("record"));
        assert_eq!(first.get("records").map(String::as_str), Some("A,B"));
        assert_eq!(
            requester.call(2).get("records").map(String::as_str),
            Some("E")
        );
    }

    #[tokio::test]
    async fn test_download_includes_static_params_per_batch() {
        let requester = Arc::new(ScriptedRequester::new());
        let mut extra = BTreeMap::new();
        extra.insert("rawOrLabel".to_string(), "raw".to_string());

        let downloader = ChunkedDownloader::new(requester.clone(), 2, &extra).unwrap();
        downloader.download(&ids(&["A", "B", "C"])).await.unwrap();

        for i in 0..requester.call_count() {
            assert_eq!(
                requester.call(i).get("rawOrLabel").map(String::as_str),
                Some("raw")
            );
        }
    }

    #[tokio::test]
    async fn test_download_is_partition_exhaustive() {
        let requester = Arc::new(ScriptedRequester::failing_on(&["C,D"]));
        let downloader = ChunkedDownloader::new(requester.clone(), 2, &BTreeMap::new()).unwrap();

        let result = downloader.download(&ids(&["A", "B", "C", "D", "E"])).await.unwrap();

        assert_eq!(result.dispatched(), requester.call_count());
        assert_eq!(result.succeeded.len() + result.failed.len(), 3);
    }

    #[tokio::test]
    async fn test_failure_isolation() {
        let requester = Arc::new(ScriptedRequester::failing_on(&["C,D"]));
        let downloader = ChunkedDownloader::new(requester.clone(), 2, &BTreeMap::new()).unwrap();

        let result = downloader.download(&ids(&["A", "B", "C", "D", "E"])).await.unwrap();

        // The failing batch never aborts the rest, and order is preserved
        assert_eq!(requester.call_count(), 3);
        assert_eq!(result.succeeded.len(), 2);
        assert_eq!(result.succeeded[0].0.to_wire(), "A,B");
        assert_eq!(result.succeeded[1].0.to_wire(), "E");
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].to_wire(), "C,D");
    }

    #[tokio::test]
    async fn test_failed_ids_flatten_for_resubmission() {
        let requester = Arc::new(ScriptedRequester::failing_on(&["A,B", "E"]));
        let downloader = ChunkedDownloader::new(requester, 2, &BTreeMap::new()).unwrap();

        let result = downloader.download(&ids(&["A", "B", "C", "D", "E"])).await.unwrap();

        assert_eq!(result.failed_ids(), ids(&["A", "B", "E"]));
    }

    #[tokio::test]
    async fn test_empty_ids_dispatch_nothing() {
        let requester = Arc::new(ScriptedRequester::new());
        let downloader = ChunkedDownloader::new(requester.clone(), 2, &BTreeMap::new()).unwrap();

        let result = downloader.download(&[]).await.unwrap();

        assert_eq!(requester.call_count(), 0);
        assert_eq!(result.dispatched(), 0);
        assert!(result.is_complete());
    }

    #[tokio::test]
    async fn test_shutdown_signal_abandons_remaining_batches() {
        let requester = Arc::new(ScriptedRequester::new());
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let downloader = ChunkedDownloader::new(requester.clone(), 2, &BTreeMap::new())
            .unwrap()
            .with_shutdown(rx);

        let result = downloader.download(&ids(&["A", "B", "C"])).await.unwrap();

        // Abandoned batches land in neither outcome list
        assert_eq!(requester.call_count(), 0);
        assert_eq!(result.dispatched(), 0);
        assert!(result.succeeded.is_empty());
        assert!(result.failed.is_empty());
    }
}
