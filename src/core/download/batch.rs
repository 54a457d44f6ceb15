//! Record-id batching for chunked exports
//!
//! Large exports are dispatched one bounded batch of record ids at a time.
//! This module defines [`RecordBatch`] and [`partition`], which slices an id
//! list into consecutive batches without touching the caller's sequence.

use crate::domain::{RecordId, RedsyncError, Result};

/// A bounded, ordered slice of record identifiers dispatched in one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBatch {
    ids: Vec<RecordId>,
}

impl RecordBatch {
    /// Wraps an id slice as one batch
    pub fn new(ids: Vec<RecordId>) -> Self {
        Self { ids }
    }

    /// Record ids in dispatch order
    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    /// Number of ids in the batch
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the batch holds no ids
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Comma-joined wire form for the `records` parameter
    pub fn to_wire(&self) -> String {
        self.ids
            .iter()
            .map(RecordId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<Vec<RecordId>> for RecordBatch {
    fn from(ids: Vec<RecordId>) -> Self {
        Self::new(ids)
    }
}

/// Finite, non-restartable sequence of batches
///
/// Operates on a private copy of the input ids; the caller's sequence is
/// never mutated. Consecutive batches have `chunk_size` ids until fewer
/// remain, then one final shorter batch. A zero-length trailing batch is
/// never emitted: partitioning an empty id list yields no batches at all.
#[derive(Debug)]
pub struct Batches {
    ids: Vec<RecordId>,
    chunk_size: usize,
    position: usize,
}

impl Iterator for Batches {
    type Item = RecordBatch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.ids.len() {
            return None;
        }
        let end = usize::min(self.position + self.chunk_size, self.ids.len());
        let batch = RecordBatch::new(self.ids[self.position..end].to_vec());
        self.position = end;
        Some(batch)
    }
}

/// Partitions `ids` into consecutive batches of at most `chunk_size`
///
/// # Errors
///
/// Returns a `Configuration` error if `chunk_size` is zero.
pub fn partition(ids: &[RecordId], chunk_size: usize) -> Result<Batches> {
    if chunk_size == 0 {
        return Err(RedsyncError::Configuration(
            "chunk_size must be greater than 0".to_string(),
        ));
    }
    Ok(Batches {
        ids: ids.to_vec(),
        chunk_size,
        position: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn ids(names: &[&str]) -> Vec<RecordId> {
        names
            .iter()
            .map(|n| RecordId::new(*n).unwrap())
            .collect()
    }

    #[test]
    fn test_partition_five_ids_chunk_two() {
        let ids = ids(&["A", "B", "C", "D", "E"]);
        let batches: Vec<RecordBatch> = partition(&ids, 2).unwrap().collect();

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].to_wire(), "A,B");
        assert_eq!(batches[1].to_wire(), "C,D");
        assert_eq!(batches[2].to_wire(), "E");
    }

    #[test_case(1, 10 ; "chunk of one")]
    #[test_case(3, 4 ; "uneven remainder")]
    #[test_case(5, 2 ; "exact multiple")]
    #[test_case(100, 1 ; "chunk larger than input")]
    fn test_partition_batch_count(chunk_size: usize, expected_batches: usize) {
        let ids = ids(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
        let batches: Vec<RecordBatch> = partition(&ids, chunk_size).unwrap().collect();

        assert_eq!(batches.len(), expected_batches);
        // ceil(len / chunk_size)
        assert_eq!(batches.len(), ids.len().div_ceil(chunk_size));
    }

    #[test]
    fn test_partition_concatenation_reproduces_input() {
        let ids = ids(&["A", "B", "C", "D", "E", "F", "G"]);
        let rejoined: Vec<RecordId> = partition(&ids, 3)
            .unwrap()
            .flat_map(|batch| batch.ids().to_vec())
            .collect();

        assert_eq!(rejoined, ids);
    }

    #[test]
    fn test_partition_all_full_except_possibly_last() {
        let ids = ids(&["A", "B", "C", "D", "E", "F", "G"]);
        let batches: Vec<RecordBatch> = partition(&ids, 3).unwrap().collect();

        for batch in &batches[..batches.len() - 1] {
            assert_eq!(batch.len(), 3);
        }
        assert!(batches.last().unwrap().len() <= 3);
    }

    #[test]
    fn test_partition_empty_input_yields_no_batches() {
        let batches: Vec<RecordBatch> = partition(&[], 5).unwrap().collect();
        assert!(batches.is_empty());
    }

    #[test]
    fn test_partition_exact_multiple_has_no_empty_trailer() {
        let ids = ids(&["A", "B", "C", "D"]);
        let batches: Vec<RecordBatch> = partition(&ids, 2).unwrap().collect();

        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| !b.is_empty()));
    }

    #[test]
    fn test_partition_zero_chunk_size_fails() {
        let ids = ids(&["A"]);
        let err = partition(&ids, 0).unwrap_err();
        assert!(matches!(err, RedsyncError::Configuration(_)));
    }

    #[test]
    fn test_partition_does_not_consume_caller_input() {
        let ids = ids(&["A", "B", "C"]);
        let _batches: Vec<RecordBatch> = partition(&ids, 2).unwrap().collect();

        // Caller's sequence is untouched after full consumption
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_batch_to_wire_single_id() {
        let batch = RecordBatch::new(vec![RecordId::new("42").unwrap()]);
        assert_eq!(batch.to_wire(), "42");
    }
}
