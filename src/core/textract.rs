//! Text extraction for reporting
//!
//! Pulls the values of every free-text field in a project and reshapes them
//! into flat (field, record id, value) triples, for human review of typed-in
//! answers. Bounded text fields — ids, numerics, anything not free prose —
//! are excluded by configuration.

use crate::core::project::{Project, WireList};
use crate::domain::{RecordSet, RedsyncError, Result, ResultExt};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// CSV header for the review artifact; the last column is filled in by hand
const CSV_HEADER: [&str; 4] = ["Field", "Participant ID", "Value Reported", "Action Needed"];

/// One reported text value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    /// Field the value was entered under
    pub field: String,

    /// Record the value belongs to
    pub record_id: String,

    /// The reported value, verbatim
    pub value: String,
}

/// Extracts free-text entries from a project
///
/// Wraps a [`Project`] plus the record-id field used to label entries and a
/// `bounded` set of text fields to exclude from extraction.
pub struct TextExtractor {
    project: Project,
    id_field: String,
    bounded: BTreeSet<String>,
}

impl TextExtractor {
    /// Create an extractor labeling entries by `id_field`
    pub fn new(project: Project, id_field: impl Into<String>) -> Self {
        Self {
            project,
            id_field: id_field.into(),
            bounded: BTreeSet::new(),
        }
    }

    /// Text fields that aren't free text: unique ids, numerics, and so on
    pub fn bounded(&self) -> &BTreeSet<String> {
        &self.bounded
    }

    /// Replace the bounded-field exclusion set
    pub fn set_bounded<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bounded = fields.into_iter().map(Into::into).collect();
    }

    /// The wrapped project, for cache injection
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    /// Names of all fields declared as type "text"
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the metadata fetch fails.
    pub async fn text_fields(&mut self) -> Result<BTreeSet<String>> {
        let metadata = self.project.metadata().await?;
        Ok(metadata
            .fields_of_type("text")
            .into_iter()
            .map(|f| f.field_name.clone())
            .collect())
    }

    /// Text fields minus the bounded set, sorted lexicographically
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the metadata fetch fails.
    pub async fn desired_fields(&mut self) -> Result<Vec<String>> {
        let text_fields = self.text_fields().await?;
        Ok(text_fields
            .into_iter()
            .filter(|f| !self.bounded.contains(f))
            .collect())
    }

    /// Pull every desired value as (field, record id, value) triples
    ///
    /// Requests the id field plus every desired field, then reshapes the
    /// record-major payload into field-major triples. Empty values are
    /// skipped. Triples are ordered by field, then by record id ascending.
    /// Values are opaque strings, never coerced.
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the export fails, and `DataShape` if a
    /// record lacks the id field or carries a non-string value.
    pub async fn pull_desired(
        &mut self,
        extra: &BTreeMap<String, String>,
    ) -> Result<Vec<TextEntry>> {
        let desired = self.desired_fields().await?;

        let mut fields = Vec::with_capacity(desired.len() + 1);
        fields.push(self.id_field.clone());
        fields.extend(desired.iter().cloned());

        let payload = self
            .project
            .get_records(None, Some(WireList::Items(fields)), extra)
            .await?;
        let records = RecordSet::from_value(payload)?;

        // Label rows by record id and fix the row order once
        let mut rows = Vec::with_capacity(records.len());
        for record in records.iter() {
            let record_id = record.get_str(&self.id_field)?.ok_or_else(|| {
                RedsyncError::DataShape(format!(
                    "record is missing the id field '{}'",
                    self.id_field
                ))
            })?;
            rows.push((record_id.to_string(), record));
        }
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let mut entries = Vec::new();
        for field in &desired {
            for (record_id, record) in &rows {
                if let Some(value) = record.get_str(field)? {
                    if !value.is_empty() {
                        entries.push(TextEntry {
                            field: field.clone(),
                            record_id: record_id.clone(),
                            value: value.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            fields = desired.len(),
            entries = entries.len(),
            "Pulled text entries"
        );

        Ok(entries)
    }

    /// Pull desired values and write them as a review CSV
    ///
    /// The artifact has the header `Field,Participant ID,Value Reported,
    /// Action Needed`, with the last column left empty for reviewers.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`TextExtractor::pull_desired`], plus `Csv`/`Io`
    /// errors from writing the file.
    pub async fn pull_to_csv(
        &mut self,
        path: impl AsRef<Path>,
        extra: &BTreeMap<String, String>,
    ) -> Result<()> {
        let path = path.as_ref();
        let entries = self.pull_desired(extra).await?;

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to open report file: {}", path.display()))?;
        writer.write_record(CSV_HEADER)?;
        for entry in &entries {
            writer.write_record([
                entry.field.as_str(),
                entry.record_id.as_str(),
                entry.value.as_str(),
                "",
            ])?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush report file: {}", path.display()))?;

        tracing::info!(path = %path.display(), rows = entries.len(), "Wrote text report");
        Ok(())
    }
}
