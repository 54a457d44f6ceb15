//! Export-field-name resolution
//!
//! Checkbox fields export one generated field per choice, so a query like
//! "is any option of `meds` endorsed for this record" first needs the set of
//! export names behind `meds`. [`FieldResolver`] owns the derived
//! [`ExportFieldMap`] and answers those queries.

use crate::domain::{ExportFieldMap, FieldDescriptor, Record, RedsyncError, Result};
use serde_json::Value;

/// Resolves base field names to their exported variants
///
/// Built once from the `exportFieldNames` descriptors; immutable afterwards.
/// Only fields with at least one differing export name are resolvable —
/// looking up any other name is an [`RedsyncError::UnknownField`] error
/// rather than a fallback to the name itself, so typos surface instead of
/// silently matching nothing. Callers wanting exports-as-itself semantics
/// check [`ExportFieldMap::contains`] on [`FieldResolver::map`] first.
#[derive(Debug, Clone, Default)]
pub struct FieldResolver {
    map: ExportFieldMap,
}

impl FieldResolver {
    /// Builds a resolver from export field name descriptors
    pub fn build(descriptors: &[FieldDescriptor]) -> Self {
        Self {
            map: ExportFieldMap::build(descriptors),
        }
    }

    /// Wraps an already-built export field map
    pub fn from_map(map: ExportFieldMap) -> Self {
        Self { map }
    }

    /// The underlying export field map
    pub fn map(&self) -> &ExportFieldMap {
        &self.map
    }

    /// Export names for `field_name`, in first-seen descriptor order
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if the field has no exported variants.
    pub fn export_names(&self, field_name: &str) -> Result<&[String]> {
        self.map
            .get(field_name)
            .ok_or_else(|| RedsyncError::UnknownField(field_name.to_string()))
    }

    /// Whether any choice of `field_name` is endorsed in `record`
    ///
    /// Scans the field's export names and returns true on the first
    /// non-zero flag. An export name missing from the record, or carrying an
    /// empty string, counts as not endorsed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if the field has no exported variants, and
    /// `DataShape` if a present value is not an integer-like flag — that
    /// means the record does not match the project metadata and the caller
    /// must resolve the mismatch.
    pub fn any_endorsed(&self, record: &Record, field_name: &str) -> Result<bool> {
        for export_name in self.export_names(field_name)? {
            if endorsement_flag(record, export_name)? != 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Reads the integer flag stored at `export_name`, treating absent and
/// empty values as zero.
fn endorsement_flag(record: &Record, export_name: &str) -> Result<i64> {
    let value = match record.get(export_name) {
        None => return Ok(0),
        Some(value) => value,
    };

    match value {
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            RedsyncError::DataShape(format!(
                "expected integer flag at '{export_name}', got: '{s}'"
            ))
        }),
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            RedsyncError::DataShape(format!(
                "expected integer flag at '{export_name}', got: {n}"
            ))
        }),
        other => Err(RedsyncError::DataShape(format!(
            "expected integer flag at '{export_name}', got: {other}"
        ))),
    }
}
