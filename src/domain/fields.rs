//! Export field name descriptors and the derived field map
//!
//! REDCap explodes each checkbox field into one export field per choice
//! (`field_name` + triple underscore + coded value). The `exportFieldNames`
//! API call returns one [`FieldDescriptor`] per exported field; this module
//! defines that wire row and [`ExportFieldMap`], the derived mapping from a
//! base field name to its exported variants.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row of the `exportFieldNames` payload
///
/// For non-checkbox fields `export_field_name` equals `original_field_name`
/// and `choice_value` is empty. For checkbox fields there is one descriptor
/// per choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as defined in the data dictionary
    pub original_field_name: String,

    /// Raw coded value for a checkbox choice; empty for non-checkbox fields
    #[serde(default)]
    pub choice_value: String,

    /// Export/import-specific version of the field name
    pub export_field_name: String,
}

impl FieldDescriptor {
    /// Creates a descriptor from its three wire attributes
    pub fn new(
        original_field_name: impl Into<String>,
        choice_value: impl Into<String>,
        export_field_name: impl Into<String>,
    ) -> Self {
        Self {
            original_field_name: original_field_name.into(),
            choice_value: choice_value.into(),
            export_field_name: export_field_name.into(),
        }
    }

    /// Whether this field exports under a generated name
    pub fn is_exploded(&self) -> bool {
        self.original_field_name != self.export_field_name
    }
}

/// Mapping from a base field name to its exported sub-field names
///
/// Only fields with at least one differing export name appear as keys; a
/// name absent from the map exports as itself. Every key maps to a non-empty
/// sequence in first-seen order. The map is built once from metadata and is
/// immutable afterwards; rebuilding replaces it atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFieldMap {
    entries: IndexMap<String, Vec<String>>,
}

impl ExportFieldMap {
    /// Builds the map from a sequence of descriptors
    ///
    /// Descriptors whose export name equals the original name are filtered
    /// out; the rest are grouped by original name, collecting export names
    /// in the order first encountered.
    pub fn build(descriptors: &[FieldDescriptor]) -> Self {
        let mut entries: IndexMap<String, Vec<String>> = IndexMap::new();
        for descriptor in descriptors.iter().filter(|d| d.is_exploded()) {
            entries
                .entry(descriptor.original_field_name.clone())
                .or_default()
                .push(descriptor.export_field_name.clone());
        }
        Self { entries }
    }

    /// Export names for a field, or `None` if the field exports as itself
    pub fn get(&self, field_name: &str) -> Option<&[String]> {
        self.entries.get(field_name).map(Vec::as_slice)
    }

    /// Whether the field has exported variants
    pub fn contains(&self, field_name: &str) -> bool {
        self.entries.contains_key(field_name)
    }

    /// Number of fields with exported variants
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field has exported variants
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in build order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
