//! Data dictionary domain model
//!
//! The data dictionary is the schema describing every field in a project:
//! its name, the instrument (form) it belongs to, its declared type and
//! label, and any choices or validation attached to it. It is fetched once
//! per project via the metadata API call.

use serde::{Deserialize, Serialize};

/// One field definition from the project metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    /// Field name as defined in the Online Designer
    pub field_name: String,

    /// Instrument (form) the field belongs to
    #[serde(default)]
    pub form_name: String,

    /// Declared field type (text, checkbox, radio, notes, calc, ...)
    pub field_type: String,

    /// Human-readable label
    #[serde(default)]
    pub field_label: String,

    /// Raw choice/calculation string, pipe-separated for choice fields
    #[serde(default)]
    pub select_choices_or_calculations: String,

    /// Text validation type (integer, date_ymd, email, ...), if any
    #[serde(default)]
    pub text_validation_type_or_show_slider_number: String,

    /// "y" when the field is marked required
    #[serde(default)]
    pub required_field: String,
}

impl MetadataField {
    /// Whether the declared type matches `field_type`
    pub fn is_type(&self, field_type: &str) -> bool {
        self.field_type == field_type
    }
}

/// The full set of field definitions for a project
///
/// Wraps the parsed metadata payload and provides typed lookups. Field order
/// matches the project's instrument order as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataDictionary {
    fields: Vec<MetadataField>,
}

impl DataDictionary {
    /// Wraps a parsed metadata payload
    pub fn new(fields: Vec<MetadataField>) -> Self {
        Self { fields }
    }

    /// Looks up a field definition by name
    pub fn get(&self, field_name: &str) -> Option<&MetadataField> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    /// All field names in dictionary order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field_name.as_str()).collect()
    }

    /// All fields whose declared type matches `field_type`
    pub fn fields_of_type(&self, field_type: &str) -> Vec<&MetadataField> {
        self.fields.iter().filter(|f| f.is_type(field_type)).collect()
    }

    /// Number of field definitions
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the dictionary holds no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates field definitions in dictionary order
    pub fn iter(&self) -> impl Iterator<Item = &MetadataField> {
        self.fields.iter()
    }
}

impl From<Vec<MetadataField>> for DataDictionary {
    fn from(fields: Vec<MetadataField>) -> Self {
        Self::new(fields)
    }
}
