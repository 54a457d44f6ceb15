//! Record value containers
//!
//! A record export response is a JSON array with one object per record,
//! keyed by export field names. [`Record`] wraps one such object and
//! [`RecordSet`] wraps the parsed array, with shape validation at the
//! parse boundary.

use crate::domain::errors::RedsyncError;
use crate::domain::result::Result;
use serde_json::{Map, Value};

/// One exported record: field name to raw value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: Map<String, Value>,
}

impl Record {
    /// Wraps a parsed record object
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Raw value at `field_name`, if present
    pub fn get(&self, field_name: &str) -> Option<&Value> {
        self.values.get(field_name)
    }

    /// String value at `field_name`
    ///
    /// # Errors
    ///
    /// Returns `DataShape` if the value is present but not a JSON string.
    /// Record exports carry every value as a string; anything else means the
    /// payload does not match the project metadata.
    pub fn get_str(&self, field_name: &str) -> Result<Option<&str>> {
        match self.values.get(field_name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(RedsyncError::DataShape(format!(
                "expected string value for field '{field_name}', got: {other}"
            ))),
        }
    }

    /// Field names present on this record
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of fields on this record
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record carries no fields
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

/// The parsed array-of-records payload of a record export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Parses a record export response
    ///
    /// # Errors
    ///
    /// Returns `DataShape` if the payload is not an array of objects.
    pub fn from_value(payload: Value) -> Result<Self> {
        let rows = match payload {
            Value::Array(rows) => rows,
            other => {
                return Err(RedsyncError::DataShape(format!(
                    "expected an array of records, got: {other}"
                )))
            }
        };

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match row {
                Value::Object(values) => records.push(Record::new(values)),
                other => {
                    return Err(RedsyncError::DataShape(format!(
                        "expected a record object, got: {other}"
                    )))
                }
            }
        }
        Ok(Self { records })
    }

    /// Records in response order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
