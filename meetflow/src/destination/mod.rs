//! Contract for the external record store that receives action items.

use crate::errors::DestinationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a destination field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// The record's single mandatory title field.
    Title,
    /// Free text.
    RichText,
    /// Calendar date.
    Date,
    /// User reference.
    People,
    /// Single choice.
    Select,
    /// Multiple choice.
    MultiSelect,
    /// Number.
    Number,
    /// Any type meetflow does not write to.
    #[serde(other)]
    Other,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Date => "date",
            Self::People => "people",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Number => "number",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// The destination's declared fields, by name.
pub type FieldCatalog = BTreeMap<String, FieldType>;

/// A value written to one destination field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Title text.
    Title(String),
    /// Free text.
    RichText(String),
    /// `YYYY-MM-DD` date.
    Date(String),
}

impl PropertyValue {
    /// Returns the textual content.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Title(s) | Self::RichText(s) | Self::Date(s) => s,
        }
    }

    /// Renders the value in the block shape document databases expect.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Title(s) => json!({ "title": [{ "text": { "content": s } }] }),
            Self::RichText(s) => json!({ "rich_text": [{ "text": { "content": s } }] }),
            Self::Date(s) => json!({ "date": { "start": s } }),
        }
    }
}

/// One record to create in the destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordPayload {
    /// Field name to value.
    pub properties: BTreeMap<String, PropertyValue>,
}

impl RecordPayload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field.
    pub fn insert(&mut self, field: impl Into<String>, value: PropertyValue) {
        self.properties.insert(field.into(), value);
    }

    /// Returns a field's value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&PropertyValue> {
        self.properties.get(field)
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.properties.contains_key(field)
    }

    /// Renders all properties as one JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Reference to a record created in the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHandle {
    /// Destination-assigned id.
    pub id: String,
    /// Link to the record, when the destination has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// External structured-record store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Destination: Send + Sync {
    /// Returns the declared field catalog.
    async fn describe_schema(&self) -> Result<FieldCatalog, DestinationError>;

    /// Creates one record.
    async fn create_record(&self, payload: RecordPayload) -> Result<RecordHandle, DestinationError>;
}
