//! Extracted records and the artifacts they are published as

use crate::category::Category;
use crate::identifier::Identifier;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured output of running one document through the extraction service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedRecord(Map<String, Value>);

impl ExtractedRecord {
    /// Wrap an already-conformed JSON object
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get a field value if it is a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Number of populated fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// One extracted record ready to be persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    /// Category the record belongs to
    pub category: Category,

    /// Derived business identifier
    pub identifier: Identifier,

    /// The record itself
    pub record: ExtractedRecord,
}

impl Artifact {
    /// Create a new artifact
    pub fn new(category: Category, identifier: Identifier, record: ExtractedRecord) -> Self {
        Self {
            category,
            identifier,
            record,
        }
    }

    /// Logical location, `category/identifier`
    ///
    /// # Examples
    ///
    /// ```
    /// use docflow_domain::{Artifact, Category, ExtractedRecord, Identifier};
    ///
    /// let artifact = Artifact::new(
    ///     Category::catalogs(),
    ///     Identifier::new("Q1_2024").unwrap(),
    ///     ExtractedRecord::default(),
    /// );
    /// assert_eq!(artifact.location(), "catalogs/Q1_2024");
    /// ```
    pub fn location(&self) -> String {
        format!("{}/{}", self.category, self.identifier)
    }

    /// Serialized body, pretty-printed JSON with two-space indentation
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.record)
    }
}
