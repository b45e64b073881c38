//! Schema module - structural contracts extracted records must conform to
//!
//! A [`SchemaDescription`] is sent to the extraction service (rendered as JSON
//! Schema) and checked against whatever payload comes back ([`SchemaDescription::conform`]).

use crate::record::ExtractedRecord;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};
use thiserror::Error;

/// Semantic type of a schema field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text
    String,

    /// Whole number
    Integer,

    /// Decimal number (prices, totals)
    Decimal,

    /// Nested list of sub-records, each conforming to the inner schema
    List(SchemaDescription),
}

/// Whether a field must be present in an extracted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Field must be present and non-null
    Required,

    /// Field may be absent; `default` is filled in when it is
    Optional {
        /// Value used when the field is absent or null
        default: Value,
    },
}

/// Specification of a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it appears in the record
    pub name: String,

    /// Human-readable description, passed to the extraction service
    pub description: String,

    /// Semantic type
    pub field_type: FieldType,

    /// Optionality and default
    pub requirement: Requirement,
}

impl FieldSpec {
    /// Create a required field
    pub fn required(
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            field_type,
            requirement: Requirement::Required,
        }
    }

    /// Create an optional field with a default
    pub fn optional(
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
        default: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            field_type,
            requirement: Requirement::Optional { default },
        }
    }

    /// Check if the field is required
    pub fn is_required(&self) -> bool {
        matches!(self.requirement, Requirement::Required)
    }
}

/// Ordered set of field specifications describing one record type
///
/// # Examples
///
/// ```
/// use docflow_domain::{FieldSpec, FieldType, SchemaDescription};
/// use serde_json::json;
///
/// let schema = SchemaDescription::new("Catalog")
///     .with_field(FieldSpec::required("catalog_period", FieldType::String, "Catalog period"));
///
/// let record = schema.conform(&json!({"catalog_period": "Q1 2024"})).unwrap();
/// assert_eq!(record.get_str("catalog_period"), Some("Q1 2024"));
/// assert!(schema.conform(&json!({})).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescription {
    /// Record type name (e.g. `Order`)
    pub title: String,

    /// Fields in declaration order
    pub fields: Vec<FieldSpec>,
}

/// A payload that does not match its schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaViolation {
    /// Expected a JSON object
    #[error("{path}: expected an object, found {found}")]
    NotAnObject {
        /// Location within the payload
        path: String,
        /// JSON kind that was found
        found: &'static str,
    },

    /// Required field absent or null
    #[error("{path}: required field is missing")]
    MissingField {
        /// Location within the payload
        path: String,
    },

    /// Value has the wrong type
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Location within the payload
        path: String,
        /// Expected semantic type
        expected: &'static str,
        /// JSON kind that was found
        found: &'static str,
    },
}

impl SchemaDescription {
    /// Create an empty schema
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Render as a JSON Schema object
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut property = field.field_type.to_json_schema();
            property.insert("description".to_string(), json!(field.description));
            match &field.requirement {
                Requirement::Required => required.push(json!(field.name)),
                Requirement::Optional { default } => {
                    property.insert("default".to_string(), default.clone());
                }
            }
            properties.insert(field.name.clone(), Value::Object(property));
        }

        json!({
            "title": self.title,
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check a payload against this schema and normalize it
    ///
    /// Missing optional fields take their default, numeric strings are
    /// coerced for numeric fields, and fields the schema does not declare
    /// are dropped.
    pub fn conform(&self, value: &Value) -> Result<ExtractedRecord, SchemaViolation> {
        self.conform_object(value, "$").map(ExtractedRecord::from_map)
    }

    fn conform_object(&self, value: &Value, path: &str) -> Result<Map<String, Value>, SchemaViolation> {
        let object = value.as_object().ok_or_else(|| SchemaViolation::NotAnObject {
            path: path.to_string(),
            found: kind_of(value),
        })?;

        let mut conformed = Map::new();
        for field in &self.fields {
            let field_path = format!("{}.{}", path, field.name);
            match object.get(&field.name).filter(|v| !v.is_null()) {
                Some(v) => {
                    let coerced = field.field_type.coerce(v, &field_path)?;
                    conformed.insert(field.name.clone(), coerced);
                }
                None => match &field.requirement {
                    Requirement::Required => {
                        return Err(SchemaViolation::MissingField { path: field_path });
                    }
                    Requirement::Optional { default } => {
                        conformed.insert(field.name.clone(), default.clone());
                    }
                },
            }
        }
        Ok(conformed)
    }
}

impl FieldType {
    /// Type name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::List(_) => "list",
        }
    }

    fn to_json_schema(&self) -> Map<String, Value> {
        let mut property = Map::new();
        match self {
            FieldType::String => {
                property.insert("type".to_string(), json!("string"));
            }
            FieldType::Integer => {
                property.insert("type".to_string(), json!("integer"));
            }
            FieldType::Decimal => {
                property.insert("type".to_string(), json!("number"));
            }
            FieldType::List(inner) => {
                property.insert("type".to_string(), json!("array"));
                property.insert("items".to_string(), inner.to_json_schema());
            }
        }
        property
    }

    fn coerce(&self, value: &Value, path: &str) -> Result<Value, SchemaViolation> {
        let mismatch = || SchemaViolation::TypeMismatch {
            path: path.to_string(),
            expected: self.name(),
            found: kind_of(value),
        };

        match self {
            FieldType::String => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(mismatch()),
            },
            FieldType::Integer => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
                Value::Number(n) => match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(json!(f as i64)),
                    _ => Err(mismatch()),
                },
                Value::String(s) => s.trim().parse::<i64>().map(|i| json!(i)).map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
            FieldType::Decimal => match value {
                Value::Number(_) => Ok(value.clone()),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(mismatch),
                _ => Err(mismatch()),
            },
            FieldType::List(inner) => {
                let items = value.as_array().ok_or_else(mismatch)?;
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| {
                        inner
                            .conform_object(item, &format!("{}[{}]", path, idx))
                            .map(Value::Object)
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
