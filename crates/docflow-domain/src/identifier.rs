//! Identifier derivation for published artifacts
//!
//! Every extracted record maps to exactly one [`Identifier`]: the normalized
//! value of its category's identifying field when there is one, otherwise a
//! synthetic `{noun}_{ordinal}` built from its position in the batch.

use crate::record::ExtractedRecord;
use crate::registry::CategorySchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Separator substituted for whitespace runs and path separators
pub const SEPARATOR: char = '_';

/// Stable string distinguishing one record's artifact within its category
///
/// Always non-empty and usable as a single storage key segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Create an identifier from an already-normalized value
    ///
    /// # Errors
    /// Returns error if the value is empty, contains whitespace or a path
    /// separator, or is a relative path component (`.` / `..`)
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.is_empty() {
            return Err("Identifier cannot be empty".to_string());
        }
        if value == "." || value == ".." {
            return Err(format!("Identifier cannot be '{}'", value));
        }
        if value.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
            return Err(format!(
                "Identifier '{}' contains whitespace or a path separator",
                value
            ));
        }
        Ok(Self(value))
    }

    /// Get identifier as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// This identifier with `_{suffix}` appended
    ///
    /// # Examples
    ///
    /// ```
    /// use docflow_domain::Identifier;
    ///
    /// let id = Identifier::new("ORD-1").unwrap();
    /// assert_eq!(id.with_suffix(3).as_str(), "ORD-1_3");
    /// ```
    pub fn with_suffix(&self, suffix: usize) -> Self {
        Self(format!("{}{}{}", self.0, SEPARATOR, suffix))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        identifier.0
    }
}

/// Normalize a raw identifying value
///
/// Trims, collapses each internal whitespace run to a single `_`, and
/// replaces `/` and `\` with `_`.
///
/// # Examples
///
/// ```
/// use docflow_domain::identifier::normalize;
///
/// assert_eq!(normalize("  Q1 2024 "), "Q1_2024");
/// assert_eq!(normalize("PO 12/A"), "PO_12_A");
/// ```
pub fn normalize(raw: &str) -> String {
    let separator = SEPARATOR.to_string();
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(&separator)
        .replace(['/', '\\'], &separator)
}

/// Derive the identifier for a record at `ordinal` within its batch
///
/// Pure: the same schema, record and ordinal always give the same identifier.
///
/// # Examples
///
/// ```
/// use docflow_domain::{derive_id, SchemaRegistry, Category, ExtractedRecord};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::builtin();
/// let catalogs = registry.schema_for(&Category::catalogs()).unwrap();
///
/// let record = catalogs.schema.conform(&json!({
///     "catalog_period": "Q1 2024",
///     "products": []
/// })).unwrap();
/// assert_eq!(derive_id(catalogs, &record, 0).as_str(), "Q1_2024");
///
/// let orders = registry.schema_for(&Category::orders()).unwrap();
/// assert_eq!(derive_id(orders, &ExtractedRecord::default(), 3).as_str(), "order_3");
/// ```
pub fn derive_id(schema: &CategorySchema, record: &ExtractedRecord, ordinal: usize) -> Identifier {
    schema
        .identifying_field
        .as_deref()
        .and_then(|field| record.get(field))
        .and_then(identifying_text)
        .and_then(|raw| Identifier::new(normalize(&raw)).ok())
        .unwrap_or_else(|| fallback_id(&schema.record_noun, ordinal))
}

/// Synthetic identifier for records without a usable identifying value
pub fn fallback_id(noun: &str, ordinal: usize) -> Identifier {
    Identifier(format!("{}{}{}", normalize(noun), SEPARATOR, ordinal))
}

fn identifying_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, SchemaRegistry};
    use proptest::prelude::*;
    use serde_json::{json, Map};

    fn record(value: Value) -> ExtractedRecord {
        match value {
            Value::Object(map) => ExtractedRecord::from_map(map),
            _ => ExtractedRecord::from_map(Map::new()),
        }
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("Q1 2024"), "Q1_2024");
        assert_eq!(normalize("  Q1 \t 2024\n"), "Q1_2024");
        assert_eq!(normalize("ORD-001"), "ORD-001");
    }

    #[test]
    fn test_normalize_path_separators() {
        assert_eq!(normalize("2024/03\\15"), "2024_03_15");
    }

    #[test]
    fn test_uses_identifying_field() {
        let registry = SchemaRegistry::builtin();
        let orders = registry.schema_for(&Category::orders()).unwrap();
        let id = derive_id(orders, &record(json!({"order_id": " ORD 42 "})), 7);
        assert_eq!(id.as_str(), "ORD_42");
    }

    #[test]
    fn test_numeric_identifying_value() {
        let registry = SchemaRegistry::builtin();
        let invoices = registry.schema_for(&Category::invoices()).unwrap();
        let id = derive_id(invoices, &record(json!({"invoice_id": 1017})), 0);
        assert_eq!(id.as_str(), "1017");
    }

    #[test]
    fn test_fallback_when_missing_or_blank() {
        let registry = SchemaRegistry::builtin();
        let invoices = registry.schema_for(&Category::invoices()).unwrap();

        assert_eq!(derive_id(invoices, &record(json!({})), 2).as_str(), "invoice_2");
        assert_eq!(
            derive_id(invoices, &record(json!({"invoice_id": "   "})), 4).as_str(),
            "invoice_4"
        );
        assert_eq!(
            derive_id(invoices, &record(json!({"invoice_id": null})), 5).as_str(),
            "invoice_5"
        );
        assert_eq!(
            derive_id(invoices, &record(json!({"invoice_id": ".."})), 6).as_str(),
            "invoice_6"
        );
    }

    #[test]
    fn test_fallback_without_identifying_field() {
        let registry = SchemaRegistry::builder()
            .register(CategorySchema::new(
                Category::new("receipts").unwrap(),
                "receipt",
                crate::SchemaDescription::new("Receipt"),
                None,
            ))
            .build()
            .unwrap();
        let receipts = registry.schema_for(&Category::new("receipts").unwrap()).unwrap();
        let id = derive_id(receipts, &record(json!({"anything": "x"})), 0);
        assert_eq!(id.as_str(), "receipt_0");
    }

    #[test]
    fn test_identifier_validation() {
        assert!(Identifier::new("Q1_2024").is_ok());
        assert!(Identifier::new("").is_err());
        assert!(Identifier::new("a b").is_err());
        assert!(Identifier::new("a/b").is_err());
        assert!(Identifier::new(".").is_err());
    }

    #[test]
    fn test_suffixed_identifier_stays_valid() {
        let id = fallback_id("order", 1).with_suffix(1);
        assert_eq!(id.as_str(), "order_1_1");
        assert!(Identifier::new(id.as_str()).is_ok());
    }

    proptest! {
        #[test]
        fn prop_derive_id_is_idempotent(raw in ".{0,40}", ordinal in 0usize..10_000) {
            let registry = SchemaRegistry::builtin();
            let catalogs = registry.schema_for(&Category::catalogs()).unwrap();
            let rec = record(json!({"catalog_period": raw}));

            let first = derive_id(catalogs, &rec, ordinal);
            let second = derive_id(catalogs, &rec, ordinal);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_derived_ids_are_valid_keys(raw in ".{0,40}", ordinal in 0usize..10_000) {
            let registry = SchemaRegistry::builtin();
            let orders = registry.schema_for(&Category::orders()).unwrap();
            let id = derive_id(orders, &record(json!({"order_id": raw})), ordinal);
            prop_assert!(Identifier::new(id.as_str()).is_ok());
        }

        #[test]
        fn prop_fallback_ordinals_are_distinct(a in 0usize..10_000, b in 0usize..10_000) {
            prop_assume!(a != b);
            prop_assert_ne!(fallback_id("order", a), fallback_id("order", b));
        }
    }
}
