//! Schema registry - the fixed category → schema lookup table
//!
//! A registry is assembled once at startup and then shared immutably
//! (typically behind an `Arc`) with the orchestrator and pipeline driver.

use crate::category::Category;
use crate::schema::{FieldSpec, FieldType, SchemaDescription};
use serde_json::json;
use thiserror::Error;

/// Errors raised by registry construction and lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Category was never registered
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Category registered twice
    #[error("Category registered more than once: {0}")]
    DuplicateCategory(String),

    /// Schema declaration is inconsistent
    #[error("Invalid schema for category '{category}': {reason}")]
    InvalidSchema {
        /// Offending category
        category: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Everything the pipeline knows about one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySchema {
    /// Category this schema applies to
    pub category: Category,

    /// Singular record noun, used for fallback identifiers (`order_3`)
    pub record_noun: String,

    /// Structural contract for extracted records
    pub schema: SchemaDescription,

    /// Top-level field carrying the business identifier, if any
    pub identifying_field: Option<String>,
}

impl CategorySchema {
    /// Create a new category schema
    pub fn new(
        category: Category,
        record_noun: impl Into<String>,
        schema: SchemaDescription,
        identifying_field: Option<&str>,
    ) -> Self {
        Self {
            category,
            record_noun: record_noun.into(),
            schema,
            identifying_field: identifying_field.map(str::to_string),
        }
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidSchema {
            category: self.category.to_string(),
            reason,
        };

        if self.record_noun.trim().is_empty() {
            return Err(invalid("record noun cannot be empty".to_string()));
        }

        if let Some(name) = &self.identifying_field {
            let field = self
                .schema
                .field(name)
                .ok_or_else(|| invalid(format!("identifying field '{}' is not declared", name)))?;
            if matches!(field.field_type, FieldType::List(_)) {
                return Err(invalid(format!(
                    "identifying field '{}' must be a scalar",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Immutable category → schema mapping
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    entries: Vec<CategorySchema>,
}

/// Builder for [`SchemaRegistry`]
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    entries: Vec<CategorySchema>,
}

impl SchemaRegistryBuilder {
    /// Register a category schema
    pub fn register(mut self, entry: CategorySchema) -> Self {
        self.entries.push(entry);
        self
    }

    /// Validate and freeze the registry
    ///
    /// # Errors
    /// Fails on duplicate categories or an identifying field that is not a
    /// declared scalar field
    pub fn build(self) -> Result<SchemaRegistry, RegistryError> {
        for (idx, entry) in self.entries.iter().enumerate() {
            entry.validate()?;
            if self.entries[..idx].iter().any(|e| e.category == entry.category) {
                return Err(RegistryError::DuplicateCategory(entry.category.to_string()));
            }
        }
        Ok(SchemaRegistry {
            entries: self.entries,
        })
    }
}

impl SchemaRegistry {
    /// Start building a registry
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Registry with the built-in `orders`, `invoices` and `catalogs` schemas
    pub fn builtin() -> Self {
        Self {
            entries: vec![order_schema(), invoice_schema(), catalog_schema()],
        }
    }

    /// Look up the schema for a category
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownCategory`] if the category was never registered
    pub fn schema_for(&self, category: &Category) -> Result<&CategorySchema, RegistryError> {
        self.entries
            .iter()
            .find(|e| &e.category == category)
            .ok_or_else(|| RegistryError::UnknownCategory(category.to_string()))
    }

    /// Registered categories, in registration order
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter().map(|e| &e.category)
    }

    /// Number of registered categories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn order_schema() -> CategorySchema {
    let item = SchemaDescription::new("OrderItem")
        .with_field(FieldSpec::required("product_code", FieldType::String, "Product code"))
        .with_field(FieldSpec::required("description", FieldType::String, "Product description"))
        .with_field(FieldSpec::required("quantity", FieldType::Integer, "Quantity ordered"))
        .with_field(FieldSpec::required("unit_price", FieldType::Decimal, "Unit price"))
        .with_field(FieldSpec::required("total", FieldType::Decimal, "Line item total"));

    let order = SchemaDescription::new("Order")
        .with_field(FieldSpec::required("order_id", FieldType::String, "Order ID"))
        .with_field(FieldSpec::required("order_date", FieldType::String, "Order date"))
        .with_field(FieldSpec::required("customer_name", FieldType::String, "Customer name"))
        .with_field(FieldSpec::required("customer_email", FieldType::String, "Customer email"))
        .with_field(FieldSpec::required("items", FieldType::List(item), "Order items"))
        .with_field(FieldSpec::required("subtotal", FieldType::Decimal, "Subtotal"))
        .with_field(FieldSpec::required("tax", FieldType::Decimal, "Tax amount"))
        .with_field(FieldSpec::required("total", FieldType::Decimal, "Total amount"));

    CategorySchema::new(Category::orders(), "order", order, Some("order_id"))
}

fn invoice_schema() -> CategorySchema {
    let item = SchemaDescription::new("InvoiceItem")
        .with_field(FieldSpec::required("product_code", FieldType::String, "Product code"))
        .with_field(FieldSpec::optional(
            "description",
            FieldType::String,
            "Item description",
            json!(""),
        ))
        .with_field(FieldSpec::required("quantity", FieldType::Integer, "Quantity"))
        .with_field(FieldSpec::required("unit_price", FieldType::Decimal, "Unit price"))
        .with_field(FieldSpec::required("total", FieldType::Decimal, "Line item total"));

    let invoice = SchemaDescription::new("Invoice")
        .with_field(FieldSpec::required("invoice_id", FieldType::String, "Invoice ID"))
        .with_field(FieldSpec::required("invoice_date", FieldType::String, "Invoice date"))
        .with_field(FieldSpec::required("supplier_name", FieldType::String, "Supplier name"))
        .with_field(FieldSpec::required("payment_terms", FieldType::String, "Payment terms"))
        .with_field(FieldSpec::required("items", FieldType::List(item), "Invoice items"))
        .with_field(FieldSpec::optional("subtotal", FieldType::Decimal, "Subtotal", json!(0)))
        .with_field(FieldSpec::optional("tax", FieldType::Decimal, "Tax", json!(0)))
        .with_field(FieldSpec::required("total", FieldType::Decimal, "Total amount"));

    CategorySchema::new(Category::invoices(), "invoice", invoice, Some("invoice_id"))
}

fn catalog_schema() -> CategorySchema {
    let product = SchemaDescription::new("CatalogProduct")
        .with_field(FieldSpec::required("product_code", FieldType::String, "Product code"))
        .with_field(FieldSpec::required("name", FieldType::String, "Product name"))
        .with_field(FieldSpec::required("description", FieldType::String, "Product description"))
        .with_field(FieldSpec::required("price", FieldType::Decimal, "Product price"))
        .with_field(FieldSpec::optional(
            "specifications",
            FieldType::String,
            "Product specifications",
            json!(""),
        ));

    let catalog = SchemaDescription::new("Catalog")
        .with_field(FieldSpec::required(
            "catalog_period",
            FieldType::String,
            "Catalog period (e.g., Q1 2024)",
        ))
        .with_field(FieldSpec::required("products", FieldType::List(product), "Products in catalog"));

    CategorySchema::new(Category::catalogs(), "catalog", catalog, Some("catalog_period"))
}
