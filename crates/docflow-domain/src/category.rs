//! Category module - the document classes a pipeline run is partitioned by

use serde::{Deserialize, Serialize};
use std::fmt;

/// Document category
///
/// A category names a class of documents sharing one schema (`orders`,
/// `invoices`, `catalogs`). The set is open: any lowercase slug made of
/// ASCII letters, digits, `-` and `_` is a valid category name. Whether a
/// category is *known* is decided by the [`SchemaRegistry`](crate::SchemaRegistry).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Purchase orders
    pub const ORDERS: &'static str = "orders";

    /// Supplier invoices
    pub const INVOICES: &'static str = "invoices";

    /// Product catalogs
    pub const CATALOGS: &'static str = "catalogs";

    /// Create a new category
    ///
    /// # Errors
    /// Returns error if the name is empty or not a lowercase slug
    ///
    /// # Examples
    ///
    /// ```
    /// use docflow_domain::Category;
    ///
    /// let category = Category::new("orders").unwrap();
    /// assert_eq!(category.as_str(), "orders");
    /// assert!(Category::new("Orders/2024").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.is_empty() {
            return Err("Category cannot be empty".to_string());
        }
        let valid = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(format!(
                "Invalid category '{}': expected lowercase letters, digits, '-' or '_'",
                value
            ));
        }
        Ok(Self(value))
    }

    /// The `orders` category
    pub fn orders() -> Self {
        Self(Self::ORDERS.to_string())
    }

    /// The `invoices` category
    pub fn invoices() -> Self {
        Self(Self::INVOICES.to_string())
    }

    /// The `catalogs` category
    pub fn catalogs() -> Self {
        Self(Self::CATALOGS.to_string())
    }

    /// Get category name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        assert_eq!(Category::orders().as_str(), "orders");
        assert_eq!(Category::invoices().as_str(), "invoices");
        assert_eq!(Category::catalogs().as_str(), "catalogs");
    }

    #[test]
    fn test_rejects_invalid_names() {
        assert!(Category::new("").is_err());
        assert!(Category::new("Orders").is_err());
        assert!(Category::new("orders/2024").is_err());
        assert!(Category::new("purchase orders").is_err());
    }

    #[test]
    fn test_accepts_extension_categories() {
        let category = Category::new("credit_notes-v2").unwrap();
        assert_eq!(category.to_string(), "credit_notes-v2");
    }

    #[test]
    fn test_parse_trims() {
        let category: Category = " invoices ".parse().unwrap();
        assert_eq!(category, Category::invoices());
    }

    #[test]
    fn test_serde_validates() {
        let category: Category = serde_json::from_str("\"catalogs\"").unwrap();
        assert_eq!(category, Category::catalogs());
        assert!(serde_json::from_str::<Category>("\"Bad Name\"").is_err());
    }
}
