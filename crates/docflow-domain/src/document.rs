//! Raw documents as handed out by a source lister

use crate::category::Category;
use crate::error::SourceError;

/// An opaque document blob awaiting extraction
///
/// Created at listing time and consumed by exactly one extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Source location (path or object key)
    pub location: String,

    /// Category the document was listed under
    pub category: Category,

    /// Document contents
    pub bytes: Vec<u8>,
}

impl RawDocument {
    /// Create a new raw document
    pub fn new(location: impl Into<String>, category: Category, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            location: location.into(),
            category,
            bytes: bytes.into(),
        }
    }

    /// Final path component of the location
    ///
    /// # Examples
    ///
    /// ```
    /// use docflow_domain::{Category, RawDocument};
    ///
    /// let doc = RawDocument::new("data/orders/order-001.pdf", Category::orders(), b"%PDF".to_vec());
    /// assert_eq!(doc.file_name(), "order-001.pdf");
    /// ```
    pub fn file_name(&self) -> &str {
        self.location
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.location)
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the document is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A listed document whose contents could not be read
///
/// Reported against its own location; sibling documents are unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct UnreadableDocument {
    /// Source location (path or object key)
    pub location: String,

    /// Why the contents could not be read
    pub error: SourceError,
}

impl UnreadableDocument {
    /// Create a new unreadable entry
    pub fn new(location: impl Into<String>, error: SourceError) -> Self {
        Self {
            location: location.into(),
            error,
        }
    }
}

/// One entry of a category listing: the document, or why it could not be read
pub type ListedDocument = Result<RawDocument, UnreadableDocument>;
