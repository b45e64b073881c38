//! Batch outcome types

use docflow_domain::{Category, ExtractedRecord, ExtractionErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a document did not end up as a published artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Document listed but its contents could not be read
    ReadFailure,

    /// Extraction service unreachable, erroring, or timed out
    TransportFailure,

    /// Extraction response carried no payload
    NoDataInResponse,

    /// Extraction payload did not conform to the schema
    SchemaMismatch,

    /// Record extracted but the artifact could not be written
    PublishFailure,

    /// The category's documents could not be listed
    ListingFailure,
}

impl FailureKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ReadFailure => "ReadFailure",
            FailureKind::TransportFailure => "TransportFailure",
            FailureKind::NoDataInResponse => "NoDataInResponse",
            FailureKind::SchemaMismatch => "SchemaMismatch",
            FailureKind::PublishFailure => "PublishFailure",
            FailureKind::ListingFailure => "ListingFailure",
        }
    }
}

impl From<ExtractionErrorKind> for FailureKind {
    fn from(kind: ExtractionErrorKind) -> Self {
        match kind {
            ExtractionErrorKind::TransportFailure => FailureKind::TransportFailure,
            ExtractionErrorKind::NoDataInResponse => FailureKind::NoDataInResponse,
            ExtractionErrorKind::SchemaMismatch => FailureKind::SchemaMismatch,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document that failed, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Source location of the document
    pub location: String,

    /// Failure classification
    pub kind: FailureKind,

    /// Human-readable detail
    pub message: String,
}

impl FailureEntry {
    /// Create a new failure entry
    pub fn new(location: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            kind,
            message: message.into(),
        }
    }
}

/// A successfully extracted record with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    /// Source location of the document
    pub location: String,

    /// Extracted record
    pub record: ExtractedRecord,
}

/// Outcome of extracting one category's documents
///
/// Every input document appears exactly once, either in `successes` (in
/// listing order) or in `failures`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    /// Category that was processed
    pub category: Category,

    /// Extracted records, in listing order
    pub successes: Vec<ExtractedDocument>,

    /// Documents that failed extraction
    pub failures: Vec<FailureEntry>,
}

impl BatchResult {
    /// Create an empty batch result
    pub fn new(category: Category) -> Self {
        Self {
            category,
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Number of documents accounted for
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Check if no documents were processed
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_from_extraction_kind() {
        assert_eq!(
            FailureKind::from(ExtractionErrorKind::TransportFailure),
            FailureKind::TransportFailure
        );
        assert_eq!(
            FailureKind::from(ExtractionErrorKind::NoDataInResponse),
            FailureKind::NoDataInResponse
        );
        assert_eq!(
            FailureKind::from(ExtractionErrorKind::SchemaMismatch),
            FailureKind::SchemaMismatch
        );
    }

    #[test]
    fn test_empty_batch() {
        let batch = BatchResult::new(Category::orders());
        assert!(batch.is_empty());
        assert_eq!(batch.total(), 0);
    }

    #[test]
    fn test_failure_entry_serializes_kind_name() {
        let entry = FailureEntry::new("orders/2.pdf", FailureKind::TransportFailure, "refused");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "TransportFailure");
        assert_eq!(json["location"], "orders/2.pdf");
    }
}
