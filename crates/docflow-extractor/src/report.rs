//! Run reports
//!
//! A [`RunReport`] accounts for every listed document of every requested
//! category: it was either published, or it appears in `failures` with a
//! [`FailureKind`].

use crate::types::{FailureEntry, FailureKind};
use docflow_domain::{Category, RunId};
use serde::{Serialize, Serializer};

/// A record that made it to the artifact store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedArtifact {
    /// Source location of the document the record came from
    pub source: String,

    /// Derived identifier
    pub identifier: String,

    /// Where the publisher wrote the artifact
    pub location: String,
}

/// Outcome for a single category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    /// Category this report covers (the key in the serialized run report)
    #[serde(skip)]
    pub category: Category,

    /// Number of documents listed
    pub documents: usize,

    /// Number of documents extracted and published
    pub successes: usize,

    /// Published artifacts, in listing order
    pub published: Vec<PublishedArtifact>,

    /// Every document that was not published, plus listing failures
    pub failures: Vec<FailureEntry>,
}

impl CategoryReport {
    /// Create an empty report for `category` with `documents` listed
    pub fn new(category: Category, documents: usize) -> Self {
        Self {
            category,
            documents,
            successes: 0,
            published: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Report for a category whose documents could not be listed
    pub fn listing_failed(category: Category, message: impl Into<String>) -> Self {
        let location = category.to_string();
        let mut report = Self::new(category, 0);
        report
            .failures
            .push(FailureEntry::new(location, FailureKind::ListingFailure, message));
        report
    }

    /// Record a published artifact
    pub fn record_published(&mut self, artifact: PublishedArtifact) {
        self.successes += 1;
        self.published.push(artifact);
    }

    /// Record a failed document
    pub fn record_failure(&mut self, failure: FailureEntry) {
        self.failures.push(failure);
    }

    /// Check if listing this category failed
    pub fn has_listing_failure(&self) -> bool {
        self.failures
            .iter()
            .any(|f| f.kind == FailureKind::ListingFailure)
    }

    /// Number of failures of a given kind
    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Run identifier
    pub run_id: RunId,

    /// Start of the run, milliseconds since the Unix epoch
    pub started_at_ms: u64,

    /// Wall-clock duration of the run
    pub elapsed_ms: u64,

    /// Per-category outcomes, in processing order
    #[serde(serialize_with = "serialize_categories")]
    pub categories: Vec<CategoryReport>,
}

fn serialize_categories<S: Serializer>(
    categories: &[CategoryReport],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(categories.iter().map(|r| (r.category.as_str(), r)))
}

impl RunReport {
    /// Create an empty report for `run_id`
    pub fn new(run_id: RunId) -> Self {
        Self {
            started_at_ms: run_id.timestamp(),
            run_id,
            elapsed_ms: 0,
            categories: Vec::new(),
        }
    }

    /// Report for `category`, if it was processed
    pub fn get(&self, category: &Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|r| &r.category == category)
    }

    /// Total published artifacts across all categories
    pub fn total_successes(&self) -> usize {
        self.categories.iter().map(|r| r.successes).sum()
    }

    /// Total failure entries across all categories
    pub fn total_failures(&self) -> usize {
        self.categories.iter().map(|r| r.failures.len()).sum()
    }

    /// Check if every document was published
    pub fn is_clean(&self) -> bool {
        self.total_failures() == 0
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Generate a human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Extraction Run {}", self.run_id),
            "=".repeat(52),
            format!("Elapsed: {}ms", self.elapsed_ms),
            String::new(),
        ];

        for report in &self.categories {
            lines.push(format!(
                "{}: {} listed, {} published, {} failed",
                report.category,
                report.documents,
                report.successes,
                report.failures.len()
            ));
            for failure in &report.failures {
                lines.push(format!(
                    "  {} [{}] {}",
                    failure.location, failure.kind, failure.message
                ));
            }
        }

        lines.push(String::new());
        lines.push(format!(
            "Total: {} published, {} failed",
            self.total_successes(),
            self.total_failures()
        ));

        lines.join("\n")
    }
}
