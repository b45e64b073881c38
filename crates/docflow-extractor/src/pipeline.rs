//! Pipeline Driver
//!
//! Lists, extracts, identifies and publishes every requested category, then
//! reports what happened.
//!
//! ```text
//! SourceLister → Orchestrator → derive_id → ArtifactPublisher → RunReport
//! ```

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::orchestrator::Orchestrator;
use crate::report::{CategoryReport, PublishedArtifact, RunReport};
use crate::types::{FailureEntry, FailureKind};
use docflow_domain::traits::{ArtifactPublisher, ExtractionClient, SourceLister};
use docflow_domain::{
    derive_id, Artifact, Category, CategorySchema, Identifier, RunId, SchemaRegistry,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Drives a full extraction run over one or more categories
pub struct PipelineDriver<S, C, P>
where
    S: SourceLister,
    C: ExtractionClient,
    P: ArtifactPublisher,
{
    source: S,
    publisher: P,
    orchestrator: Orchestrator<C>,
}

impl<S, C, P> PipelineDriver<S, C, P>
where
    S: SourceLister,
    C: ExtractionClient,
    P: ArtifactPublisher,
{
    /// Create a new driver
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Config` if the configuration is invalid
    pub fn new(
        source: S,
        client: C,
        publisher: P,
        registry: Arc<SchemaRegistry>,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        Ok(Self {
            source,
            publisher,
            orchestrator: Orchestrator::new(client, registry, config)?,
        })
    }

    /// Registry categories are resolved against
    pub fn registry(&self) -> &SchemaRegistry {
        self.orchestrator.registry()
    }

    /// Run every registered category, in registry order
    pub async fn run_all(&self) -> Result<RunReport, ExtractorError> {
        let categories: Vec<Category> = self.registry().categories().cloned().collect();
        self.run(&categories).await
    }

    /// Run the requested categories, in request order
    ///
    /// Repeated categories are processed once.
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Registry` if any category is unknown. This is
    /// checked before anything is listed, so a failed run has no side effects.
    pub async fn run(&self, categories: &[Category]) -> Result<RunReport, ExtractorError> {
        let mut schemas: Vec<&CategorySchema> = Vec::with_capacity(categories.len());
        for category in categories {
            let schema = self.registry().schema_for(category)?;
            if !schemas.iter().any(|s| s.category == schema.category) {
                schemas.push(schema);
            }
        }

        let run_id = RunId::new();
        let start_time = Instant::now();
        info!(%run_id, categories = schemas.len(), "Starting pipeline run");

        let mut report = RunReport::new(run_id);
        for schema in schemas {
            report.categories.push(self.run_category(schema).await);
        }
        report.elapsed_ms = start_time.elapsed().as_millis() as u64;

        info!(
            %run_id,
            elapsed_ms = report.elapsed_ms,
            "Pipeline run complete: {} published, {} failed",
            report.total_successes(),
            report.total_failures()
        );

        Ok(report)
    }

    async fn run_category(&self, schema: &CategorySchema) -> CategoryReport {
        let category = &schema.category;
        info!(%category, "Processing category");

        let entries = match self.source.list_entries(category).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(%category, "Listing failed: {}", e);
                return CategoryReport::listing_failed(category.clone(), e.to_string());
            }
        };

        let mut report = CategoryReport::new(category.clone(), entries.len());
        let mut documents = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                Ok(document) => documents.push(document),
                Err(unreadable) => {
                    warn!(%category, "Reading {} failed: {}", unreadable.location, unreadable.error);
                    report.record_failure(FailureEntry::new(
                        unreadable.location,
                        FailureKind::ReadFailure,
                        unreadable.error.to_string(),
                    ));
                }
            }
        }

        let batch = self.orchestrator.extract_batch(schema, documents).await;
        report.failures.extend(batch.failures);

        // identifier -> source location of the record that claimed it
        let mut claimed: HashMap<String, String> = HashMap::new();

        for (ordinal, extracted) in batch.successes.into_iter().enumerate() {
            let mut identifier = derive_id(schema, &extracted.record, ordinal);
            if let Some(previous) = claimed.get(identifier.as_str()) {
                let unique = unclaimed_identifier(&identifier, ordinal, &claimed);
                warn!(
                    %category,
                    "Identifier '{}' from {} is already used by {}; publishing as '{}'",
                    identifier,
                    extracted.location,
                    previous,
                    unique
                );
                identifier = unique;
            }

            let artifact = Artifact::new(category.clone(), identifier, extracted.record);
            match self.publisher.publish(&artifact).await {
                Ok(location) => {
                    claimed.insert(artifact.identifier.to_string(), extracted.location.clone());
                    report.record_published(PublishedArtifact {
                        source: extracted.location,
                        identifier: artifact.identifier.to_string(),
                        location,
                    });
                }
                Err(e) => {
                    warn!(%category, "Publishing {} failed: {}", artifact.location(), e);
                    report.record_failure(FailureEntry::new(
                        extracted.location,
                        FailureKind::PublishFailure,
                        e.to_string(),
                    ));
                }
            }
        }

        info!(
            %category,
            "Category complete: {} of {} published",
            report.successes,
            report.documents
        );

        report
    }
}

/// `{taken}_{ordinal}`, with a further counter suffix while that is also claimed
fn unclaimed_identifier(
    taken: &Identifier,
    ordinal: usize,
    claimed: &HashMap<String, String>,
) -> Identifier {
    let base = taken.with_suffix(ordinal);
    let mut candidate = base.clone();
    let mut counter = 1;
    while claimed.contains_key(candidate.as_str()) {
        candidate = base.with_suffix(counter);
        counter += 1;
    }
    candidate
}
