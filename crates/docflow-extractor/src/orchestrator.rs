//! Extraction Orchestrator
//!
//! Runs every listed document of one category through the extraction client
//! and collects a [`BatchResult`]. A failing document becomes a failure entry
//! and the batch moves on.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::types::{BatchResult, ExtractedDocument, FailureEntry};
use docflow_domain::traits::ExtractionClient;
use docflow_domain::{
    Category, CategorySchema, ExtractedRecord, ExtractionError, RawDocument, SchemaDescription,
    SchemaRegistry,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Orchestrator turns a category's raw documents into extracted records
pub struct Orchestrator<C>
where
    C: ExtractionClient,
{
    client: Arc<C>,
    registry: Arc<SchemaRegistry>,
    config: ExtractorConfig,
}

impl<C> Orchestrator<C>
where
    C: ExtractionClient,
{
    /// Create a new Orchestrator
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Config` if the configuration is invalid
    pub fn new(
        client: C,
        registry: Arc<SchemaRegistry>,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        Ok(Self {
            client: Arc::new(client),
            registry,
            config,
        })
    }

    /// Registry the orchestrator resolves categories against
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract every document of `category`
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Registry` if `category` is not registered.
    /// Per-document failures never surface here; they are in the result.
    pub async fn extract_category(
        &self,
        category: &Category,
        documents: Vec<RawDocument>,
    ) -> Result<BatchResult, ExtractorError> {
        let schema = self.registry.schema_for(category)?;
        Ok(self.extract_batch(schema, documents).await)
    }

    /// Extract `documents` against an already-resolved category schema
    ///
    /// Successes come back in listing order regardless of concurrency.
    pub async fn extract_batch(
        &self,
        schema: &CategorySchema,
        documents: Vec<RawDocument>,
    ) -> BatchResult {
        let start_time = Instant::now();
        let total = documents.len();

        info!(
            category = %schema.category,
            documents = total,
            client = self.client.name(),
            "Starting extraction"
        );

        let outcomes: Vec<(String, Result<ExtractedRecord, ExtractionError>)> =
            stream::iter(documents)
                .map(|document| async move {
                    let outcome = self.extract_one(&document, &schema.schema).await;
                    (document.location, outcome)
                })
                .buffered(self.config.max_concurrency)
                .collect()
                .await;

        let mut batch = BatchResult::new(schema.category.clone());
        for (location, outcome) in outcomes {
            match outcome {
                Ok(record) => {
                    debug!("Extracted {} ({} fields)", location, record.len());
                    batch.successes.push(ExtractedDocument { location, record });
                }
                Err(e) => {
                    warn!("Extraction failed for {}: {}", location, e);
                    batch
                        .failures
                        .push(FailureEntry::new(location, e.kind.into(), e.message));
                }
            }
        }

        info!(
            category = %schema.category,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Extraction complete: {} succeeded, {} failed",
            batch.successes.len(),
            batch.failures.len()
        );

        batch
    }

    /// One client call, bounded by the configured timeout
    async fn extract_one(
        &self,
        document: &RawDocument,
        schema: &SchemaDescription,
    ) -> Result<ExtractedRecord, ExtractionError> {
        debug!("Extracting {} ({} bytes)", document.location, document.len());

        timeout(
            self.config.extraction_timeout(),
            self.client.extract(document, schema),
        )
        .await
        .unwrap_or_else(|_| {
            Err(ExtractionError::transport(format!(
                "extraction timed out after {}s",
                self.config.extraction_timeout_secs
            )))
        })
    }
}
