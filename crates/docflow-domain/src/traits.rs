//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! its transport. Implementations live in other crates (`docflow-store`,
//! `docflow-client`).

use crate::category::Category;
use crate::document::{ListedDocument, RawDocument};
use crate::error::{ExtractionError, PublishError, SourceError};
use crate::record::{Artifact, ExtractedRecord};
use crate::schema::SchemaDescription;
use async_trait::async_trait;
use std::sync::Arc;

/// Enumerates the documents of one category
///
/// Implemented by the infrastructure layer (docflow-store)
#[async_trait]
pub trait SourceLister: Send + Sync {
    /// List every document of `category`, in a stable order
    ///
    /// Must only return documents belonging to `category`; callers do not re-filter.
    async fn list(&self, category: &Category) -> Result<Vec<RawDocument>, SourceError>;

    /// List every document of `category`, keeping unreadable ones as entries
    ///
    /// An `Err` entry means that one document could not be read; the outer
    /// `Err` means the category itself could not be enumerated. The default
    /// wraps [`list`](SourceLister::list), for sources that never fail per
    /// document.
    async fn list_entries(&self, category: &Category) -> Result<Vec<ListedDocument>, SourceError> {
        Ok(self.list(category).await?.into_iter().map(Ok).collect())
    }
}

/// Turns a raw document into a structured record
///
/// Implemented by the infrastructure layer (docflow-client)
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Extract one record from `document` according to `schema`
    ///
    /// Called exactly once per document. Cancellation and timeouts surface
    /// as [`ExtractionErrorKind::TransportFailure`](crate::ExtractionErrorKind).
    async fn extract(
        &self,
        document: &RawDocument,
        schema: &SchemaDescription,
    ) -> Result<ExtractedRecord, ExtractionError>;

    /// Short name of the backing service, for logs and reports
    fn name(&self) -> &str {
        "extraction-client"
    }
}

/// Persists artifacts at a location derived from category and identifier
///
/// Implemented by the infrastructure layer (docflow-store)
#[async_trait]
pub trait ArtifactPublisher: Send + Sync {
    /// Write `artifact`, overwriting any previous artifact with the same
    /// identifier, and return where it was written
    async fn publish(&self, artifact: &Artifact) -> Result<String, PublishError>;
}

#[async_trait]
impl<T: SourceLister + ?Sized> SourceLister for Arc<T> {
    async fn list(&self, category: &Category) -> Result<Vec<RawDocument>, SourceError> {
        (**self).list(category).await
    }

    async fn list_entries(&self, category: &Category) -> Result<Vec<ListedDocument>, SourceError> {
        (**self).list_entries(category).await
    }
}

#[async_trait]
impl<T: ExtractionClient + ?Sized> ExtractionClient for Arc<T> {
    async fn extract(
        &self,
        document: &RawDocument,
        schema: &SchemaDescription,
    ) -> Result<ExtractedRecord, ExtractionError> {
        (**self).extract(document, schema).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: ArtifactPublisher + ?Sized> ArtifactPublisher for Arc<T> {
    async fn publish(&self, artifact: &Artifact) -> Result<String, PublishError> {
        (**self).publish(artifact).await
    }
}
