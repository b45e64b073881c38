//! In-memory source and publisher for deterministic testing
//!
//! Both types are cheap to clone; clones share state, so a test can hand one
//! clone to the pipeline and inspect the other afterwards.

use crate::StoreError;
use async_trait::async_trait;
use docflow_domain::traits::{ArtifactPublisher, SourceLister};
use docflow_domain::{
    Artifact, Category, ListedDocument, PublishError, RawDocument, SourceError, UnreadableDocument,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory document source
///
/// # Examples
///
/// ```
/// use docflow_store::MemorySource;
/// use docflow_domain::Category;
///
/// let source = MemorySource::new()
///     .with_document(Category::orders(), "orders/a.pdf", b"order a".to_vec());
/// assert_eq!(source.document_count(&Category::orders()), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<Category, Vec<(String, Vec<u8>)>>,
    failing: HashSet<Category>,
    unreadable: HashSet<String>,
    list_calls: Arc<AtomicUsize>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document; documents are listed in insertion order
    pub fn with_document(
        mut self,
        category: Category,
        location: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.documents
            .entry(category)
            .or_default()
            .push((location.into(), bytes.into()));
        self
    }

    /// Add a document that is listed but cannot be read
    pub fn with_unreadable_document(mut self, category: Category, location: impl Into<String>) -> Self {
        let location = location.into();
        self.unreadable.insert(location.clone());
        self.documents
            .entry(category)
            .or_default()
            .push((location, Vec::new()));
        self
    }

    /// Make listing `category` fail
    pub fn with_failing_category(mut self, category: Category) -> Self {
        self.failing.insert(category);
        self
    }

    /// Number of documents stored for `category`
    pub fn document_count(&self, category: &Category) -> usize {
        self.documents.get(category).map(Vec::len).unwrap_or(0)
    }

    /// Number of times `list` was called, across all clones
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceLister for MemorySource {
    /// Fails if any document of `category` is unreadable
    async fn list(&self, category: &Category) -> Result<Vec<RawDocument>, SourceError> {
        self.list_entries(category)
            .await?
            .into_iter()
            .map(|entry| entry.map_err(|unreadable| unreadable.error))
            .collect()
    }

    async fn list_entries(&self, category: &Category) -> Result<Vec<ListedDocument>, SourceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(category) {
            return Err(StoreError::Injected(format!("listing '{}' failed", category)).into());
        }

        Ok(self
            .documents
            .get(category)
            .map(|docs| {
                docs.iter()
                    .map(|(location, bytes)| {
                        if self.unreadable.contains(location) {
                            let error = StoreError::Injected(format!("reading '{}' failed", location));
                            Err(UnreadableDocument::new(location.clone(), error.into()))
                        } else {
                            Ok(RawDocument::new(location.clone(), category.clone(), bytes.clone()))
                        }
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// In-memory artifact publisher
///
/// Stores serialized artifact bodies keyed by `category/identifier`.
/// Publishing the same location twice overwrites.
#[derive(Debug, Clone, Default)]
pub struct MemoryPublisher {
    artifacts: Arc<Mutex<BTreeMap<String, String>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    publish_calls: Arc<AtomicUsize>,
}

impl MemoryPublisher {
    /// Create an empty publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// Make publishing to `location` (`category/identifier`) fail
    pub fn fail_on(&self, location: impl Into<String>) {
        self.failing.lock().unwrap().insert(location.into());
    }

    /// Serialized body published at `location`
    pub fn get(&self, location: &str) -> Option<String> {
        self.artifacts.lock().unwrap().get(location).cloned()
    }

    /// Published locations, sorted
    pub fn locations(&self) -> Vec<String> {
        self.artifacts.lock().unwrap().keys().cloned().collect()
    }

    /// Number of stored artifacts
    pub fn len(&self) -> usize {
        self.artifacts.lock().unwrap().len()
    }

    /// Check if nothing has been published
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of times `publish` was called
    pub fn publish_calls(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactPublisher for MemoryPublisher {
    async fn publish(&self, artifact: &Artifact) -> Result<String, PublishError> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);

        let location = artifact.location();
        if self.failing.lock().unwrap().contains(&location) {
            return Err(StoreError::Injected(format!("publishing '{}' failed", location)).into());
        }

        let body = artifact.to_json().map_err(StoreError::from)?;
        self.artifacts.lock().unwrap().insert(location.clone(), body);
        Ok(location)
    }
}
