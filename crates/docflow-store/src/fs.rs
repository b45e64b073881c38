//! Filesystem-backed source lister and artifact publisher

use crate::StoreError;
use async_trait::async_trait;
use docflow_domain::traits::{ArtifactPublisher, SourceLister};
use docflow_domain::{
    Artifact, Category, ListedDocument, PublishError, RawDocument, SourceError, UnreadableDocument,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default document extension
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Lists documents stored under `<root>/<prefix>/<category>/`
#[derive(Debug, Clone)]
pub struct FsSourceLister {
    root: PathBuf,
    prefix: String,
    extension: Option<String>,
}

impl FsSourceLister {
    /// Create a lister for `.pdf` documents under `root/prefix`
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            extension: Some(DEFAULT_EXTENSION.to_string()),
        }
    }

    /// Only list files with this extension (case-insensitive); `None` lists every file
    pub fn with_extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension.map(|e| e.trim_start_matches('.').to_ascii_lowercase());
        self
    }

    /// Directory holding the documents of `category`
    pub fn category_dir(&self, category: &Category) -> PathBuf {
        self.root.join(&self.prefix).join(category.as_str())
    }

    fn accepts(&self, path: &Path) -> bool {
        match &self.extension {
            None => true,
            Some(wanted) => path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(wanted))
                .unwrap_or(false),
        }
    }

    /// Symlinks are followed; a file whose metadata or contents cannot be
    /// read becomes an unreadable entry instead of failing the listing
    async fn list_dir(&self, category: &Category) -> Result<Vec<ListedDocument>, StoreError> {
        let dir = self.category_dir(category);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No source directory for '{}' at {}", category, dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&dir, e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| StoreError::io(&dir, e))? {
            let path = entry.path();
            if self.accepts(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            match read_document(&path).await {
                Ok(Some(bytes)) => documents.push(Ok(RawDocument::new(
                    path.display().to_string(),
                    category.clone(),
                    bytes,
                ))),
                Ok(None) => {}
                Err(e) => {
                    warn!("Cannot read {}: {}", path.display(), e);
                    documents.push(Err(UnreadableDocument::new(
                        path.display().to_string(),
                        e.into(),
                    )));
                }
            }
        }
        Ok(documents)
    }
}

/// Contents of `path`, or `None` if it is not a regular file (after following links)
async fn read_document(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    if !metadata.is_file() {
        return Ok(None);
    }
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    Ok(Some(bytes))
}

#[async_trait]
impl SourceLister for FsSourceLister {
    /// Fails on the first unreadable document; see [`SourceLister::list_entries`]
    /// for the per-document variant
    async fn list(&self, category: &Category) -> Result<Vec<RawDocument>, SourceError> {
        self.list_entries(category)
            .await?
            .into_iter()
            .map(|entry| entry.map_err(|unreadable| unreadable.error))
            .collect()
    }

    async fn list_entries(&self, category: &Category) -> Result<Vec<ListedDocument>, SourceError> {
        let documents = self.list_dir(category).await?;
        debug!("Listed {} documents for '{}'", documents.len(), category);
        Ok(documents)
    }
}

/// Writes artifacts to `<root>/<prefix>/<category>/<identifier>.json`
#[derive(Debug, Clone)]
pub struct FsArtifactPublisher {
    root: PathBuf,
    prefix: String,
}

impl FsArtifactPublisher {
    /// Create a publisher writing under `root/prefix`
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    /// Path an artifact is written to
    pub fn artifact_path(&self, artifact: &Artifact) -> PathBuf {
        self.root
            .join(&self.prefix)
            .join(artifact.category.as_str())
            .join(format!("{}.json", artifact.identifier))
    }

    async fn write(&self, artifact: &Artifact) -> Result<PathBuf, StoreError> {
        let path = self.artifact_path(artifact);
        let body = artifact.to_json()?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        Ok(path)
    }
}

#[async_trait]
impl ArtifactPublisher for FsArtifactPublisher {
    async fn publish(&self, artifact: &Artifact) -> Result<String, PublishError> {
        let path = self.write(artifact).await?;
        debug!("Published {} to {}", artifact.location(), path.display());
        Ok(path.display().to_string())
    }
}
