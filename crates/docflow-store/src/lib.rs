//! Docflow Blob Store Layer
//!
//! Implements the `SourceLister` and `ArtifactPublisher` traits over a
//! category-partitioned blob store.
//!
//! # Layout
//!
//! ```text
//! <root>/<source prefix>/<category>/<document>.pdf      ← listed
//! <root>/<output prefix>/<category>/<identifier>.json   ← published
//! ```
//!
//! # Implementations
//!
//! - `FsSourceLister` / `FsArtifactPublisher`: local filesystem (or a mounted bucket)
//! - `MemorySource` / `MemoryPublisher`: in-memory doubles for tests
//!
//! # Examples
//!
//! ```no_run
//! use docflow_store::{FsArtifactPublisher, FsSourceLister};
//!
//! let lister = FsSourceLister::new("./data", "pet-store-data-extraction");
//! let publisher = FsArtifactPublisher::new("./data", "knowledge-base-data");
//! ```

#![warn(missing_docs)]

pub mod fs;
pub mod memory;

use docflow_domain::{PublishError, SourceError};
use thiserror::Error;

pub use fs::{FsArtifactPublisher, FsSourceLister};
pub use memory::{MemoryPublisher, MemorySource};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Artifact body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Simulated failure from a test double
    #[error("Injected failure: {0}")]
    Injected(String),
}

impl StoreError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

impl From<StoreError> for SourceError {
    fn from(e: StoreError) -> Self {
        SourceError(e.to_string())
    }
}

impl From<StoreError> for PublishError {
    fn from(e: StoreError) -> Self {
        PublishError(e.to_string())
    }
}
