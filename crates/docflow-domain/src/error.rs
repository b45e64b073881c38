//! Error types raised across collaborator boundaries

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kinds of extraction failure the pipeline distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractionErrorKind {
    /// Service unreachable, non-success status, or call timed out
    TransportFailure,

    /// Response carried no extracted payload
    NoDataInResponse,

    /// Payload present but does not conform to the schema
    SchemaMismatch,
}

impl ExtractionErrorKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionErrorKind::TransportFailure => "TransportFailure",
            ExtractionErrorKind::NoDataInResponse => "NoDataInResponse",
            ExtractionErrorKind::SchemaMismatch => "SchemaMismatch",
        }
    }
}

impl fmt::Display for ExtractionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure returned by an extraction client for one document
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {message}")]
pub struct ExtractionError {
    /// Failure classification
    pub kind: ExtractionErrorKind,

    /// Human-readable detail
    pub message: String,
}

impl ExtractionError {
    /// Create a new extraction error
    pub fn new(kind: ExtractionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Transport-level failure
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ExtractionErrorKind::TransportFailure, message)
    }

    /// Response without a payload
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(ExtractionErrorKind::NoDataInResponse, message)
    }

    /// Payload that does not match the schema
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::new(ExtractionErrorKind::SchemaMismatch, message)
    }
}

/// Failure to persist an artifact
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Publish error: {0}")]
pub struct PublishError(pub String);

/// Failure to enumerate or read source documents
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Source error: {0}")]
pub struct SourceError(pub String);
