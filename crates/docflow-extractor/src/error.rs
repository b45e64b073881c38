//! Error types for the Extractor
//!
//! Only run-level problems surface here. Document-level failures are never
//! raised; they are accumulated in [`BatchResult`](crate::BatchResult) and
//! [`RunReport`](crate::RunReport).

use docflow_domain::RegistryError;
use thiserror::Error;

/// Errors that abort an extraction run
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Category missing from the schema registry, or registry misconfigured
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Check if this is an unknown-category error
    pub fn is_unknown_category(&self) -> bool {
        matches!(self, ExtractorError::Registry(RegistryError::UnknownCategory(_)))
    }
}
