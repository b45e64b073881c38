//! Docflow Domain Layer
//!
//! This crate contains the domain model for the document extraction pipeline.
//! It defines the fundamental concepts, the fixed schema registry, identifier
//! derivation, and the trait interfaces every transport implements.
//!
//! ## Key Concepts
//!
//! - **Category**: A document class sharing one schema (orders, invoices, catalogs)
//! - **Schema Description**: The structural contract an extracted record must meet
//! - **Extracted Record**: Structured output for one raw document
//! - **Identifier**: Stable key distinguishing one record's artifact within its category
//! - **Artifact**: A record plus its identifier, published at `category/identifier`
//!
//! ## Architecture
//!
//! - Pure logic only (registry lookup, schema conformance, identifier derivation)
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod document;
pub mod error;
pub mod identifier;
pub mod record;
pub mod registry;
pub mod run;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use category::Category;
pub use document::{ListedDocument, RawDocument, UnreadableDocument};
pub use error::{ExtractionError, ExtractionErrorKind, PublishError, SourceError};
pub use identifier::{derive_id, Identifier};
pub use record::{Artifact, ExtractedRecord};
pub use registry::{CategorySchema, RegistryError, SchemaRegistry, SchemaRegistryBuilder};
pub use run::RunId;
pub use schema::{FieldSpec, FieldType, Requirement, SchemaDescription, SchemaViolation};
pub use traits::{ArtifactPublisher, ExtractionClient, SourceLister};
