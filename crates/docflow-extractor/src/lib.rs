//! Docflow Extractor
//!
//! Orchestrates typed extraction over categorized documents and publishes
//! the results.
//!
//! # Overview
//!
//! For each requested category the pipeline lists the category's raw
//! documents, submits each one with the category's schema to an extraction
//! client, derives a stable identifier per extracted record, and publishes
//! the record as an artifact at `category/identifier`.
//!
//! # Architecture
//!
//! ```text
//! SourceLister → Orchestrator → ExtractionClient
//!                     ↓
//!                derive_id → ArtifactPublisher → RunReport
//! ```
//!
//! # Key Features
//!
//! - **Failure isolation**: a failing document becomes a failure entry; the batch continues
//! - **Full accounting**: every listed document is either published or reported as failed
//! - **Bounded concurrency**: optional, order-preserving parallel extraction per category
//! - **Fail-fast resolution**: unknown categories abort the run before anything is listed
//!
//! # Example Usage
//!
//! ```no_run
//! use docflow_client::MockExtractionClient;
//! use docflow_domain::{Category, SchemaRegistry};
//! use docflow_extractor::{ExtractorConfig, PipelineDriver};
//! use docflow_store::{MemoryPublisher, MemorySource};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = MemorySource::new()
//!     .with_document(Category::catalogs(), "catalogs/q1.pdf", b"%PDF".to_vec());
//! let client = MockExtractionClient::new(json!({"catalog_period": "Q1 2024", "products": []}));
//! let publisher = MemoryPublisher::new();
//!
//! let driver = PipelineDriver::new(
//!     source,
//!     client,
//!     publisher.clone(),
//!     Arc::new(SchemaRegistry::builtin()),
//!     ExtractorConfig::default(),
//! )?;
//!
//! let report = driver.run(&[Category::catalogs()]).await?;
//! println!("{}", report.summary());
//! assert_eq!(publisher.locations(), vec!["catalogs/Q1_2024"]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;
mod pipeline;
mod report;
mod types;

#[cfg(test)]
mod tests;

pub use config::{ExtractorConfig, MAX_CONCURRENCY};
pub use error::ExtractorError;
pub use orchestrator::Orchestrator;
pub use pipeline::PipelineDriver;
pub use report::{CategoryReport, PublishedArtifact, RunReport};
pub use types::{BatchResult, ExtractedDocument, FailureEntry, FailureKind};
