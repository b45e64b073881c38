//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::PipelineConfig;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docflow_client::HttpExtractionClient;
use docflow_domain::{Category, SchemaRegistry};
use docflow_extractor::{ExtractorError, PipelineDriver, RunReport};
use docflow_store::{FsArtifactPublisher, FsSourceLister};
use std::sync::Arc;
use tracing::info;

/// Execute the run command.
pub async fn execute_run(
    args: RunArgs,
    config: &PipelineConfig,
    registry: Arc<SchemaRegistry>,
    formatter: &Formatter,
) -> Result<RunReport> {
    let mut config = config.clone();
    if let Some(concurrency) = args.concurrency {
        config.extractor.max_concurrency = concurrency;
    }
    config.validate()?;

    let categories = parse_categories(&args.categories)?;
    // Unknown categories fail before credentials or the service are touched
    for category in &categories {
        registry.schema_for(category).map_err(ExtractorError::from)?;
    }
    let api_key = config.resolve_api_key(args.api_key)?;

    let client = HttpExtractionClient::with_timeout(
        config.service.endpoint.clone(),
        api_key,
        config.service_timeout(),
    )?
    .with_extraction_mode(config.service.extraction_mode.clone());

    let source = FsSourceLister::new(config.source.root.clone(), config.source.prefix.clone())
        .with_extension(config.source.extension.as_deref());
    let publisher = FsArtifactPublisher::new(config.output.root.clone(), config.output.prefix.clone());

    info!(
        "Reading from {}, publishing to {}",
        config.source.root.join(&config.source.prefix).display(),
        config.output.root.join(&config.output.prefix).display()
    );

    let driver = PipelineDriver::new(source, client, publisher, registry, config.extractor.clone())?;
    let report = if categories.is_empty() {
        driver.run_all().await?
    } else {
        driver.run(&categories).await?
    };

    println!("{}", formatter.format_report(&report)?);
    Ok(report)
}

fn parse_categories(raw: &[String]) -> Result<Vec<Category>> {
    raw.iter()
        .map(|name| name.parse::<Category>().map_err(CliError::InvalidInput))
        .collect()
}
