//! Docflow CLI - Extract typed records from categorized business documents.

use clap::Parser;
use docflow_cli::commands;
use docflow_cli::{Cli, Command, Formatter, PipelineConfig};
use docflow_domain::SchemaRegistry;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so JSON output on stdout stays parseable
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> docflow_cli::Result<()> {
    let config = PipelineConfig::load(cli.config.as_deref())?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let registry = Arc::new(SchemaRegistry::builtin());

    match cli.command {
        Command::Run(args) => {
            commands::execute_run(args, &config, registry, &formatter).await?;
        }
        Command::Schemas(args) => {
            commands::execute_schemas(args, &registry, &formatter)?;
        }
        Command::Categories => {
            commands::execute_categories(&registry, &formatter)?;
        }
    }

    Ok(())
}
