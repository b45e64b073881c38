//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Docflow - Extract typed records from categorized business documents.
#[derive(Debug, Parser)]
#[command(name = "docflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract, identify and publish documents
    Run(RunArgs),

    /// Show category schemas
    Schemas(SchemasArgs),

    /// List registered categories
    Categories,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Category to process (repeatable); all registered categories if omitted
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Extraction service API key
    #[arg(long, env = "DOCFLOW_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the configured number of concurrent extractions
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Arguments for the schemas command.
#[derive(Debug, Parser)]
pub struct SchemasArgs {
    /// Only show this category
    pub category: Option<String>,
}
