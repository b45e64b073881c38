//! Configuration management for the CLI.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration:
//!
//! ```toml
//! [source]
//! root = "."
//! prefix = "pet-store-data-extraction"
//! extension = "pdf"
//!
//! [output]
//! root = "."
//! prefix = "knowledge-base-data"
//!
//! [service]
//! endpoint = "https://api.cloud.llamaindex.ai"
//! api_key_env = "DOCFLOW_API_KEY"
//! timeout_secs = 120
//! extraction_mode = "BALANCED"
//!
//! [extractor]
//! max_concurrency = 1
//! extraction_timeout_secs = 300
//! ```

use crate::error::{CliError, Result};
use docflow_client::http::{DEFAULT_ENDPOINT, DEFAULT_EXTRACTION_MODE, DEFAULT_TIMEOUT_SECS};
use docflow_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the API key unless configured otherwise
pub const DEFAULT_API_KEY_ENV: &str = "DOCFLOW_API_KEY";

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where raw documents are listed from
    pub source: SourceSettings,

    /// Where artifacts are published
    pub output: OutputSettings,

    /// Extraction service connection
    pub service: ServiceSettings,

    /// Orchestration tuning
    pub extractor: ExtractorConfig,

    /// Output preferences
    pub settings: Settings,
}

/// Source blob store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Store root directory
    pub root: PathBuf,

    /// Prefix under the root holding one directory per category
    pub prefix: String,

    /// File extension to list; every file is listed when unset
    pub extension: Option<String>,
}

/// Artifact store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Store root directory
    pub root: PathBuf,

    /// Prefix under the root for published artifacts
    pub prefix: String,
}

/// Extraction service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service base URL
    pub endpoint: String,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    /// Per-request HTTP timeout (seconds)
    pub timeout_secs: u64,

    /// Extraction mode sent with each run
    pub extraction_mode: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl PipelineConfig {
    /// Load configuration from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    CliError::Config(format!("Cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&contents)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.source.prefix.trim().is_empty() {
            return Err(CliError::Config("source.prefix cannot be empty".into()));
        }
        if self.output.prefix.trim().is_empty() {
            return Err(CliError::Config("output.prefix cannot be empty".into()));
        }
        if self.service.endpoint.trim().is_empty() {
            return Err(CliError::Config("service.endpoint cannot be empty".into()));
        }
        if self.service.timeout_secs == 0 {
            return Err(CliError::Config("service.timeout_secs must be greater than 0".into()));
        }
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(format!("extractor: {}", e)))
    }

    /// HTTP request timeout as a Duration
    pub fn service_timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Resolve the API key: an explicit key wins, then the configured
    /// environment variable.
    pub fn resolve_api_key(&self, explicit: Option<String>) -> Result<String> {
        self.api_key_from(explicit, |name| std::env::var(name).ok())
    }

    fn api_key_from(
        &self,
        explicit: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String> {
        explicit
            .or_else(|| lookup(&self.service.api_key_env))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CliError::Config(format!(
                    "No API key: pass --api-key or set {}",
                    self.service.api_key_env
                ))
            })
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            prefix: "pet-store-data-extraction".to_string(),
            extension: Some("pdf".to_string()),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            prefix: "knowledge-base-data".to_string(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            extraction_mode: DEFAULT_EXTRACTION_MODE.to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}
