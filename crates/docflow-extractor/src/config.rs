//! Orchestration settings
//!
//! Loaded from the `[extractor]` table of the pipeline configuration file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on concurrent extraction calls within one category
pub const MAX_CONCURRENCY: usize = 64;

/// How documents within one category are fanned out to the extraction client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum documents extracted concurrently within one category
    ///
    /// `1` processes documents strictly one after another.
    pub max_concurrency: usize,

    /// Seconds a single extraction call may take before it counts as a transport failure
    pub extraction_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Per-call timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Check limits; the message names the offending field
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        if self.max_concurrency > MAX_CONCURRENCY {
            return Err(format!(
                "max_concurrency cannot exceed {}",
                MAX_CONCURRENCY
            ));
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Sequential extraction with a generous per-call timeout
    fn default() -> Self {
        Self {
            max_concurrency: 1,
            extraction_timeout_secs: 300,
        }
    }
}

impl ExtractorConfig {
    /// Sequential preset: one document at a time
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Concurrent preset: up to `limit` documents in flight per category
    pub fn concurrent(limit: usize) -> Self {
        Self {
            max_concurrency: limit,
            ..Self::default()
        }
    }

    /// Parse from a TOML table; missing keys take their defaults
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Invalid extractor config: {}", e))
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Cannot render extractor config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sequential() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_concurrency, 1);
    }

    #[test]
    fn test_concurrent_config_is_valid() {
        let config = ExtractorConfig::concurrent(8);
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction_timeout_secs, 300);
    }

    #[test]
    fn test_invalid_concurrency() {
        assert!(ExtractorConfig::concurrent(0).validate().is_err());
        assert!(ExtractorConfig::concurrent(MAX_CONCURRENCY + 1).validate().is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ExtractorConfig::default();
        config.extraction_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml("max_concurrency = 4").unwrap();
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.extraction_timeout_secs, 300);
    }

    #[test]
    fn test_toml_survives_rendering() {
        let config = ExtractorConfig::concurrent(3);
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(ExtractorConfig::from_toml("max_concurrency = \"many\"").is_err());
    }
}
