// Configuration utilities and TOML parsing

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::normalizer::{Normalization, DEFAULT_FACTOR};
use crate::utils::error::{IndexerError, Result};
use crate::utils::validation;

/// Connection settings for the search cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticConfig {
    /// Cluster base URL
    pub url: String,
    /// Basic auth credentials as `user:password`; empty disables auth
    pub credentials: String,
    /// Skip TLS certificate verification (self-signed dev clusters)
    pub insecure: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: "https://localhost:9200".to_string(),
            credentials: "admin:admin".to_string(),
            insecure: true,
            timeout_secs: 30,
        }
    }
}

/// Target index and batching settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Index receiving the word documents
    pub name: String,
    /// Documents per `_bulk` request
    pub batch_size: usize,
    /// Bulk requests in flight at once
    pub concurrency: usize,
    pub normalization: Normalization,
    /// Scale for words-per-million
    pub factor: f64,
    /// Output range for softmax rescaling
    pub softmax_min: f64,
    pub softmax_max: f64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            name: "words".to_string(),
            batch_size: 20,
            concurrency: 1,
            normalization: Normalization::default(),
            factor: DEFAULT_FACTOR,
            softmax_min: 0.0,
            softmax_max: 10.0,
        }
    }
}

/// Top-level `freqidx` configuration file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub elastic: ElasticConfig,
    pub index: IndexSettings,
}

/// Configuration parsing and validation utilities
pub struct ConfigParser;

impl ConfigParser {
    /// Load and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<IndexerConfig> {
        let config = Self::read(path)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Read a configuration file without validating its values
    pub fn read<P: AsRef<Path>>(path: P) -> Result<IndexerConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(IndexerError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            IndexerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Self::from_toml(&content)
    }

    /// Read an explicit config file, or the default one if it exists, or defaults.
    ///
    /// Values are not validated here: callers apply command-line overrides first
    /// and then call [`ConfigParser::validate`] on the merged result.
    pub fn load_or_default(path: Option<&Path>) -> Result<IndexerConfig> {
        if let Some(path) = path {
            return Self::read(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::read(path),
            _ => Ok(IndexerConfig::default()),
        }
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(content: &str) -> Result<IndexerConfig> {
        let config = Self::from_toml(content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn from_toml(content: &str) -> Result<IndexerConfig> {
        toml::from_str(content)
            .map_err(|e| IndexerError::Config(format!("Invalid TOML syntax: {e}")))
    }

    /// Validate values that TOML typing alone cannot catch
    pub fn validate(config: &IndexerConfig) -> Result<()> {
        validation::validate_url(&config.elastic.url)?;
        validation::validate_credentials(&config.elastic.credentials)?;
        validation::validate_index_name(&config.index.name)?;

        if config.elastic.timeout_secs == 0 {
            return Err(IndexerError::Validation(
                "elastic.timeout_secs must be at least 1".to_string(),
            ));
        }
        if config.index.batch_size == 0 {
            return Err(IndexerError::Validation(
                "index.batch_size must be at least 1".to_string(),
            ));
        }
        if config.index.concurrency == 0 {
            return Err(IndexerError::Validation(
                "index.concurrency must be at least 1".to_string(),
            ));
        }
        if config.index.factor <= 0.0 {
            return Err(IndexerError::Validation(
                "index.factor must be positive".to_string(),
            ));
        }
        if config.index.softmax_min >= config.index.softmax_max {
            return Err(IndexerError::Validation(
                "index.softmax_min must be below index.softmax_max".to_string(),
            ));
        }

        Ok(())
    }
}

/// `~/.config/freqidx/config.toml` (platform config dir)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("freqidx").join("config.toml"))
}
