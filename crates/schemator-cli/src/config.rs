//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments, applied by the handlers on top of the file

use crate::error::{Error, Result};
use schemator_core::{ErrorKind, ErrorsLevelMask, Schemator, SchematorBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name written by `config init` when no path is given
pub const DEFAULT_CONFIG_FILE: &str = ".schemator.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path delimiter
    pub path_delimiter: String,

    /// Error categories to tolerate
    pub tolerate: Vec<ErrorKind>,

    /// Register the built-in filters
    pub built_in_filters: bool,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path_delimiter: ".".to_string(),
            tolerate: Vec::new(),
            built_in_filters: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
        }
    }
}

impl EngineConfig {
    /// Errors level mask for the configured categories
    pub fn mask(&self) -> Result<ErrorsLevelMask> {
        if let Some(kind) = self.tolerate.iter().find(|kind| !kind.is_tolerable()) {
            return Err(Error::config(format!(
                "engine.tolerate: '{}' errors can never be tolerated",
                kind
            )));
        }
        Ok(self.tolerate.iter().copied().collect())
    }

    /// Builder preloaded with these settings
    pub fn builder(&self) -> Result<SchematorBuilder> {
        let mut builder = Schemator::builder()
            .with_path_delimiter(self.path_delimiter.clone())
            .with_errors_level_mask(self.mask()?);
        if self.built_in_filters {
            builder = builder.with_built_in_filters();
        }
        Ok(builder)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(DEFAULT_CONFIG_FILE),
            PathBuf::from(".schemator.json"),
        ];

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let schemator_dir = config_dir.join("schemator");
            paths.push(schemator_dir.join("config.yaml"));
            paths.push(schemator_dir.join("config.json"));
        }

        // Home directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".schemator.yaml"));
            paths.push(home_dir.join(".schemator.json"));
        }

        paths
    }

    /// Serialize in the format implied by the file extension
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        if is_yaml(path) {
            Ok(serde_yaml::to_string(self)?)
        } else {
            Ok(serde_json::to_string_pretty(self)?)
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_for(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Whether a path names a YAML file
pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}
