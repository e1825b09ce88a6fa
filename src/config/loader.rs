// src/config/loader.rs
//! TOML configuration loader

use crate::config::ControllerConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration validation errors: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Loads the first configuration file that exists from a list of candidates
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Loader with no candidate files; `load` yields the defaults
    pub fn new() -> Self {
        Self { config_paths: Vec::new() }
    }

    /// Create loader with custom paths, searched in order
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self { config_paths: paths }
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load from the first existing candidate, or the defaults if none exist
    pub fn load(&self) -> Result<ControllerConfig, ConfigError> {
        match self.config_paths.iter().find(|p| p.exists()) {
            Some(path) => Self::load_file(path),
            None => {
                debug!(candidates = self.config_paths.len(), "no configuration file found, using defaults");
                Ok(ControllerConfig::default())
            }
        }
    }

    /// Load and validate one file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<ControllerConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<ControllerConfig, ConfigError> {
        let config: ControllerConfig = toml::from_str(content)?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
