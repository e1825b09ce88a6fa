// src/config/mod.rs
//! Controller configuration

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use crate::params::StimulationConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete controller configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ControllerConfig {
    #[serde(default)]
    pub device: DeviceSettings,
    #[serde(default)]
    pub safety: SafetySettings,
    #[serde(default)]
    pub session: SessionSettings,
    /// Initial stimulation parameters; omitted fields take the defaults
    #[serde(default)]
    pub parameters: StimulationConfig,
}

/// Native module location
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct DeviceSettings {
    /// Explicit module file; falls back to the environment, then the
    /// executable's directory
    #[serde(default)]
    pub module_path: Option<PathBuf>,
}

/// Interlock settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SafetySettings {
    #[serde(default = "defaults::demand_limit_raw")]
    pub demand_limit_raw: i32,
}

/// Session behaviour
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SessionSettings {
    /// Validate every setter call instead of waiting for upload
    #[serde(default = "defaults::strict_validation")]
    pub strict_validation: bool,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::safety;

    pub fn demand_limit_raw() -> i32 { safety::SAFE_DEMAND_LIMIT_RAW }
    pub fn strict_validation() -> bool { false }
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            demand_limit_raw: defaults::demand_limit_raw(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            strict_validation: defaults::strict_validation(),
        }
    }
}

impl ControllerConfig {
    /// Check values a session would otherwise reject at construction
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let limit = self.safety.demand_limit_raw;
        if !(safety::MIN_CONFIGURABLE_LIMIT_RAW..=safety::MAX_CONFIGURABLE_LIMIT_RAW).contains(&limit) {
            errors.push(format!(
                "safety.demand_limit_raw {} must be within [{}, {}]",
                limit,
                safety::MIN_CONFIGURABLE_LIMIT_RAW,
                safety::MAX_CONFIGURABLE_LIMIT_RAW
            ));
        }

        // Lenient sessions accept out-of-domain parameters until upload
        if self.session.strict_validation {
            if let Err(report) = self.parameters.validate() {
                errors.extend(report.violations().iter().map(|v| format!("parameters: {}", v)));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
