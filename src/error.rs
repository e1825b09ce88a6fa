// src/error.rs
//! Unified error handling for ds8r-core
//!
//! Every fallible public operation returns [`StimResult`]. Component errors
//! (module loading, device calls, validation, configuration) convert into
//! [`StimError`] through `From`, so `?` works across layers.
//!
//! Device status codes are deliberately absent: a call that returns any code
//! has succeeded as far as this crate is concerned.

use crate::config::ConfigError;
use crate::hal::{DeviceError, ModuleLoadError};
use crate::params::{demand_to_milliamps, ValidationReport};
use crate::utils::validation::ValidationError;
use thiserror::Error;

/// Unified error type for the whole crate
#[derive(Debug, Error)]
pub enum StimError {
    /// Native module missing or unbindable; construction cannot proceed
    #[error("[MODULE] {0}")]
    ModuleLoad(#[from] ModuleLoadError),

    /// `run` refused a demand above the interlock limit
    #[error(
        "[INTERLOCK] Demand value {demand} ({:.1} mA) exceeds safe limit of {limit} ({:.1} mA); use run(force = true) to apply it",
        milliamps(.demand),
        milliamps(.limit)
    )]
    InterlockViolation { demand: i32, limit: i32 },

    /// Upload refused because the configuration is outside its domain
    #[error("[PARAMS] Upload refused: {0}")]
    InvalidParameters(#[from] ValidationReport),

    /// A single field rejected by an eager setter
    #[error("[PARAMS] {0}")]
    Parameter(#[from] ValidationError),

    /// The device call itself could not be made
    #[error("[DEVICE] {0}")]
    Device(#[from] DeviceError),

    #[error("[CONFIG] {0}")]
    Config(#[from] ConfigError),
}

fn milliamps(raw: &i32) -> f32 {
    demand_to_milliamps(*raw)
}

/// How the caller should treat an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The caller can fix the input and retry
    Recoverable,
    /// The device binding or environment is broken
    Fatal,
}

impl StimError {
    pub fn severity(&self) -> Severity {
        match self {
            StimError::ModuleLoad(_) | StimError::Device(_) => Severity::Fatal,
            StimError::InterlockViolation { .. }
            | StimError::InvalidParameters(_)
            | StimError::Parameter(_)
            | StimError::Config(_) => Severity::Recoverable,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    pub fn is_interlock(&self) -> bool {
        matches!(self, StimError::InterlockViolation { .. })
    }
}

/// Result type alias for crate operations
pub type StimResult<T> = Result<T, StimError>;
