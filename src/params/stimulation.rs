// src/params/stimulation.rs
//! The stimulation configuration entity
//!
//! Fields are public so callers can edit them freely; nothing is checked until
//! [`validate`](crate::params::validate) runs (the session does this on upload).
//! The builder and the `try_set_*` setters are the eager alternative: they
//! refuse out-of-domain values up front.

use crate::config::constants::stimulus::*;
use crate::params::types::{Mode, Polarity, Source};
use crate::params::validation::{
    self, validate_demand, validate_dwell, validate_pulse_width, validate_recovery, ValidationReport,
};
use crate::utils::validation::ValidationResult;
use serde::{Deserialize, Serialize};

/// Complete parameter set for one stimulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StimulationConfig {
    pub mode: Mode,
    pub polarity: Polarity,
    pub source: Source,
    /// Output current in 0.1 mA units
    pub demand: i32,
    /// Pulse duration in µs, multiple of 10
    pub pulse_width: i32,
    /// Interphase interval in µs (biphasic only)
    pub dwell: i32,
    /// Recovery phase ratio in percent (biphasic only)
    pub recovery: i32,
    /// When false the device ignores triggers
    pub enabled: bool,
}

impl Default for StimulationConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            polarity: Polarity::default(),
            source: Source::default(),
            demand: DEFAULT_DEMAND,
            pulse_width: DEFAULT_PULSE_WIDTH_US,
            dwell: DEFAULT_DWELL_US,
            recovery: DEFAULT_RECOVERY_PERCENT,
            enabled: DEFAULT_ENABLED,
        }
    }
}

impl StimulationConfig {
    /// Start an eagerly validated configuration from the defaults
    pub fn builder() -> StimulationConfigBuilder {
        StimulationConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ValidationReport> {
        validation::validate(self)
    }

    pub fn exceeds_safe_amplitude(&self, limit_raw: i32) -> bool {
        validation::exceeds_safe_amplitude(self, limit_raw)
    }

    pub fn is_biphasic(&self) -> bool {
        self.mode == Mode::Biphasic
    }

    /// Demand converted to milliamps
    pub fn demand_milliamps(&self) -> f32 {
        demand_to_milliamps(self.demand)
    }

    pub fn try_set_demand(&mut self, demand: i32) -> ValidationResult<()> {
        validate_demand(demand)?;
        self.demand = demand;
        Ok(())
    }

    pub fn try_set_pulse_width(&mut self, pulse_width: i32) -> ValidationResult<()> {
        validate_pulse_width(pulse_width)?;
        self.pulse_width = pulse_width;
        Ok(())
    }

    pub fn try_set_dwell(&mut self, dwell: i32) -> ValidationResult<()> {
        validate_dwell(dwell)?;
        self.dwell = dwell;
        Ok(())
    }

    pub fn try_set_recovery(&mut self, recovery: i32) -> ValidationResult<()> {
        validate_recovery(recovery)?;
        self.recovery = recovery;
        Ok(())
    }
}

/// Raw demand units to milliamps (24 -> 2.4)
pub fn demand_to_milliamps(demand: i32) -> f32 {
    demand as f32 * DEMAND_UNIT_MILLIAMPS
}

/// Milliamps to the nearest raw demand unit (2.4 -> 24)
pub fn milliamps_to_demand(milliamps: f32) -> i32 {
    (milliamps / DEMAND_UNIT_MILLIAMPS).round() as i32
}

/// Builder that validates the whole configuration in `build`
#[derive(Debug, Clone, Default)]
pub struct StimulationConfigBuilder {
    config: StimulationConfig,
}

impl StimulationConfigBuilder {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.config.polarity = polarity;
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.config.source = source;
        self
    }

    pub fn demand(mut self, demand: i32) -> Self {
        self.config.demand = demand;
        self
    }

    /// Set demand from milliamps, rounded to 0.1 mA
    pub fn demand_milliamps(mut self, milliamps: f32) -> Self {
        self.config.demand = milliamps_to_demand(milliamps);
        self
    }

    pub fn pulse_width(mut self, pulse_width: i32) -> Self {
        self.config.pulse_width = pulse_width;
        self
    }

    pub fn dwell(mut self, dwell: i32) -> Self {
        self.config.dwell = dwell;
        self
    }

    pub fn recovery(mut self, recovery: i32) -> Self {
        self.config.recovery = recovery;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn build(self) -> Result<StimulationConfig, ValidationReport> {
        self.config.validate()?;
        Ok(self.config)
    }
}
