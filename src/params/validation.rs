// src/params/validation.rs
//! Domain validation for stimulation parameters
//!
//! Every check here is pure: nothing is clamped or rewritten. A value outside
//! its domain is reported, never normalised.

use crate::config::constants::stimulus::*;
use crate::params::stimulation::StimulationConfig;
use crate::params::types::{Mode, Polarity, Source};
use crate::utils::validation::{
    validate_known_code, validate_range, validate_step, ValidationError, ValidationResult,
};
use std::fmt;

/// Fields a validation report can name, in wire order. `enabled` is a
/// plain flag and is never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    Mode,
    Polarity,
    Source,
    Demand,
    PulseWidth,
    Dwell,
    Recovery,
}

impl ParameterField {
    pub const fn name(self) -> &'static str {
        match self {
            ParameterField::Mode => Mode::FIELD,
            ParameterField::Polarity => Polarity::FIELD,
            ParameterField::Source => Source::FIELD,
            ParameterField::Demand => "demand",
            ParameterField::PulseWidth => "pulse_width",
            ParameterField::Dwell => "dwell",
            ParameterField::Recovery => "recovery",
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every violation found in one configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    violations: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[ValidationError] {
        &self.violations
    }

    /// Field names in the order they were checked
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(ValidationError::field).collect()
    }

    pub fn contains(&self, field: ParameterField) -> bool {
        self.violations.iter().any(|v| v.field() == field.name())
    }

    fn record(&mut self, result: ValidationResult<()>) {
        if let Err(error) = result {
            self.violations.push(error);
        }
    }

    fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} parameter violation(s)", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

impl From<ValidationError> for ValidationReport {
    fn from(error: ValidationError) -> Self {
        Self { violations: vec![error] }
    }
}

pub fn validate_mode(mode: Mode) -> ValidationResult<()> {
    let valid = Mode::valid_codes();
    let valid: Vec<&str> = valid.iter().map(String::as_str).collect();
    validate_known_code(mode.is_known(), mode.code(), &valid, Mode::FIELD)
}

pub fn validate_polarity(polarity: Polarity) -> ValidationResult<()> {
    let valid = Polarity::valid_codes();
    let valid: Vec<&str> = valid.iter().map(String::as_str).collect();
    validate_known_code(polarity.is_known(), polarity.code(), &valid, Polarity::FIELD)
}

pub fn validate_source(source: Source) -> ValidationResult<()> {
    let valid = Source::valid_codes();
    let valid: Vec<&str> = valid.iter().map(String::as_str).collect();
    validate_known_code(source.is_known(), source.code(), &valid, Source::FIELD)
}

/// Demand in 0.1 mA units
pub fn validate_demand(demand: i32) -> ValidationResult<()> {
    validate_range(demand, MIN_DEMAND, MAX_DEMAND, ParameterField::Demand.name())
}

/// Pulse width in µs; range first, then the 10 µs increment
pub fn validate_pulse_width(pulse_width: i32) -> ValidationResult<()> {
    let field = ParameterField::PulseWidth.name();
    validate_range(pulse_width, MIN_PULSE_WIDTH_US, MAX_PULSE_WIDTH_US, field)?;
    validate_step(pulse_width as i64, PULSE_WIDTH_STEP_US as i64, field)
}

/// Interphase interval in µs
pub fn validate_dwell(dwell: i32) -> ValidationResult<()> {
    validate_range(dwell, MIN_DWELL_US, MAX_DWELL_US, ParameterField::Dwell.name())
}

/// Recovery ratio in percent
pub fn validate_recovery(recovery: i32) -> ValidationResult<()> {
    validate_range(
        recovery,
        MIN_RECOVERY_PERCENT,
        MAX_RECOVERY_PERCENT,
        ParameterField::Recovery.name(),
    )
}

/// Check every field of `config` against its domain.
///
/// Dwell and recovery are checked even in monophasic mode: the device
/// ignores them there, but they are still transmitted.
pub fn validate(config: &StimulationConfig) -> Result<(), ValidationReport> {
    let mut report = ValidationReport::default();

    report.record(validate_mode(config.mode));
    report.record(validate_polarity(config.polarity));
    report.record(validate_source(config.source));
    report.record(validate_demand(config.demand));
    report.record(validate_pulse_width(config.pulse_width));
    report.record(validate_dwell(config.dwell));
    report.record(validate_recovery(config.recovery));

    report.into_result()
}

/// `true` when `demand` is strictly above `limit_raw`
pub fn exceeds_safe_amplitude(config: &StimulationConfig, limit_raw: i32) -> bool {
    config.demand > limit_raw
}

/// Demand is legal but below what the hardware reliably reproduces
pub fn is_low_demand(config: &StimulationConfig) -> bool {
    (MIN_DEMAND..=LOW_DEMAND_ADVISORY_MAX).contains(&config.demand)
}
