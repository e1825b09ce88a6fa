// src/params/mod.rs
//! Parameter model: the stimulation configuration, its legal ranges and the
//! pure checks the session runs before touching the device.

pub mod stimulation;
pub mod types;
pub mod validation;

pub use stimulation::{
    demand_to_milliamps, milliamps_to_demand, StimulationConfig, StimulationConfigBuilder,
};
pub use types::{Mode, Polarity, Source};
pub use validation::{
    exceeds_safe_amplitude, is_low_demand, validate, validate_demand, validate_dwell,
    validate_mode, validate_polarity, validate_pulse_width, validate_recovery, validate_source,
    ParameterField, ValidationReport,
};
