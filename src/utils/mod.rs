//! Common utility functions for ds8r-core
//!
//! - Timestamps with an injectable clock for event records
//! - Generic range/step/enumeration validation helpers
//!
//! Limits are never hard-coded here; callers pass values from
//! `config::constants`.

pub mod time;
pub mod validation;

// Re-export commonly used functions for convenience
pub use time::{current_timestamp_nanos, MockTimeProvider, SystemTimeProvider, TimeProvider};

pub use validation::{
    validate_known_code, validate_range, validate_step, ValidationError, ValidationResult,
};
