//! Validation utilities for ds8r-core
//!
//! Generic range, step and enumeration checks. Domain limits come from
//! `config::constants`; this module only knows how to compare.

use std::fmt;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Single-field validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value out of valid range
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },
    /// Value inside the range but not on the required increment
    InvalidStep {
        field: String,
        value: i64,
        step: i64,
    },
    /// Invalid enum value
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidStep { field, .. }
            | ValidationError::InvalidEnumValue { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange { field, value, min, max } => {
                write!(f, "Field '{}' value '{}' is out of range [{}, {}]", field, value, min, max)
            }
            ValidationError::InvalidStep { field, value, step } => {
                write!(f, "Field '{}' value '{}' is not a multiple of {}", field, value, step)
            }
            ValidationError::InvalidEnumValue { field, value, valid_values } => {
                write!(f, "Field '{}' value '{}' is invalid, valid values: [{}]",
                       field, value, valid_values.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate numeric range (inclusive on both ends)
pub fn validate_range<T>(value: T, min: T, max: T, field: &str) -> ValidationResult<()>
where
    T: PartialOrd + fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Validate that `value` is a whole multiple of `step`
pub fn validate_step(value: i64, step: i64, field: &str) -> ValidationResult<()> {
    if step != 0 && value % step != 0 {
        return Err(ValidationError::InvalidStep {
            field: field.to_string(),
            value,
            step,
        });
    }
    Ok(())
}

/// Validate that an enumerated code was recognised
pub fn validate_known_code<V>(known: bool, value: V, valid_values: &[&str], field: &str) -> ValidationResult<()>
where
    V: fmt::Display,
{
    if !known {
        return Err(ValidationError::InvalidEnumValue {
            field: field.to_string(),
            value: value.to_string(),
            valid_values: valid_values.iter().map(|v| v.to_string()).collect(),
        });
    }
    Ok(())
}
