// src/hal/traits.rs
//! Core HAL trait for stimulator backends

use crate::hal::types::{DeviceOperation, DeviceParameters, StatusCode};
use thiserror::Error;

/// A device call that could not be made at all.
///
/// This is distinct from a status code: a call that returns any code,
/// including a negative one, succeeded as far as this layer is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("{operation} could not be invoked: {reason}")]
    CallFailed {
        operation: DeviceOperation,
        reason: String,
    },
}

/// Blocking access to one stimulator.
///
/// Implementations perform exactly one device call per method and never
/// retry. The session relies on that to count uploads and triggers.
pub trait StimulatorDevice: Send {
    /// Upload all eight parameters
    fn set(&mut self, params: &DeviceParameters) -> Result<StatusCode, DeviceError>;

    /// Read back the parameters currently resident on the device
    fn get(&mut self) -> Result<(DeviceParameters, StatusCode), DeviceError>;

    /// Fire one pulse with whatever parameters the device currently holds
    fn trigger(&mut self) -> Result<StatusCode, DeviceError>;
}

impl<D: StimulatorDevice + ?Sized> StimulatorDevice for Box<D> {
    fn set(&mut self, params: &DeviceParameters) -> Result<StatusCode, DeviceError> {
        (**self).set(params)
    }

    fn get(&mut self) -> Result<(DeviceParameters, StatusCode), DeviceError> {
        (**self).get()
    }

    fn trigger(&mut self) -> Result<StatusCode, DeviceError> {
        (**self).trigger()
    }
}
