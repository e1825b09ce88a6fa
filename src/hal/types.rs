// src/hal/types.rs
//! Wire-level types shared by every stimulator implementation

use crate::config::constants::{codes, native};
use crate::params::{Mode, Polarity, Source, StimulationConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight fixed `i32` fields exchanged with the device, in call order
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DeviceParameters {
    pub mode: i32,
    pub polarity: i32,
    pub source: i32,
    pub demand: i32,
    pub pulse_width: i32,
    pub dwell: i32,
    pub recovery: i32,
    pub enabled: i32,
}

impl DeviceParameters {
    pub const fn as_array(&self) -> [i32; native::PARAMETER_FIELD_COUNT] {
        [
            self.mode,
            self.polarity,
            self.source,
            self.demand,
            self.pulse_width,
            self.dwell,
            self.recovery,
            self.enabled,
        ]
    }

    pub const fn from_array(fields: [i32; native::PARAMETER_FIELD_COUNT]) -> Self {
        let [mode, polarity, source, demand, pulse_width, dwell, recovery, enabled] = fields;
        Self { mode, polarity, source, demand, pulse_width, dwell, recovery, enabled }
    }

    /// Whether `enabled` carries one of the two documented values
    pub const fn has_binary_enabled(&self) -> bool {
        self.enabled == codes::DISABLED || self.enabled == codes::ENABLED
    }
}

impl From<&StimulationConfig> for DeviceParameters {
    fn from(config: &StimulationConfig) -> Self {
        Self {
            mode: config.mode.code(),
            polarity: config.polarity.code(),
            source: config.source.code(),
            demand: config.demand,
            pulse_width: config.pulse_width,
            dwell: config.dwell,
            recovery: config.recovery,
            enabled: if config.enabled { codes::ENABLED } else { codes::DISABLED },
        }
    }
}

impl From<StimulationConfig> for DeviceParameters {
    fn from(config: StimulationConfig) -> Self {
        Self::from(&config)
    }
}

/// Device read-back to the typed model. Any non-zero `enabled` counts as on.
impl From<DeviceParameters> for StimulationConfig {
    fn from(params: DeviceParameters) -> Self {
        Self {
            mode: Mode::from_code(params.mode),
            polarity: Polarity::from_code(params.polarity),
            source: Source::from_code(params.source),
            demand: params.demand,
            pulse_width: params.pulse_width,
            dwell: params.dwell,
            recovery: params.recovery,
            enabled: params.enabled != codes::DISABLED,
        }
    }
}

/// Opaque return value of a device call. Recorded, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub i32);

impl StatusCode {
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three device entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceOperation {
    Set,
    Get,
    Trigger,
}

impl DeviceOperation {
    pub const ALL: [DeviceOperation; 3] =
        [DeviceOperation::Set, DeviceOperation::Get, DeviceOperation::Trigger];

    /// Exported symbol name in the native module
    pub const fn symbol(self) -> &'static str {
        match self {
            DeviceOperation::Set => native::SET_SYMBOL,
            DeviceOperation::Get => native::GET_SYMBOL,
            DeviceOperation::Trigger => native::TRIGGER_SYMBOL,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            DeviceOperation::Set => 0,
            DeviceOperation::Get => 1,
            DeviceOperation::Trigger => 2,
        }
    }
}

impl fmt::Display for DeviceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
