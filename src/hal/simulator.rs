//! In-memory stimulator
//!
//! Holds a resident parameter set the way the hardware does, records every
//! call in order, and models the observable pulse behaviour: disabled output
//! delivers nothing and alternating polarity flips on each delivered pulse.
//! Status codes are configurable so callers can check that non-zero codes
//! are passed through untouched.

use crate::config::constants::codes;
use crate::hal::traits::{DeviceError, StimulatorDevice};
use crate::hal::types::{DeviceOperation, DeviceParameters, StatusCode};
use crate::params::StimulationConfig;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Parameters resident on the simulated device at power-up
    pub initial_parameters: DeviceParameters,
    pub set_status: i32,
    pub get_status: i32,
    pub trigger_status: i32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            initial_parameters: DeviceParameters::from(&StimulationConfig::default()),
            set_status: 0,
            get_status: 0,
            trigger_status: 0,
        }
    }
}

/// One recorded device call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCall {
    Set(DeviceParameters),
    Get,
    Trigger,
}

impl DeviceCall {
    pub fn operation(&self) -> DeviceOperation {
        match self {
            DeviceCall::Set(_) => DeviceOperation::Set,
            DeviceCall::Get => DeviceOperation::Get,
            DeviceCall::Trigger => DeviceOperation::Trigger,
        }
    }
}

/// Sign of the current delivered by a pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseDirection {
    Positive,
    Negative,
}

/// A pulse the simulated output stage actually delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveredPulse {
    pub parameters: DeviceParameters,
    pub direction: PulseDirection,
}

pub struct SimulatedStimulator {
    config: SimulatorConfig,
    resident: DeviceParameters,
    calls: Vec<DeviceCall>,
    delivered: Vec<DeliveredPulse>,
    // Direction of the next pulse under alternating polarity
    next_alternating: PulseDirection,
    fail_next: Option<DeviceOperation>,
}

impl SimulatedStimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            resident: config.initial_parameters,
            config,
            calls: Vec::new(),
            delivered: Vec::new(),
            next_alternating: PulseDirection::Positive,
            fail_next: None,
        }
    }

    /// Simulator whose device already holds `params`, as if left there by
    /// another program or an earlier run
    pub fn with_resident(params: DeviceParameters) -> Self {
        Self::new(SimulatorConfig {
            initial_parameters: params,
            ..SimulatorConfig::default()
        })
    }

    pub fn resident_parameters(&self) -> DeviceParameters {
        self.resident
    }

    /// Every call in the order it was made
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    pub fn call_count(&self, operation: DeviceOperation) -> usize {
        self.calls.iter().filter(|c| c.operation() == operation).count()
    }

    /// Parameters of each `set` call, in order
    pub fn uploads(&self) -> Vec<DeviceParameters> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::Set(params) => Some(*params),
                _ => None,
            })
            .collect()
    }

    pub fn delivered_pulses(&self) -> &[DeliveredPulse] {
        &self.delivered
    }

    pub fn clear_history(&mut self) {
        self.calls.clear();
        self.delivered.clear();
    }

    /// Make the next call of `operation` fail as if the binding were broken
    pub fn fail_next(&mut self, operation: DeviceOperation) {
        self.fail_next = Some(operation);
    }

    pub fn set_status_codes(&mut self, set: i32, get: i32, trigger: i32) {
        self.config.set_status = set;
        self.config.get_status = get;
        self.config.trigger_status = trigger;
    }

    fn check_injected_failure(&mut self, operation: DeviceOperation) -> Result<(), DeviceError> {
        if self.fail_next == Some(operation) {
            self.fail_next = None;
            return Err(DeviceError::CallFailed {
                operation,
                reason: "simulated binding failure".to_string(),
            });
        }
        Ok(())
    }

    fn pulse_direction(&mut self) -> PulseDirection {
        if self.resident.polarity == codes::POLARITY_NEGATIVE {
            PulseDirection::Negative
        } else if self.resident.polarity == codes::POLARITY_ALTERNATING {
            let direction = self.next_alternating;
            self.next_alternating = match direction {
                PulseDirection::Positive => PulseDirection::Negative,
                PulseDirection::Negative => PulseDirection::Positive,
            };
            direction
        } else {
            PulseDirection::Positive
        }
    }
}

impl Default for SimulatedStimulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl StimulatorDevice for SimulatedStimulator {
    fn set(&mut self, params: &DeviceParameters) -> Result<StatusCode, DeviceError> {
        self.check_injected_failure(DeviceOperation::Set)?;
        self.calls.push(DeviceCall::Set(*params));
        self.resident = *params;
        trace!(?params, "simulator accepted parameters");
        Ok(StatusCode(self.config.set_status))
    }

    fn get(&mut self) -> Result<(DeviceParameters, StatusCode), DeviceError> {
        self.check_injected_failure(DeviceOperation::Get)?;
        self.calls.push(DeviceCall::Get);
        Ok((self.resident, StatusCode(self.config.get_status)))
    }

    fn trigger(&mut self) -> Result<StatusCode, DeviceError> {
        self.check_injected_failure(DeviceOperation::Trigger)?;
        self.calls.push(DeviceCall::Trigger);

        if self.resident.enabled != codes::DISABLED {
            let direction = self.pulse_direction();
            self.delivered.push(DeliveredPulse {
                parameters: self.resident,
                direction,
            });
            trace!(?direction, demand = self.resident.demand, "simulator delivered pulse");
        }

        Ok(StatusCode(self.config.trigger_status))
    }
}
