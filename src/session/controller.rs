// src/session/controller.rs
//! Session controller: sequences device calls and enforces the interlock
//!
//! A session owns one [`StimulationConfig`] and one device. Edits stay local
//! until [`upload_parameters`](StimulationSession::upload_parameters);
//! [`trigger_pulse`](StimulationSession::trigger_pulse) fires whatever the
//! device currently holds, which may not be this session's configuration.
//! [`run`](StimulationSession::run) is the only operation that checks the
//! demand against the interlock limit.

use crate::config::constants::safety;
use crate::config::{ConfigError, ControllerConfig};
use crate::error::{StimError, StimResult};
use crate::events::{DeviceEvent, EventHub};
use crate::hal::{
    DeviceError, DeviceOperation, DeviceParameters, NativeDevice, StatusCode, StimulatorDevice,
};
use crate::params::{
    is_low_demand, validate_demand, validate_dwell, validate_mode, validate_polarity,
    validate_pulse_width, validate_recovery, validate_source, Mode, Polarity, Source,
    StimulationConfig,
};
use crate::session::state::SessionPhase;
use crate::utils::validation::{validate_range, ValidationResult};
use crossbeam::channel::Receiver;
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Status codes returned by one `run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PulseReport {
    pub upload_status: StatusCode,
    pub trigger_status: StatusCode,
    /// The demand was above the interlock limit and `force` let it through
    pub forced: bool,
}

pub struct StimulationSession<D: StimulatorDevice> {
    config: StimulationConfig,
    device: D,
    reported: Option<StimulationConfig>,
    demand_limit_raw: i32,
    strict: bool,
    phase: SessionPhase,
    last_status: [Option<StatusCode>; 3],
    events: EventHub,
}

impl<D: StimulatorDevice> StimulationSession<D> {
    /// Session with default parameters and the default interlock limit
    pub fn new(device: D) -> Self {
        Self::with_config(device, StimulationConfig::default())
    }

    /// Session starting from caller-supplied parameters. Nothing is
    /// validated until upload.
    pub fn with_config(device: D, config: StimulationConfig) -> Self {
        Self {
            config,
            device,
            reported: None,
            demand_limit_raw: safety::SAFE_DEMAND_LIMIT_RAW,
            strict: false,
            phase: SessionPhase::default(),
            last_status: [None; 3],
            events: EventHub::new(),
        }
    }

    /// Session built from a loaded [`ControllerConfig`]
    pub fn from_controller_config(device: D, settings: &ControllerConfig) -> StimResult<Self> {
        settings.validate().map_err(ConfigError::ValidationError)?;

        let session = Self::with_config(device, settings.parameters)
            .with_demand_limit(settings.safety.demand_limit_raw)?
            .with_strict_validation(settings.session.strict_validation);
        Ok(session)
    }

    /// Change the interlock limit (raw demand units, 1..=150)
    pub fn with_demand_limit(mut self, limit_raw: i32) -> StimResult<Self> {
        validate_range(
            limit_raw,
            safety::MIN_CONFIGURABLE_LIMIT_RAW,
            safety::MAX_CONFIGURABLE_LIMIT_RAW,
            "demand_limit_raw",
        )?;
        self.demand_limit_raw = limit_raw;
        Ok(self)
    }

    /// Reject out-of-domain values in the typed setters
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn config(&self) -> &StimulationConfig {
        &self.config
    }

    /// Direct field access. Bypasses strict validation; upload still checks.
    pub fn config_mut(&mut self) -> &mut StimulationConfig {
        self.phase = SessionPhase::Configured;
        &mut self.config
    }

    /// Replace the whole local configuration
    pub fn replace_config(&mut self, config: StimulationConfig) -> StimResult<()> {
        if self.strict {
            config.validate()?;
        }
        self.config = config;
        self.phase = SessionPhase::Configured;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: Mode) -> StimResult<()> {
        self.apply(validate_mode(mode), |c| c.mode = mode)
    }

    pub fn set_polarity(&mut self, polarity: Polarity) -> StimResult<()> {
        self.apply(validate_polarity(polarity), |c| c.polarity = polarity)
    }

    pub fn set_source(&mut self, source: Source) -> StimResult<()> {
        self.apply(validate_source(source), |c| c.source = source)
    }

    pub fn set_demand(&mut self, demand: i32) -> StimResult<()> {
        self.apply(validate_demand(demand), |c| c.demand = demand)
    }

    pub fn set_pulse_width(&mut self, pulse_width: i32) -> StimResult<()> {
        self.apply(validate_pulse_width(pulse_width), |c| c.pulse_width = pulse_width)
    }

    pub fn set_dwell(&mut self, dwell: i32) -> StimResult<()> {
        self.apply(validate_dwell(dwell), |c| c.dwell = dwell)
    }

    pub fn set_recovery(&mut self, recovery: i32) -> StimResult<()> {
        self.apply(validate_recovery(recovery), |c| c.recovery = recovery)
    }

    fn apply(
        &mut self,
        check: ValidationResult<()>,
        edit: impl FnOnce(&mut StimulationConfig),
    ) -> StimResult<()> {
        if self.strict {
            check?;
        }
        edit(&mut self.config);
        self.phase = SessionPhase::Configured;
        Ok(())
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Configuration last read back by `get_state`
    pub fn reported_state(&self) -> Option<&StimulationConfig> {
        self.reported.as_ref()
    }

    pub fn demand_limit(&self) -> i32 {
        self.demand_limit_raw
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Last status code returned by `operation`, if it has been called
    pub fn last_status(&self, operation: DeviceOperation) -> Option<StatusCode> {
        self.last_status[operation.index()]
    }

    /// Receive a [`DeviceEvent`] for every subsequent device call
    pub fn subscribe(&self) -> Receiver<DeviceEvent> {
        self.events.subscribe()
    }

    /// `true` if `run(false)` would be refused with the current demand
    pub fn exceeds_safe_amplitude(&self) -> bool {
        self.config.exceeds_safe_amplitude(self.demand_limit_raw)
    }

    /// Send the current configuration to the device without triggering.
    ///
    /// Refused without a device call if any field is outside its domain.
    /// The returned status code is recorded but not interpreted.
    pub fn upload_parameters(&mut self) -> StimResult<StatusCode> {
        if let Err(report) = self.config.validate() {
            warn!(%report, "upload refused");
            return Err(StimError::InvalidParameters(report));
        }

        if is_low_demand(&self.config) {
            warn!(
                demand = self.config.demand,
                "demand below 2.0 mA may not be reproduced accurately by the device"
            );
        }

        let params = DeviceParameters::from(&self.config);
        let status = self.device.set(&params).map_err(|e| log_call_failure(DeviceOperation::Set, e))?;
        self.record(DeviceOperation::Set, status, Some(params));
        self.phase = self.phase.after_upload();

        info!(
            status = status.raw(),
            mode = %self.config.mode,
            demand = self.config.demand,
            pulse_width = self.config.pulse_width,
            enabled = self.config.enabled,
            "parameters uploaded"
        );
        Ok(status)
    }

    /// Fire one pulse with whatever the device currently holds
    pub fn trigger_pulse(&mut self) -> StimResult<StatusCode> {
        let status = self.device.trigger().map_err(|e| log_call_failure(DeviceOperation::Trigger, e))?;
        self.record(DeviceOperation::Trigger, status, None);
        self.phase = self.phase.after_trigger();

        info!(status = status.raw(), "pulse triggered");
        Ok(status)
    }

    /// Set the output enable flag and upload. Never triggers.
    ///
    /// If the upload is refused or fails, the local flag and phase are left
    /// as they were, since the device did not change either.
    pub fn set_enabled(&mut self, enabled: bool) -> StimResult<StatusCode> {
        let (previous, phase) = (self.config.enabled, self.phase);
        self.config.enabled = enabled;
        self.phase = SessionPhase::Configured;

        let status = match self.upload_parameters() {
            Ok(status) => status,
            Err(e) => {
                self.config.enabled = previous;
                self.phase = phase;
                return Err(e);
            }
        };

        info!(enabled, "device output {}", if enabled { "enabled" } else { "disabled" });
        Ok(status)
    }

    /// Read the device's parameters and make them the local configuration.
    ///
    /// This replaces every field; unuploaded local edits are lost. `verbose`
    /// only raises the log level of the parameter dump.
    pub fn get_state(&mut self, verbose: bool) -> StimResult<StimulationConfig> {
        let (params, status) = self.device.get().map_err(|e| log_call_failure(DeviceOperation::Get, e))?;
        self.record(DeviceOperation::Get, status, Some(params));

        if !params.has_binary_enabled() {
            warn!(enabled = params.enabled, "device reported a non-binary enabled value; treating as enabled");
        }

        let state = StimulationConfig::from(params);
        self.config = state;
        self.reported = Some(state);
        self.phase = SessionPhase::Configured;

        if verbose {
            info!(
                status = status.raw(),
                mode = %state.mode,
                polarity = %state.polarity,
                source = %state.source,
                demand = state.demand,
                pulse_width = state.pulse_width,
                dwell = state.dwell,
                recovery = state.recovery,
                enabled = state.enabled,
                "current device parameters"
            );
        } else {
            debug!(status = status.raw(), ?params, "device parameters read back");
        }

        Ok(state)
    }

    /// Upload then trigger, refusing demands above the interlock limit
    /// unless `force` is set.
    ///
    /// A refusal makes no device call and leaves the configuration as is.
    /// Otherwise both calls are made in order regardless of the upload's
    /// status code.
    pub fn run(&mut self, force: bool) -> StimResult<PulseReport> {
        let demand = self.config.demand;
        let limit = self.demand_limit_raw;
        let over_limit = self.exceeds_safe_amplitude();

        if over_limit && !force {
            warn!(demand, limit, "interlock refused run");
            return Err(StimError::InterlockViolation { demand, limit });
        }
        if over_limit {
            warn!(demand, limit, "interlock overridden with force");
        }

        let upload_status = self.upload_parameters()?;
        let trigger_status = self.trigger_pulse()?;

        Ok(PulseReport {
            upload_status,
            trigger_status,
            forced: over_limit,
        })
    }

    fn record(&mut self, operation: DeviceOperation, status: StatusCode, params: Option<DeviceParameters>) {
        self.last_status[operation.index()] = Some(status);
        self.events.publish(operation, status, params);
    }
}

impl StimulationSession<NativeDevice> {
    /// Session on the native module, loading it on first use
    pub fn open(settings: &ControllerConfig) -> StimResult<Self> {
        settings.validate().map_err(ConfigError::ValidationError)?;
        let device = NativeDevice::open(settings.device.module_path.as_deref())?;
        Self::from_controller_config(device, settings)
    }

    /// Native session with defaults and the default module location
    pub fn open_default() -> StimResult<Self> {
        Self::open(&ControllerConfig::default())
    }
}

fn log_call_failure(operation: DeviceOperation, err: DeviceError) -> StimError {
    error!(%operation, error = %err, "device call failed");
    StimError::Device(err)
}
