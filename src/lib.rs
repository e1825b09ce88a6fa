//! DS8R-Core: host-side controller for Digitimer DS8R constant-current stimulators
//!
//! This library drives a DS8R through the vendor's native proxy module. It
//! provides:
//!
//! - A validated parameter model with the device's legal ranges
//! - A session controller that uploads, triggers and reads back parameters
//! - A software interlock that refuses demands above a configurable limit
//! - A simulated device for testing without hardware
//! - TOML configuration and device-call event subscription
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ds8r_core::hal::SimulatedStimulator;
//! use ds8r_core::params::Mode;
//! use ds8r_core::session::StimulationSession;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = StimulationSession::new(SimulatedStimulator::default());
//!
//!     session.set_mode(Mode::Biphasic)?;
//!     session.set_demand(50)?;
//!
//!     let report = session.run(false)?;
//!     println!("upload {} trigger {}", report.upload_status, report.trigger_status);
//!
//!     let state = session.get_state(true)?;
//!     println!("device holds {:?}", state);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod events;
pub mod hal;
pub mod params;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use error::{Severity, StimError, StimResult};
pub use events::{DeviceEvent, EventHub};
pub use hal::{
    DeviceOperation, DeviceParameters, NativeDevice, SimulatedStimulator, StatusCode,
    StimulatorDevice,
};
pub use params::{Mode, Polarity, Source, StimulationConfig, ValidationReport};
pub use session::{PulseReport, SessionPhase, StimulationSession};

pub use utils::{
    time::{current_timestamp_nanos, TimeProvider},
    validation::{ValidationError, ValidationResult},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
