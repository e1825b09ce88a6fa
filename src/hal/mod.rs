// src/hal/mod.rs
//! Hardware abstraction layer for DS8R stimulators

pub mod native;
pub mod serialized;
pub mod simulator;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;

pub use native::{ModuleLoadError, NativeDevice, NativeModule};
pub use serialized::SerializedDevice;
pub use simulator::{DeviceCall, SimulatedStimulator, SimulatorConfig};
pub use traits::*;
pub use types::*;
