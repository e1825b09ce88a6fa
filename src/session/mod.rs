// src/session/mod.rs
//! Stimulation session: the controller that owns a device and sequences
//! upload, trigger and read-back around the interlock.

pub mod controller;
pub mod state;

pub use controller::{PulseReport, StimulationSession};
pub use state::SessionPhase;
