// src/hal/serialized.rs
//! Single-writer wrapper for sharing one stimulator between sessions
//!
//! The native module does not arbitrate concurrent callers. Cloning a
//! `SerializedDevice` shares the device; each call holds the lock for exactly
//! one device operation.

use crate::hal::traits::{DeviceError, StimulatorDevice};
use crate::hal::types::{DeviceParameters, StatusCode};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct SerializedDevice<D> {
    inner: Arc<Mutex<D>>,
}

impl<D: StimulatorDevice> SerializedDevice<D> {
    pub fn new(device: D) -> Self {
        Self { inner: Arc::new(Mutex::new(device)) }
    }

    /// Run `f` with exclusive access to the wrapped device
    pub fn with_device<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Number of handles sharing this device
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<D> Clone for SerializedDevice<D> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<D: StimulatorDevice> StimulatorDevice for SerializedDevice<D> {
    fn set(&mut self, params: &DeviceParameters) -> Result<StatusCode, DeviceError> {
        self.inner.lock().set(params)
    }

    fn get(&mut self) -> Result<(DeviceParameters, StatusCode), DeviceError> {
        self.inner.lock().get()
    }

    fn trigger(&mut self) -> Result<StatusCode, DeviceError> {
        self.inner.lock().trigger()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::simulator::SimulatedStimulator;
    use crate::hal::types::DeviceOperation;
    use std::thread;

    #[test]
    fn test_clones_share_one_device() {
        let mut a = SerializedDevice::new(SimulatedStimulator::default());
        let mut b = a.clone();
        assert_eq!(a.handle_count(), 2);

        a.trigger().expect("trigger failed");
        b.trigger().expect("trigger failed");

        let triggers = a.with_device(|sim| sim.call_count(DeviceOperation::Trigger));
        assert_eq!(triggers, 2);
    }

    #[test]
    fn test_concurrent_calls_are_all_recorded() {
        let shared = SerializedDevice::new(SimulatedStimulator::default());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mut device = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        device.trigger().expect("trigger failed");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker panicked");
        }

        assert_eq!(shared.with_device(|sim| sim.calls().len()), 100);
    }
}
