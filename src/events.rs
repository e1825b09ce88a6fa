// src/events.rs
//! Structured device-call records
//!
//! Every device call produces a [`DeviceEvent`]. The event is logged through
//! `tracing` and fanned out to any channel returned by
//! [`EventHub::subscribe`]. Receivers that have been dropped are pruned on
//! the next publish.

use crate::hal::{DeviceOperation, DeviceParameters, StatusCode};
use crate::utils::time::{SystemTimeProvider, TimeProvider};
use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceEvent {
    pub operation: DeviceOperation,
    pub status: StatusCode,
    /// Parameters sent (set) or received (get); absent for trigger
    pub parameters: Option<DeviceParameters>,
    pub timestamp_nanos: u64,
}

impl DeviceEvent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub struct EventHub {
    subscribers: Mutex<Vec<Sender<DeviceEvent>>>,
    clock: Box<dyn TimeProvider>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemTimeProvider))
    }

    pub fn with_clock(clock: Box<dyn TimeProvider>) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            clock,
        }
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> Receiver<DeviceEvent> {
        let (tx, rx) = channel::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn publish(
        &self,
        operation: DeviceOperation,
        status: StatusCode,
        parameters: Option<DeviceParameters>,
    ) -> DeviceEvent {
        let event = DeviceEvent {
            operation,
            status,
            parameters,
            timestamp_nanos: self.clock.now_nanos(),
        };

        debug!(operation = %operation, status = status.raw(), "device call returned");

        self.subscribers.lock().retain(|tx| tx.send(event).is_ok());
        event
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}
