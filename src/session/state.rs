// src/session/state.rs
//! Session lifecycle tracking

use serde::Serialize;

/// Where the local configuration stands relative to the device.
///
/// `Configured` means local edits may not be on the device yet. `get_state`
/// returns here from any phase because it replaces the local copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionPhase {
    Configured,
    Uploaded,
    Triggered,
}

impl SessionPhase {
    /// Phase after a successful upload
    pub fn after_upload(self) -> Self {
        SessionPhase::Uploaded
    }

    /// Phase after a trigger. Triggering from `Configured` fires whatever the
    /// device holds, so local edits are still pending afterwards.
    pub fn after_trigger(self) -> Self {
        match self {
            SessionPhase::Configured => SessionPhase::Configured,
            SessionPhase::Uploaded | SessionPhase::Triggered => SessionPhase::Triggered,
        }
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Configured
    }
}
