//! Per-callback wait durations stored host-side.

use std::time::Duration;

use crate::command::CallbackKind;

/// Independently configurable wait per callback kind.
///
/// Hosts own one of these; the bridge never caches values and re-queries the
/// host on every callback, so mutations take effect on the next call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaitProfile {
    pub propagate: Duration,
    pub undo: Duration,
    pub check: Duration,
    pub decide: Duration,
    pub on_model: Duration,
}

impl WaitProfile {
    /// Same wait for every callback kind.
    pub fn uniform(wait: Duration) -> Self {
        Self {
            propagate: wait,
            undo: wait,
            check: wait,
            decide: wait,
            on_model: wait,
        }
    }

    pub fn get(&self, kind: CallbackKind) -> Duration {
        match kind {
            CallbackKind::Propagate => self.propagate,
            CallbackKind::Undo => self.undo,
            CallbackKind::Check => self.check,
            CallbackKind::Decide => self.decide,
            CallbackKind::OnModel => self.on_model,
        }
    }

    pub fn set(&mut self, kind: CallbackKind, wait: Duration) {
        match kind {
            CallbackKind::Propagate => self.propagate = wait,
            CallbackKind::Undo => self.undo = wait,
            CallbackKind::Check => self.check = wait,
            CallbackKind::Decide => self.decide = wait,
            CallbackKind::OnModel => self.on_model = wait,
        }
    }
}
