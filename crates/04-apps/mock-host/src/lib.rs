//! Recording host runtime and session harness for tests.
//!
//! `RecordingHost` streams every executed command into a channel, so a test
//! acting as the controller can observe events while the engine thread is
//! suspended on the gate, exactly as a real controller would.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;

use bridge::{CallbackKind, HostCommand, HostError, HostRuntime, WaitProfile};
use gate::{ResumeFlag, ResumeSignal};

/// Channel-backed host runtime with a mutable wait profile.
pub struct RecordingHost {
    sender: Sender<HostCommand>,
    profile: RwLock<WaitProfile>,
}

impl RecordingHost {
    /// Creates a host and the receiving end of its command stream.
    pub fn new() -> (Arc<Self>, Receiver<HostCommand>) {
        let (sender, receiver) = unbounded();
        let host = Arc::new(Self {
            sender,
            profile: RwLock::new(WaitProfile::default()),
        });
        (host, receiver)
    }

    /// Controller-side wait-time update; takes effect on the next callback.
    pub fn set_wait(&self, kind: CallbackKind, wait: Duration) {
        self.profile.write().set(kind, wait);
    }

    pub fn set_profile(&self, profile: WaitProfile) {
        *self.profile.write() = profile;
    }
}

impl HostRuntime for RecordingHost {
    fn execute(&self, command: HostCommand) -> Result<(), HostError> {
        self.sender
            .send(command)
            .map_err(|_| HostError::Disconnected)
    }

    fn wait_time(&self, kind: CallbackKind) -> Duration {
        self.profile.read().get(kind)
    }
}

/// One controller seat: host, command stream, and resume flag.
pub struct Harness {
    pub host: Arc<RecordingHost>,
    pub commands: Receiver<HostCommand>,
    pub resume: ResumeFlag,
}

impl Harness {
    /// Fresh harness with zero waits and the resume flag held low.
    pub fn new() -> Self {
        let (host, commands) = RecordingHost::new();
        Self {
            host,
            commands,
            resume: ResumeFlag::new(),
        }
    }

    /// The resume flag as the signal handle a session expects.
    pub fn signal(&self) -> Arc<dyn ResumeSignal> {
        Arc::new(self.resume.clone())
    }

    /// Commands received so far, without blocking.
    pub fn drain(&self) -> Vec<HostCommand> {
        self.commands.try_iter().collect()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
