//! Controller runtime trait implemented by concrete hosts.

use std::time::Duration;

use crate::command::{CallbackKind, HostCommand};
use crate::error::HostError;

/// One-directional command sink plus synchronous wait-time queries.
///
/// Implementations must be callable from whichever thread the engine uses to
/// invoke callbacks. Wait times are queried fresh on every callback, so a
/// host may change them between calls.
pub trait HostRuntime: Send + Sync {
    /// Hands one command to the controller runtime for execution.
    fn execute(&self, command: HostCommand) -> Result<(), HostError>;

    /// Current wait duration for the given callback kind. Expected to return
    /// immediately.
    fn wait_time(&self, kind: CallbackKind) -> Duration;
}
