//! Propagator bridge between a solving engine and an external controller.
//!
//! This crate composes the pieces described in the bridge spec:
//! * [`WatchSpec`] / [`register_watches`] – predicate-based watch selection.
//! * [`HostCommand`] / [`HostRuntime`] – structured commands serialized only
//!   at the controller boundary.
//! * [`WaitProfile`] – per-callback wait durations, host-owned and re-queried
//!   on every callback.
//! * [`PropagatorBridge`] / [`ModelEventBridge`] – the engine extension that
//!   emits events and suspends on the gate at every callback.

mod command;
mod error;
mod host;
mod profile;
mod propagator;
mod watch;

pub use command::{CallbackKind, HostCommand};
pub use error::{BridgeError, BridgeResult, HostError};
pub use host::HostRuntime;
pub use profile::WaitProfile;
pub use propagator::{ModelEventBridge, PropagatorBridge};
pub use watch::{register_watches, WatchSpec, WATCH_ALL_TOKEN};
