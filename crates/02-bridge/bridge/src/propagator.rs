//! The engine extension that emits events and suspends at every callback.

use std::sync::Arc;

use engine_abi::{Assignment, Lit, Model, PropagateControl, PropagateInit, Propagator, SolveEventHandler};
use gate::Gate;

use crate::command::{CallbackKind, HostCommand};
use crate::host::HostRuntime;
use crate::watch::{register_watches, WatchSpec};

/// Observation-only propagator bridging engine callbacks to the controller.
///
/// Every callback follows the same shape: emit the callback's events in the
/// order the engine supplied their data, query the host for this kind's wait
/// time, then suspend on the gate. The bridge never mutates solver-owned
/// state; its only causal effect on search is timing.
pub struct PropagatorBridge {
    watch_spec: WatchSpec,
    host: Arc<dyn HostRuntime>,
    gate: Gate,
}

impl PropagatorBridge {
    pub fn new(watch_spec: WatchSpec, host: Arc<dyn HostRuntime>, gate: Gate) -> Self {
        Self {
            watch_spec,
            host,
            gate,
        }
    }

    fn suspend(&self, kind: CallbackKind) {
        let wait = self.host.wait_time(kind);
        self.gate.wait_and_suspend(wait);
    }
}

impl Propagator for PropagatorBridge {
    fn init(&mut self, init: &mut dyn PropagateInit) -> anyhow::Result<()> {
        let watched = register_watches(&self.watch_spec, init, self.host.as_ref())?;
        tracing::debug!(watched, "watch registration complete");
        Ok(())
    }

    fn propagate(&mut self, _ctl: &mut dyn PropagateControl, changes: &[Lit]) -> anyhow::Result<()> {
        for &literal in changes {
            self.host.execute(HostCommand::Propagate { literal })?;
        }
        self.suspend(CallbackKind::Propagate);
        Ok(())
    }

    fn undo(&mut self, _ctl: &dyn PropagateControl, changes: &[Lit]) {
        // Runs during engine state unwinding; a failure here must not cross
        // back into the engine. Degrade to a no-op and skip the suspend: a
        // host that rejects commands has no controller left to resume us.
        for &literal in changes {
            if let Err(err) = self.host.execute(HostCommand::Undo { literal }) {
                tracing::warn!(%err, "undo emission failed, dropping rest of batch");
                return;
            }
        }
        self.suspend(CallbackKind::Undo);
    }

    fn check(&mut self, ctl: &mut dyn PropagateControl) -> anyhow::Result<()> {
        // Snapshot is regenerated fresh on every check and not retained.
        let assignment = ctl
            .assignment()
            .into_iter()
            .map(|(lit, truth)| if truth { lit } else { -lit })
            .collect();
        self.host.execute(HostCommand::Check { assignment })?;
        self.suspend(CallbackKind::Check);
        Ok(())
    }

    fn decide(&mut self, _thread_id: u32, _assignment: &Assignment, _fallback: Lit) -> Option<Lit> {
        self.suspend(CallbackKind::Decide);
        // Never force a branch; observation must not influence the search
        // outcome.
        None
    }
}

/// Solve event handler mirroring the bridge's emit-then-suspend discipline.
///
/// Model content is intentionally not forwarded; the controller receives only
/// the notification.
pub struct ModelEventBridge {
    host: Arc<dyn HostRuntime>,
    gate: Gate,
}

impl ModelEventBridge {
    pub fn new(host: Arc<dyn HostRuntime>, gate: Gate) -> Self {
        Self { host, gate }
    }
}

impl SolveEventHandler for ModelEventBridge {
    fn on_model(&mut self, _model: &Model) -> anyhow::Result<bool> {
        self.host.execute(HostCommand::OnModel)?;
        let wait = self.host.wait_time(CallbackKind::OnModel);
        self.gate.wait_and_suspend(wait);
        Ok(true)
    }
}
