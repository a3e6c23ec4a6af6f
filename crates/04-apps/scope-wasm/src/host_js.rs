//! JS host runtime and session entry (wasm32 only).

use std::sync::Arc;
use std::time::Duration;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use web_sys::console;

use bridge::{CallbackKind, HostCommand, HostError, HostRuntime};
use engine_mock::FactEngine;
use gate::ResumeSignal;

fn eval(source: &str) -> Result<JsValue, String> {
    js_sys::eval(source).map_err(|err| format!("{err:?}"))
}

/// Host runtime executing rendered commands in the controller page.
///
/// Commands become `interface_*` calls; wait times come from the page's
/// `interface_wait_time_*` query functions, re-evaluated on every callback
/// so the controller can adjust pacing mid-run.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsHostRuntime;

impl HostRuntime for JsHostRuntime {
    fn execute(&self, command: HostCommand) -> Result<(), HostError> {
        eval(&command.render())
            .map(|_| ())
            .map_err(|message| HostError::Execute {
                command: command.name(),
                message,
            })
    }

    fn wait_time(&self, kind: CallbackKind) -> Duration {
        let query = match kind {
            CallbackKind::Propagate => "interface_wait_time_propagate()",
            CallbackKind::Undo => "interface_wait_time_undo()",
            CallbackKind::Check => "interface_wait_time_check()",
            CallbackKind::Decide => "interface_wait_time_decide()",
            CallbackKind::OnModel => "interface_wait_time_on_model()",
        };
        match eval(query) {
            Ok(value) => Duration::from_millis(value.as_f64().unwrap_or(0.0).max(0.0) as u64),
            Err(message) => {
                console::warn_1(&format!("wait-time query failed: {message}").into());
                Duration::ZERO
            }
        }
    }
}

/// Readiness flag polled by the suspension gate.
///
/// Reads the controller-owned `can_resume` global; the controller resets it
/// when it receives an event and sets it again at its own pace.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsResume;

impl ResumeSignal for JsResume {
    fn can_resume(&self) -> bool {
        Reflect::get(&js_sys::global(), &JsValue::from_str("can_resume"))
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }
}

/// Runs one interactive solving session and returns its exit code.
///
/// `options` is whitespace-tokenized and passed to the engine's argument
/// parser; `watched_predicates` is the whitespace-delimited watch list, with
/// `*` meaning every atom. The in-tree fact engine backs the session; a real
/// engine binds through the same `Engine` trait.
#[wasm_bindgen]
pub fn scope_run(program: &str, options: &str, watched_predicates: &str) -> i32 {
    console::log_1(&"scope_run: starting session".into());
    let mut engine = FactEngine::new();
    let code = session::run(
        &mut engine,
        Arc::new(JsHostRuntime),
        Arc::new(JsResume),
        program,
        options,
        watched_predicates,
    );
    console::log_1(&format!("scope_run: session finished with code {code}").into());
    code
}
