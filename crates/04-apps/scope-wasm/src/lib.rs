//! Top-level WASM module for solverscope.
//!
//! This crate is the single WASM artifact exposed to the controller page:
//! the exported session entry plus the JS-backed host runtime and resume
//! signal. The solving engine must run inside a dedicated worker; its
//! suspension points park the worker thread, which is what keeps the
//! main-thread controller responsive while solving is gated.

#![allow(missing_docs)]

#[cfg(target_arch = "wasm32")]
mod host_js;

#[cfg(target_arch = "wasm32")]
pub use host_js::{scope_run, JsHostRuntime, JsResume};
