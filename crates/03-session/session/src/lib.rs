//! Session driver: owns one interactive solving run end to end.
//!
//! The driver parses run-time options, feeds the program to the engine,
//! registers exactly one propagator bridge, grounds the default program
//! part, runs solving with a model-event bridge, and reports final
//! statistics. All failures funnel to the single top-level boundary in
//! [`run`], which maps them to a process exit code.

use std::sync::Arc;

use anyhow::Error as AnyError;
use thiserror::Error;

use bridge::{HostCommand, HostError, HostRuntime, ModelEventBridge, PropagatorBridge, WatchSpec};
use engine_abi::{Engine, EngineError, ProgramSource};
use gate::{Gate, ResumeSignal};
use log::{debug, error};

/// Fixed program-name token prefixed to the engine's argument vector.
pub const PROGRAM_NAME: &str = "solverscope";

/// Explicit termination request, caught precisely at the top boundary and
/// converted to its status, bypassing generic error mapping.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("exit requested with status {0}")]
pub struct ExitRequest(pub i32);

/// Internal failure surface of one session run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Other(#[from] AnyError),
}

/// Tokenizes the whitespace-delimited options text, prefixing the fixed
/// program-name token expected by the engine's own parser.
pub fn tokenize_options(options: &str) -> Vec<String> {
    std::iter::once(PROGRAM_NAME.to_string())
        .chain(options.split_whitespace().map(str::to_string))
        .collect()
}

/// Runs one interactive solving session and returns the process exit code.
///
/// On success this is whatever the engine's standard driver returned. An
/// [`ExitRequest`] raised anywhere in the flow yields its carried status;
/// every other failure is logged and mapped to 1.
pub fn run<E: Engine>(
    engine: &mut E,
    host: Arc<dyn HostRuntime>,
    signal: Arc<dyn ResumeSignal>,
    program: &str,
    options: &str,
    watched_predicates: &str,
) -> i32 {
    match drive(engine, host, signal, program, options, watched_predicates) {
        Ok(code) => code,
        Err(err) => {
            if let Some(status) = requested_exit(&err) {
                return status;
            }
            error!("session failed: {err}");
            1
        }
    }
}

fn drive<E: Engine>(
    engine: &mut E,
    host: Arc<dyn HostRuntime>,
    signal: Arc<dyn ResumeSignal>,
    program: &str,
    options: &str,
    watched_predicates: &str,
) -> Result<i32, SessionError> {
    let args = tokenize_options(options);
    let files = engine.configure(&args)?;

    if files.is_empty() {
        // Conventional standard-input source when no files are named.
        engine.load(ProgramSource::Stdin(program))?;
    } else {
        for file in &files {
            engine.load(ProgramSource::File(file))?;
        }
    }

    let watch_spec = WatchSpec::parse(watched_predicates);
    let propagator = PropagatorBridge::new(
        watch_spec,
        Arc::clone(&host),
        Gate::new(Arc::clone(&signal)),
    );
    // Engines may run multiple internal worker threads; request per-thread
    // locking even though the bridge itself is not thread-partitioned.
    engine.register_propagator(Box::new(propagator), true);

    engine.ground("base", &[])?;
    debug!("grounded, starting solve");

    host.execute(HostCommand::Start)?;
    let mut handler = ModelEventBridge::new(Arc::clone(&host), Gate::new(signal));
    let code = engine.solve(&mut handler)?;

    let stats = engine.statistics();
    host.execute(HostCommand::Stats {
        conflicts_analyzed: stats.conflicts_analyzed,
    })?;
    host.execute(HostCommand::Finish)?;
    debug!("session finished with driver code {code}");
    Ok(code)
}

/// Extracts an [`ExitRequest`] status if one is anywhere in the error chain.
fn requested_exit(err: &SessionError) -> Option<i32> {
    let chain = match err {
        SessionError::Engine(EngineError::Propagator(inner))
        | SessionError::Engine(EngineError::Handler(inner)) => inner,
        SessionError::Other(inner) => inner,
        _ => return None,
    };
    chain
        .chain()
        .find_map(|cause| cause.downcast_ref::<ExitRequest>())
        .map(|req| req.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_prefixes_program_name() {
        assert_eq!(tokenize_options(""), [PROGRAM_NAME]);
        assert_eq!(
            tokenize_options("  --models 2   input.lp "),
            [PROGRAM_NAME, "--models", "2", "input.lp"]
        );
    }

    #[test]
    fn exit_request_found_through_chains() {
        let err = SessionError::Other(AnyError::new(ExitRequest(7)));
        assert_eq!(requested_exit(&err), Some(7));

        let wrapped = SessionError::Engine(EngineError::Handler(
            AnyError::new(ExitRequest(30)).context("while enumerating models"),
        ));
        assert_eq!(requested_exit(&wrapped), Some(30));

        let plain = SessionError::Engine(EngineError::Unsupported("x"));
        assert_eq!(requested_exit(&plain), None);
    }
}
