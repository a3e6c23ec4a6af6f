use thiserror::Error;

use engine_abi::EngineError;

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failure surfaced by the controller runtime while executing a command.
///
/// There is no retry path: a failed emission terminates the run, except
/// inside the undo callback where it is suppressed.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host rejected `{command}`: {message}")]
    Execute {
        command: &'static str,
        message: String,
    },

    #[error("host command channel disconnected")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("host runtime error: {0}")]
    Host(#[from] HostError),
}
