use std::io;

use thiserror::Error;

use crate::state::PersistError;

/// Failures inside the executor. None of these escape `execute`; each is
/// turned into an `ErrorOccurred` message at the boundary.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to {action} '{path}': {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' timed out after {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("agent exited with code {code}: {stderr}")]
    AgentExit { code: i32, stderr: String },

    #[error("snapshot '{path}': {source}")]
    Persist {
        path: String,
        #[source]
        source: PersistError,
    },

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("workflow {workflow_id} already has a running task")]
    AlreadyRunning { workflow_id: String },

    #[error("timer '{timer_id}' needs a positive period")]
    InvalidTimer { timer_id: String },

    #[error("cannot spawn an agent for a {kind} workflow")]
    NotAnAgent { kind: &'static str },

    #[error("unrecognized effect")]
    UnknownEffect,
}
