//! Child processes with a timeout and captured output.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, instrument, warn};

use super::error::ExecError;

/// Reported exit code for a run that hit its timeout.
pub const TIMEOUT_EXIT_CODE: i32 = 124;
/// Reported exit code for a program that could not be started.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

/// Run to completion or until the timeout, whichever comes first.
///
/// A timeout is not an error: the child is killed and the run is reported
/// with [`TIMEOUT_EXIT_CODE`] and `timed_out` set.
#[instrument(skip_all, fields(program = %spec.program, timeout_ms = spec.timeout.as_millis() as u64))]
pub async fn run(spec: &ProcessSpec) -> Result<ProcessOutput, ExecError> {
    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(cwd) = &spec.cwd {
        command.current_dir(cwd);
    }

    debug!("spawning child process");
    let child = command.spawn().map_err(|source| ExecError::Spawn {
        program: spec.program.clone(),
        source,
    })?;

    // Dropping the output future on timeout drops the child, which kills it.
    match tokio::time::timeout(spec.timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let exit_code = output.status.code().unwrap_or(-1);
            debug!(exit_code, "command finished");
            Ok(ProcessOutput {
                exit_code,
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                timed_out: false,
            })
        }
        Ok(Err(source)) => Err(ExecError::Wait {
            program: spec.program.clone(),
            source,
        }),
        Err(_) => {
            warn!("command timed out, killing");
            Ok(ProcessOutput {
                exit_code: TIMEOUT_EXIT_CODE,
                stdout: String::new(),
                stderr: format!("timed out after {}ms", spec.timeout.as_millis()),
                timed_out: true,
            })
        }
    }
}
