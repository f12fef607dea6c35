//! Agent backends behind `SpawnAgent`.
//!
//! Every agent task sends `WorkflowStarted`, then any number of
//! `StreamDelta`/`WorkflowProgress` messages, then exactly one of
//! `AgentCompleted` or `WorkflowFailed`. A cancelled task sends nothing
//! further; the executor reports the cancellation itself.

use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::msg::Msg;

use super::error::ExecError;
use super::MsgSender;

fn default_agent_program() -> String {
    "claude".to_string()
}

fn default_agent_args() -> Vec<String> {
    vec!["-p".to_string()]
}

fn default_agent_timeout_ms() -> u64 {
    600_000
}

fn default_chunk_delay_ms() -> u64 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum AgentBackend {
    /// External CLI; the prompt is appended as the last argument and each
    /// stdout line becomes a stream delta.
    Command {
        #[serde(default = "default_agent_program")]
        program: String,
        #[serde(default = "default_agent_args")]
        args: Vec<String>,
        #[serde(default = "default_agent_timeout_ms")]
        timeout_ms: u64,
    },
    /// Streams the prompt back word by word. Needs no external tools.
    Echo {
        #[serde(default = "default_chunk_delay_ms")]
        chunk_delay_ms: u64,
    },
}

impl Default for AgentBackend {
    fn default() -> Self {
        AgentBackend::Command {
            program: default_agent_program(),
            args: default_agent_args(),
            timeout_ms: default_agent_timeout_ms(),
        }
    }
}

impl AgentBackend {
    pub fn echo(chunk_delay_ms: u64) -> Self {
        AgentBackend::Echo { chunk_delay_ms }
    }
}

fn send(tx: &MsgSender, msg: Msg) {
    if tx.send(msg).is_err() {
        tracing::trace!("agent: message dropped (receiver gone)");
    }
}

/// Body of a spawned agent task.
pub(crate) async fn run(
    backend: AgentBackend,
    workflow_id: String,
    prompt: String,
    cancel: CancellationToken,
    tx: MsgSender,
) {
    send(
        &tx,
        Msg::WorkflowStarted {
            workflow_id: workflow_id.clone(),
        },
    );

    let work = async {
        match &backend {
            AgentBackend::Command {
                program,
                args,
                timeout_ms,
            } => run_cli(program, args, *timeout_ms, &workflow_id, &prompt, &tx).await,
            AgentBackend::Echo { chunk_delay_ms } => {
                run_echo(*chunk_delay_ms, &workflow_id, &prompt, &tx).await;
                Ok(())
            }
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(workflow_id = %workflow_id, "agent task cancelled");
        }
        result = work => {
            let msg = match result {
                Ok(()) => Msg::AgentCompleted { workflow_id },
                Err(err) => {
                    warn!(workflow_id = %workflow_id, "agent failed: {err}");
                    Msg::WorkflowFailed { workflow_id, error: err.to_string() }
                }
            };
            send(&tx, msg);
        }
    }
}

async fn run_cli(
    program: &str,
    args: &[String],
    timeout_ms: u64,
    workflow_id: &str,
    prompt: &str,
    tx: &MsgSender,
) -> Result<(), ExecError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .arg(prompt)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let spawn_error = |source| ExecError::Spawn {
        program: program.to_string(),
        source,
    };
    let wait_error = |source| ExecError::Wait {
        program: program.to_string(),
        source,
    };

    let mut child = command.spawn().map_err(spawn_error)?;
    let (Some(stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(wait_error(std::io::Error::other("child pipes unavailable")));
    };

    let mut stderr_text = String::new();
    let streamed = async {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            send(
                tx,
                Msg::StreamDelta {
                    workflow_id: workflow_id.to_string(),
                    delta: format!("{line}\n"),
                },
            );
        }
        Ok::<_, std::io::Error>(())
    };
    let collected = stderr.read_to_string(&mut stderr_text);
    let finished = async {
        let (streamed, collected) = tokio::join!(streamed, collected);
        streamed?;
        collected?;
        child.wait().await
    };

    // On timeout the child is dropped on return, which kills it.
    let status = tokio::time::timeout(Duration::from_millis(timeout_ms), finished)
        .await
        .map_err(|_| ExecError::Timeout {
            program: program.to_string(),
            timeout_ms,
        })?
        .map_err(wait_error)?;

    if status.success() {
        Ok(())
    } else {
        Err(ExecError::AgentExit {
            code: status.code().unwrap_or(-1),
            stderr: stderr_text.trim().to_string(),
        })
    }
}

async fn run_echo(chunk_delay_ms: u64, workflow_id: &str, prompt: &str, tx: &MsgSender) {
    let words: Vec<&str> = prompt.split_whitespace().collect();
    let total = words.len();
    for (i, word) in words.into_iter().enumerate() {
        if chunk_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(chunk_delay_ms)).await;
        }
        let delta = if i == 0 {
            word.to_string()
        } else {
            format!(" {word}")
        };
        send(
            tx,
            Msg::StreamDelta {
                workflow_id: workflow_id.to_string(),
                delta,
            },
        );
        send(
            tx,
            Msg::WorkflowProgress {
                workflow_id: workflow_id.to_string(),
                progress: (i + 1) as f64 / total as f64,
            },
        );
    }
}
