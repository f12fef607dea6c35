//! Shared fixtures for integration tests.

#![allow(dead_code, unused_imports)]

use std::io;
use std::time::Duration;

use devloop::executor::{channel, AgentBackend, Executor, ExecutorConfig, MsgReceiver};
use devloop::msg::Msg;
use devloop::runtime::Frontend;
use devloop::state::{AppState, CommandAction, CommandEntry};

/// Three commands: an agent prompt, a passing shell command and a failing one.
pub fn sample_commands() -> Vec<CommandEntry> {
    vec![
        CommandEntry {
            id: "ask".to_string(),
            label: "Ask".to_string(),
            description: "echo the prompt back".to_string(),
            action: CommandAction::Agent {
                prompt: "hello from the agent".to_string(),
            },
        },
        CommandEntry {
            id: "ok".to_string(),
            label: "Succeeds".to_string(),
            description: String::new(),
            action: CommandAction::Shell {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), "echo done".to_string()],
                timeout_ms: 5_000,
            },
        },
        CommandEntry {
            id: "fail".to_string(),
            label: "Fails".to_string(),
            description: String::new(),
            action: CommandAction::Shell {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), "exit 3".to_string()],
                timeout_ms: 5_000,
            },
        },
    ]
}

pub fn sample_state() -> AppState {
    AppState::new(sample_commands()).with_session("test-session")
}

/// Echo agent with a short delay, `sh` for scripts.
pub fn test_config() -> ExecutorConfig {
    ExecutorConfig {
        agent: AgentBackend::echo(5),
        shell: "sh".to_string(),
    }
}

pub fn test_executor() -> (Executor, MsgReceiver) {
    let (tx, rx) = channel();
    (Executor::new(tx, test_config()), rx)
}

/// Receive until `done` matches a message or `timeout` passes. Returns
/// everything received, including the matching message.
pub async fn collect_until<F>(rx: &mut MsgReceiver, timeout: Duration, mut done: F) -> Vec<Msg>
where
    F: FnMut(&Msg) -> bool,
{
    let mut received = Vec::new();
    let _ = tokio::time::timeout(timeout, async {
        while let Some(msg) = rx.recv().await {
            let finished = done(&msg);
            received.push(msg);
            if finished {
                break;
            }
        }
    })
    .await;
    received
}

/// Receive whatever arrives within `window`.
pub async fn collect_for(rx: &mut MsgReceiver, window: Duration) -> Vec<Msg> {
    collect_until(rx, window, |_| false).await
}

/// Counts renders and remembers the last state drawn.
#[derive(Default)]
pub struct RecordingFrontend {
    pub renders: usize,
    pub last: Option<AppState>,
}

impl Frontend for RecordingFrontend {
    fn render(&mut self, state: &AppState) -> io::Result<()> {
        self.renders += 1;
        self.last = Some(state.clone());
        Ok(())
    }
}

/// Fails every render.
pub struct BrokenFrontend;

impl Frontend for BrokenFrontend {
    fn render(&mut self, _state: &AppState) -> io::Result<()> {
        Err(io::Error::other("terminal went away"))
    }
}
