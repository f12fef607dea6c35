//! Effect vocabulary.
//!
//! The reducer returns these; only the executor performs them. Effects carry
//! data, never callbacks, so they can be logged, compared in tests and
//! serialized like messages.

use serde::{Deserialize, Serialize};

use crate::state::{AppState, WorkflowKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    WriteFile {
        path: String,
        contents: String,
    },
    ReadFile {
        path: String,
    },
    DeleteFile {
        path: String,
    },
    /// Run a program; its result comes back as `CommandCompleted`.
    RunCommand {
        #[serde(default)]
        request_id: Option<String>,
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        cwd: Option<String>,
        timeout_ms: u64,
    },
    /// Run a script through the configured shell.
    RunBashScript {
        #[serde(default)]
        request_id: Option<String>,
        script: String,
        #[serde(default)]
        cwd: Option<String>,
        timeout_ms: u64,
    },
    /// Start a background agent task for a workflow.
    SpawnAgent {
        workflow_id: String,
        kind: WorkflowKind,
        prompt: String,
    },
    CancelAgent {
        workflow_id: String,
    },
    CancelWorkflow {
        workflow_id: String,
    },
    /// Start (or restart) a repeating timer.
    StartTimer {
        timer_id: String,
        delay_ms: u64,
    },
    StopTimer {
        timer_id: String,
    },
    SaveState {
        path: String,
        state: Box<AppState>,
    },
    LoadState {
        path: String,
    },
    LogInfo {
        message: String,
    },
    LogError {
        message: String,
    },
    LogDebug {
        message: String,
    },
    Render,
    QuitApp,
    CopyToClipboard {
        text: String,
    },
    /// Sub-effects run strictly in order.
    Batch {
        effects: Vec<Effect>,
    },
    /// Any tag this build does not recognise.
    #[serde(other)]
    Unknown,
}

impl Effect {
    pub fn log_info(message: impl Into<String>) -> Self {
        Effect::LogInfo {
            message: message.into(),
        }
    }

    pub fn log_error(message: impl Into<String>) -> Self {
        Effect::LogError {
            message: message.into(),
        }
    }

    pub fn log_debug(message: impl Into<String>) -> Self {
        Effect::LogDebug {
            message: message.into(),
        }
    }

    /// Stable tag name, matching the serialized `type` field.
    pub fn tag(&self) -> &'static str {
        match self {
            Effect::WriteFile { .. } => "write_file",
            Effect::ReadFile { .. } => "read_file",
            Effect::DeleteFile { .. } => "delete_file",
            Effect::RunCommand { .. } => "run_command",
            Effect::RunBashScript { .. } => "run_bash_script",
            Effect::SpawnAgent { .. } => "spawn_agent",
            Effect::CancelAgent { .. } => "cancel_agent",
            Effect::CancelWorkflow { .. } => "cancel_workflow",
            Effect::StartTimer { .. } => "start_timer",
            Effect::StopTimer { .. } => "stop_timer",
            Effect::SaveState { .. } => "save_state",
            Effect::LoadState { .. } => "load_state",
            Effect::LogInfo { .. } => "log_info",
            Effect::LogError { .. } => "log_error",
            Effect::LogDebug { .. } => "log_debug",
            Effect::Render => "render",
            Effect::QuitApp => "quit_app",
            Effect::CopyToClipboard { .. } => "copy_to_clipboard",
            Effect::Batch { .. } => "batch",
            Effect::Unknown => "unknown",
        }
    }
}
