//! Message vocabulary.
//!
//! Every event that can reach the reducer is a `Msg`: user input converted by
//! the input adapter, timer ticks, results reported by the executor, workflow
//! lifecycle requests and system events. Messages carry only serializable
//! data; a tag that this build does not know deserializes to `Msg::Unknown`.

use serde::{Deserialize, Serialize};

use crate::mvi::Intent;
use crate::state::{AppState, LogLevel, View, WorkflowRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseKind {
    Click,
    ScrollUp,
    ScrollDown,
}

/// Coarse grouping attached to the driver's dispatch trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgCategory {
    Input,
    Timer,
    Process,
    File,
    Workflow,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    // -- user input ---------------------------------------------------------
    /// A key press, normalised to a lowercase name (`"j"`, `"enter"`, `"ctrl+c"`).
    KeyPressed { key: String },
    Mouse { kind: MouseKind, column: u16, row: u16 },
    Resized { cols: u16, rows: u16 },
    SwitchView { view: View },

    // -- timers -------------------------------------------------------------
    Tick { timer_id: String },

    // -- subprocess and agent results ---------------------------------------
    CommandCompleted {
        #[serde(default)]
        request_id: Option<String>,
        program: String,
        exit_code: i32,
        #[serde(default)]
        stdout: String,
        #[serde(default)]
        stderr: String,
        #[serde(default)]
        timed_out: bool,
    },
    StreamDelta { workflow_id: String, delta: String },
    AgentCompleted { workflow_id: String },

    // -- file results -------------------------------------------------------
    FileReadCompleted { path: String, contents: String },
    FileWritten { path: String },
    StateSaved { path: String },
    StateLoaded { state: Box<AppState> },
    EffectCompleted { description: String },

    // -- workflow lifecycle -------------------------------------------------
    WorkflowStartRequested {
        workflow_id: String,
        request: WorkflowRequest,
    },
    WorkflowStarted { workflow_id: String },
    WorkflowProgress { workflow_id: String, progress: f64 },
    WorkflowCompleted {
        workflow_id: String,
        success: bool,
        #[serde(default)]
        error: Option<String>,
    },
    WorkflowFailed { workflow_id: String, error: String },
    WorkflowCancelRequested { workflow_id: String },
    WorkflowCancelled { workflow_id: String },

    // -- system -------------------------------------------------------------
    /// Sent once by the driver before any input. A zero period disables
    /// the corresponding timer.
    AppStarted {
        #[serde(default)]
        spinner_ms: u64,
        #[serde(default)]
        autosave_ms: u64,
        #[serde(default)]
        restore_snapshot: bool,
    },
    Quit,
    Log { level: LogLevel, message: String },
    ErrorOccurred { message: String },
    DismissError,

    /// Any tag this build does not recognise.
    #[serde(other)]
    Unknown,
}

impl Intent for Msg {}

impl Msg {
    pub fn key(key: impl Into<String>) -> Self {
        Msg::KeyPressed { key: key.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Msg::ErrorOccurred {
            message: message.into(),
        }
    }

    /// Stable tag name, matching the serialized `type` field.
    pub fn tag(&self) -> &'static str {
        match self {
            Msg::KeyPressed { .. } => "key_pressed",
            Msg::Mouse { .. } => "mouse",
            Msg::Resized { .. } => "resized",
            Msg::SwitchView { .. } => "switch_view",
            Msg::Tick { .. } => "tick",
            Msg::CommandCompleted { .. } => "command_completed",
            Msg::StreamDelta { .. } => "stream_delta",
            Msg::AgentCompleted { .. } => "agent_completed",
            Msg::FileReadCompleted { .. } => "file_read_completed",
            Msg::FileWritten { .. } => "file_written",
            Msg::StateSaved { .. } => "state_saved",
            Msg::StateLoaded { .. } => "state_loaded",
            Msg::EffectCompleted { .. } => "effect_completed",
            Msg::WorkflowStartRequested { .. } => "workflow_start_requested",
            Msg::WorkflowStarted { .. } => "workflow_started",
            Msg::WorkflowProgress { .. } => "workflow_progress",
            Msg::WorkflowCompleted { .. } => "workflow_completed",
            Msg::WorkflowFailed { .. } => "workflow_failed",
            Msg::WorkflowCancelRequested { .. } => "workflow_cancel_requested",
            Msg::WorkflowCancelled { .. } => "workflow_cancelled",
            Msg::AppStarted { .. } => "app_started",
            Msg::Quit => "quit",
            Msg::Log { .. } => "log",
            Msg::ErrorOccurred { .. } => "error_occurred",
            Msg::DismissError => "dismiss_error",
            Msg::Unknown => "unknown",
        }
    }

    pub fn category(&self) -> MsgCategory {
        match self {
            Msg::KeyPressed { .. }
            | Msg::Mouse { .. }
            | Msg::Resized { .. }
            | Msg::SwitchView { .. } => MsgCategory::Input,
            Msg::Tick { .. } => MsgCategory::Timer,
            Msg::CommandCompleted { .. } | Msg::StreamDelta { .. } | Msg::AgentCompleted { .. } => {
                MsgCategory::Process
            }
            Msg::FileReadCompleted { .. }
            | Msg::FileWritten { .. }
            | Msg::StateSaved { .. }
            | Msg::StateLoaded { .. }
            | Msg::EffectCompleted { .. } => MsgCategory::File,
            Msg::WorkflowStartRequested { .. }
            | Msg::WorkflowStarted { .. }
            | Msg::WorkflowProgress { .. }
            | Msg::WorkflowCompleted { .. }
            | Msg::WorkflowFailed { .. }
            | Msg::WorkflowCancelRequested { .. }
            | Msg::WorkflowCancelled { .. } => MsgCategory::Workflow,
            Msg::AppStarted { .. }
            | Msg::Quit
            | Msg::Log { .. }
            | Msg::ErrorOccurred { .. }
            | Msg::DismissError
            | Msg::Unknown => MsgCategory::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tag_deserializes_to_unknown() {
        let msg: Msg = serde_json::from_str(r#"{"type":"telepathy"}"#).expect("decode");
        assert_eq!(msg, Msg::Unknown);
    }

    #[test]
    fn tag_matches_serialized_type() {
        let msgs = [
            Msg::key("j"),
            Msg::Quit,
            Msg::StreamDelta {
                workflow_id: "wf-1".to_string(),
                delta: "hi".to_string(),
            },
            Msg::WorkflowCancelled {
                workflow_id: "wf-1".to_string(),
            },
        ];
        for msg in msgs {
            let value = serde_json::to_value(&msg).expect("encode");
            assert_eq!(value["type"], msg.tag());
        }
    }

    #[test]
    fn categories() {
        assert_eq!(Msg::key("q").category(), MsgCategory::Input);
        assert_eq!(
            Msg::Tick {
                timer_id: "t".to_string()
            }
            .category(),
            MsgCategory::Timer
        );
        assert_eq!(Msg::Quit.category(), MsgCategory::System);
    }
}
