//! Long-running workflows tracked by id.
//!
//! A workflow starts `Pending`, may move to `Running`, and ends in exactly one
//! terminal status. Terminal workflows never change again, so late messages
//! from a cancelled or finished task are harmless.

use serde::{Deserialize, Serialize};

use super::error::{ensure_not_blank, StateError};

/// Lifecycle status of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl WorkflowStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Workflow type tag, derived from the payload variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    Agent,
    Command,
}

impl WorkflowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Command => "command",
        }
    }
}

/// What a caller asks for when starting a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkflowRequest {
    /// Run the configured agent with a prompt.
    Agent { prompt: String },
    /// Run a program to completion.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        cwd: Option<String>,
        timeout_ms: u64,
    },
}

impl WorkflowRequest {
    pub fn kind(&self) -> WorkflowKind {
        match self {
            Self::Agent { .. } => WorkflowKind::Agent,
            Self::Command { .. } => WorkflowKind::Command,
        }
    }

    pub fn into_payload(self) -> WorkflowPayload {
        match self {
            Self::Agent { prompt } => WorkflowPayload::Agent {
                prompt,
                output: String::new(),
            },
            Self::Command {
                program,
                args,
                cwd,
                timeout_ms,
            } => WorkflowPayload::Command {
                program,
                args,
                cwd,
                timeout_ms,
                output: String::new(),
                exit_code: None,
            },
        }
    }
}

/// Kind-specific workflow data, including the accumulated output buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkflowPayload {
    Agent {
        prompt: String,
        #[serde(default)]
        output: String,
    },
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        cwd: Option<String>,
        timeout_ms: u64,
        #[serde(default)]
        output: String,
        #[serde(default)]
        exit_code: Option<i32>,
    },
}

/// One tracked workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub id: String,
    pub status: WorkflowStatus,
    pub payload: WorkflowPayload,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub progress: f64,
}

impl WorkflowState {
    /// A freshly requested workflow.
    pub fn pending(id: impl Into<String>, request: WorkflowRequest) -> Self {
        Self {
            id: id.into(),
            status: WorkflowStatus::Pending,
            payload: request.into_payload(),
            error: None,
            progress: 0.0,
        }
    }

    pub fn kind(&self) -> WorkflowKind {
        match self.payload {
            WorkflowPayload::Agent { .. } => WorkflowKind::Agent,
            WorkflowPayload::Command { .. } => WorkflowKind::Command,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn output(&self) -> &str {
        match &self.payload {
            WorkflowPayload::Agent { output, .. } | WorkflowPayload::Command { output, .. } => {
                output
            }
        }
    }

    /// Append streamed output. Status is left untouched.
    pub fn append_output(&mut self, delta: &str) {
        match &mut self.payload {
            WorkflowPayload::Agent { output, .. } | WorkflowPayload::Command { output, .. } => {
                output.push_str(delta)
            }
        }
    }

    /// Store the captured result of a command workflow.
    pub fn record_command_result(&mut self, stdout: &str, stderr: &str, code: i32) {
        if let WorkflowPayload::Command {
            output, exit_code, ..
        } = &mut self.payload
        {
            output.push_str(stdout);
            if !stderr.is_empty() {
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                output.push_str(stderr);
            }
            *exit_code = Some(code);
        }
    }

    /// Pending → Running. Returns whether the status changed.
    pub fn mark_running(&mut self) -> bool {
        if self.status != WorkflowStatus::Pending {
            return false;
        }
        self.status = WorkflowStatus::Running;
        true
    }

    /// Update progress, clamped to `[0, 1]`. Ignored once terminal.
    pub fn set_progress(&mut self, progress: f64) -> bool {
        if self.is_terminal() || !progress.is_finite() {
            return false;
        }
        let clamped = progress.clamp(0.0, 1.0);
        if clamped == self.progress {
            return false;
        }
        self.progress = clamped;
        true
    }

    pub fn complete(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = WorkflowStatus::Completed;
        self.progress = 1.0;
        self.error = None;
        true
    }

    /// Blank errors are replaced so that a failed workflow always explains itself.
    pub fn fail(&mut self, error: &str) -> bool {
        if self.is_terminal() {
            return false;
        }
        let error = if error.trim().is_empty() {
            "workflow reported failure"
        } else {
            error
        };
        self.status = WorkflowStatus::Failed;
        self.error = Some(error.to_string());
        true
    }

    pub fn cancel(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = WorkflowStatus::Cancelled;
        true
    }

    pub fn validate(&self) -> Result<(), StateError> {
        ensure_not_blank("workflow id", &self.id)?;
        if !(0.0..=1.0).contains(&self.progress) {
            return Err(StateError::ProgressOutOfRange {
                id: self.id.clone(),
                progress: self.progress,
            });
        }
        match self.status {
            WorkflowStatus::Completed if self.progress != 1.0 => {
                Err(StateError::CompletedWithoutFullProgress {
                    id: self.id.clone(),
                    progress: self.progress,
                })
            }
            WorkflowStatus::Failed
                if self.error.as_deref().map_or(true, |e| e.trim().is_empty()) =>
            {
                Err(StateError::FailedWithoutError {
                    id: self.id.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}
