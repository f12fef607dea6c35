//! The application state tree.
//!
//! `AppState` is the single snapshot the driver loop owns. Everything in it is
//! plain data so that any reachable state can be written to JSON or YAML and
//! read back unchanged.

mod error;
pub mod persist;
mod views;
mod workflow;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mvi::ModelState;

pub use error::StateError;
pub use persist::{PersistError, StateFormat};
pub use views::{
    CommandAction, CommandEntry, CommandListState, LogEntry, LogLevel, LogViewState, View,
    WorkflowListState, MAX_LOG_ENTRIES,
};
pub use workflow::{WorkflowKind, WorkflowPayload, WorkflowRequest, WorkflowState, WorkflowStatus};

/// Current snapshot schema.
pub const SCHEMA_VERSION: &str = "1";

/// Last known pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub column: u16,
    pub row: u16,
}

/// UI state shared by all views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    #[serde(default)]
    pub scroll_offset: u16,
    #[serde(default)]
    pub cursor: Option<Cursor>,
    #[serde(default)]
    pub viewport: (u16, u16),
    /// Advanced by the spinner timer while workflows are in flight.
    #[serde(default)]
    pub spinner_frame: u64,
}

/// Root application snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub schema_version: String,
    pub running: bool,
    #[serde(default)]
    pub active_view: View,
    #[serde(default)]
    pub commands: CommandListState,
    #[serde(default)]
    pub workflows_view: WorkflowListState,
    #[serde(default)]
    pub logs: LogViewState,
    #[serde(default)]
    pub workflows: BTreeMap<String, WorkflowState>,
    #[serde(default)]
    pub ui: UiState,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub snapshot_path: Option<String>,
    #[serde(default)]
    pub next_workflow_seq: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            running: true,
            active_view: View::default(),
            commands: CommandListState::default(),
            workflows_view: WorkflowListState::default(),
            logs: LogViewState::default(),
            workflows: BTreeMap::new(),
            ui: UiState::default(),
            error_message: None,
            session_id: None,
            snapshot_path: None,
            next_workflow_seq: 0,
        }
    }
}

impl ModelState for AppState {}

impl AppState {
    pub fn new(commands: Vec<CommandEntry>) -> Self {
        Self {
            commands: CommandListState::new(commands),
            ..Self::default()
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_snapshot_path(mut self, path: impl Into<String>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn workflow(&self, id: &str) -> Option<&WorkflowState> {
        self.workflows.get(id)
    }

    /// True while any workflow is still pending or running.
    pub fn has_active_workflows(&self) -> bool {
        self.workflows.values().any(|wf| !wf.is_terminal())
    }

    /// The workflow highlighted in the workflows view, falling back to the first.
    pub fn selected_workflow(&self) -> Option<&WorkflowState> {
        self.workflows_view
            .selected
            .as_deref()
            .and_then(|id| self.workflows.get(id))
            .or_else(|| self.workflows.values().next())
    }

    pub fn push_log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(level, message);
    }

    /// Check every closed invariant, including nested views and workflows.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.schema_version.trim().is_empty() {
            return Err(StateError::EmptySchemaVersion);
        }
        if let Some(session_id) = &self.session_id {
            error::ensure_not_blank("session id", session_id)?;
        }
        if let Some(path) = &self.snapshot_path {
            error::ensure_not_blank("snapshot path", path)?;
        }
        self.commands.validate()?;
        self.workflows_view.validate()?;
        self.logs.validate()?;
        for (key, workflow) in &self.workflows {
            if key != &workflow.id {
                return Err(StateError::WorkflowKeyMismatch {
                    key: key.clone(),
                    id: workflow.id.clone(),
                });
            }
            workflow.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_running_and_valid() {
        let state = AppState::default();
        assert!(state.running);
        assert_eq!(state.schema_version, SCHEMA_VERSION);
        assert_eq!(state.active_view, View::Commands);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn blank_session_id_is_rejected() {
        let state = AppState::default().with_session("  ");
        assert!(matches!(
            state.validate(),
            Err(StateError::BlankIdentifier { .. })
        ));
    }

    #[test]
    fn empty_schema_version_is_rejected() {
        let state = AppState {
            schema_version: String::new(),
            ..AppState::default()
        };
        assert_eq!(state.validate(), Err(StateError::EmptySchemaVersion));
    }

    #[test]
    fn workflow_key_must_match_id() {
        let mut state = AppState::default();
        state.workflows.insert(
            "a".to_string(),
            WorkflowState::pending(
                "b",
                WorkflowRequest::Agent {
                    prompt: "p".to_string(),
                },
            ),
        );
        assert!(matches!(
            state.validate(),
            Err(StateError::WorkflowKeyMismatch { .. })
        ));
    }

    #[test]
    fn selected_workflow_falls_back_to_first() {
        let mut state = AppState::default();
        for id in ["wf-b", "wf-a"] {
            state.workflows.insert(
                id.to_string(),
                WorkflowState::pending(
                    id,
                    WorkflowRequest::Agent {
                        prompt: "p".to_string(),
                    },
                ),
            );
        }
        assert_eq!(state.selected_workflow().map(|wf| wf.id.as_str()), Some("wf-a"));
        state.workflows_view.selected = Some("wf-b".to_string());
        assert_eq!(state.selected_workflow().map(|wf| wf.id.as_str()), Some("wf-b"));
    }
}
