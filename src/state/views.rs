//! Per-view sub-states. Each one checks its own invariants.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::error::{ensure_not_blank, StateError};
use super::workflow::WorkflowRequest;

/// Oldest log lines are evicted beyond this.
pub const MAX_LOG_ENTRIES: usize = 500;

/// Which view the body of the screen shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Commands,
    Workflows,
    Logs,
    Help,
}

impl View {
    pub const ALL: [View; 4] = [View::Commands, View::Workflows, View::Logs, View::Help];

    pub fn title(self) -> &'static str {
        match self {
            View::Commands => "Commands",
            View::Workflows => "Workflows",
            View::Logs => "Logs",
            View::Help => "Help",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Commands => 0,
            View::Workflows => 1,
            View::Logs => 2,
            View::Help => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> View {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// What activating a command entry does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandAction {
    Agent {
        prompt: String,
    },
    Shell {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        timeout_ms: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub action: CommandAction,
}

impl CommandEntry {
    pub fn request(&self) -> WorkflowRequest {
        match &self.action {
            CommandAction::Agent { prompt } => WorkflowRequest::Agent {
                prompt: prompt.clone(),
            },
            CommandAction::Shell {
                program,
                args,
                timeout_ms,
            } => WorkflowRequest::Command {
                program: program.clone(),
                args: args.clone(),
                cwd: None,
                timeout_ms: *timeout_ms,
            },
        }
    }
}

/// The selectable command list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandListState {
    #[serde(default)]
    pub entries: Vec<CommandEntry>,
    #[serde(default)]
    pub selected_index: usize,
}

impl CommandListState {
    pub fn new(entries: Vec<CommandEntry>) -> Self {
        Self {
            entries,
            selected_index: 0,
        }
    }

    pub fn selected(&self) -> Option<&CommandEntry> {
        self.entries.get(self.selected_index)
    }

    /// Move down one entry, stopping at the last one.
    pub fn select_next(&mut self) -> bool {
        if self.selected_index + 1 >= self.entries.len() {
            return false;
        }
        self.selected_index += 1;
        true
    }

    /// Move up one entry, stopping at the first one.
    pub fn select_prev(&mut self) -> bool {
        if self.selected_index == 0 {
            return false;
        }
        self.selected_index -= 1;
        true
    }

    pub fn validate(&self) -> Result<(), StateError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            ensure_not_blank("command id", &entry.id)?;
            if !seen.insert(entry.id.as_str()) {
                return Err(StateError::DuplicateCommand {
                    id: entry.id.clone(),
                });
            }
        }
        let in_range = if self.entries.is_empty() {
            self.selected_index == 0
        } else {
            self.selected_index < self.entries.len()
        };
        if !in_range {
            return Err(StateError::SelectionOutOfRange {
                view: "commands",
                index: self.selected_index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }
}

/// Selection within the workflows view, by workflow id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowListState {
    #[serde(default)]
    pub selected: Option<String>,
}

impl WorkflowListState {
    pub fn validate(&self) -> Result<(), StateError> {
        if let Some(id) = &self.selected {
            ensure_not_blank("selected workflow", id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Bounded in-app log shown by the logs view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogViewState {
    #[serde(default)]
    pub entries: VecDeque<LogEntry>,
}

impl LogViewState {
    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        while self.entries.len() >= MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            level,
            message: message.into(),
        });
    }

    pub fn validate(&self) -> Result<(), StateError> {
        if self.entries.len() > MAX_LOG_ENTRIES {
            return Err(StateError::LogOverflow {
                len: self.entries.len(),
                max: MAX_LOG_ENTRIES,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> CommandEntry {
        CommandEntry {
            id: id.to_string(),
            label: id.to_uppercase(),
            description: String::new(),
            action: CommandAction::Agent {
                prompt: format!("run {id}"),
            },
        }
    }

    #[test]
    fn selection_clamps_at_both_ends() {
        let mut list = CommandListState::new(vec![entry("a"), entry("b")]);
        assert!(!list.select_prev());
        assert!(list.select_next());
        assert!(!list.select_next());
        assert_eq!(list.selected_index, 1);
        assert_eq!(list.selected().map(|e| e.id.as_str()), Some("b"));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut list = CommandListState::default();
        assert!(list.selected().is_none());
        assert!(!list.select_next());
        assert!(list.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicates_and_bad_index() {
        let list = CommandListState::new(vec![entry("a"), entry("a")]);
        assert!(matches!(
            list.validate(),
            Err(StateError::DuplicateCommand { .. })
        ));

        let mut list = CommandListState::new(vec![entry("a")]);
        list.selected_index = 4;
        assert!(matches!(
            list.validate(),
            Err(StateError::SelectionOutOfRange { index: 4, len: 1, .. })
        ));
    }

    #[test]
    fn log_view_evicts_oldest() {
        let mut logs = LogViewState::default();
        for i in 0..MAX_LOG_ENTRIES + 3 {
            logs.push(LogLevel::Info, format!("line {i}"));
        }
        assert_eq!(logs.entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs.entries.front().map(|e| e.message.as_str()), Some("line 3"));
        assert!(logs.validate().is_ok());
    }

    #[test]
    fn view_cycles_through_all() {
        let mut view = View::Commands;
        for _ in 0..View::ALL.len() {
            view = view.next();
        }
        assert_eq!(view, View::Commands);
        assert_eq!(View::from_index(2), Some(View::Logs));
        assert_eq!(View::from_index(9), None);
    }

    #[test]
    fn shell_entry_becomes_command_request() {
        let entry = CommandEntry {
            id: "status".to_string(),
            label: "Status".to_string(),
            description: String::new(),
            action: CommandAction::Shell {
                program: "git".to_string(),
                args: vec!["status".to_string()],
                timeout_ms: 5_000,
            },
        };
        assert_eq!(
            entry.request(),
            WorkflowRequest::Command {
                program: "git".to_string(),
                args: vec!["status".to_string()],
                cwd: None,
                timeout_ms: 5_000,
            }
        );
    }
}
