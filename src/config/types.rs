use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::executor::AgentBackend;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub executor: ExecutorSection,
    #[serde(default)]
    pub agent: AgentBackend,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Entries of the command list, in display order.
    #[serde(default = "default_commands")]
    pub commands: Vec<CommandConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Spinner timer period in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// Autosave period in milliseconds; 0 disables autosave.
    #[serde(default)]
    pub autosave_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorSection {
    /// Timeout for shell commands that do not set their own.
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    /// Interpreter for scripts (`<shell> -c <script>`).
    #[serde(default = "default_shell")]
    pub shell: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// `.yaml`/`.yml` snapshots are written as YAML, anything else as JSON.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
    #[serde(default)]
    pub restore_on_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file; defaults to the platform cache directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// One command list entry. Exactly one of `prompt` (agent) or `program`
/// (shell) must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandConfig {
    pub id: String,
    /// Display name; the id is shown when empty.
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_tick_rate_ms() -> u64 {
    120
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_shell() -> String {
    "bash".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn shell_command(id: &str, label: &str, description: &str, program: &str, args: &[&str]) -> CommandConfig {
    CommandConfig {
        id: id.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        prompt: None,
        program: Some(program.to_string()),
        args: args.iter().map(|a| a.to_string()).collect(),
        timeout_ms: None,
    }
}

fn default_commands() -> Vec<CommandConfig> {
    vec![
        CommandConfig {
            id: "review".to_string(),
            label: "Review changes".to_string(),
            description: "Ask the agent to review the working tree diff".to_string(),
            prompt: Some("Review the uncommitted changes in this repository.".to_string()),
            program: None,
            args: Vec::new(),
            timeout_ms: None,
        },
        shell_command(
            "status",
            "Git status",
            "Short working tree status",
            "git",
            &["status", "--short"],
        ),
        shell_command(
            "log",
            "Recent commits",
            "Last 20 commits, one line each",
            "git",
            &["log", "--oneline", "-n", "20"],
        ),
    ]
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            autosave_ms: 0,
        }
    }
}

impl Default for ExecutorSection {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_timeout_ms(),
            shell: default_shell(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ui: UiConfig::default(),
            executor: ExecutorSection::default(),
            agent: AgentBackend::default(),
            persistence: PersistenceConfig::default(),
            logging: LoggingConfig::default(),
            commands: default_commands(),
        }
    }
}
