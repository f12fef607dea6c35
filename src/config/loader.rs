use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::{CommandConfig, Config};
use crate::executor::{AgentBackend, ExecutorConfig};
use crate::state::{CommandAction, CommandEntry};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        message: message.into(),
    }
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// `~/.config/devloop/config.toml` on Linux, the platform equivalent
    /// elsewhere via `dirs::config_dir()`, or the current directory.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("devloop").join("config.toml")
    }

    /// Loads configuration from `path`, or the default location.
    ///
    /// A missing file yields `Config::default()`. An existing file is parsed
    /// as TOML and validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Periods and timeouts are positive
    /// - Command ids are non-blank and unique
    /// - Each command is either an agent prompt or a shell program
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ui.tick_rate_ms == 0 {
            return Err(invalid("ui.tick_rate_ms must be greater than zero"));
        }
        if self.executor.default_timeout_ms == 0 {
            return Err(invalid("executor.default_timeout_ms must be greater than zero"));
        }
        if self.executor.shell.trim().is_empty() {
            return Err(invalid("executor.shell must not be empty"));
        }
        if let AgentBackend::Command {
            program,
            timeout_ms,
            ..
        } = &self.agent
        {
            if program.trim().is_empty() {
                return Err(invalid("agent.program must not be empty"));
            }
            if *timeout_ms == 0 {
                return Err(invalid("agent.timeout_ms must be greater than zero"));
            }
        }

        let mut seen = HashSet::new();
        for command in &self.commands {
            if command.id.trim().is_empty() {
                return Err(invalid("command ids must not be blank"));
            }
            if !seen.insert(command.id.as_str()) {
                return Err(invalid(format!("duplicate command id '{}'", command.id)));
            }
            match (&command.prompt, &command.program) {
                (Some(_), None) | (None, Some(_)) => {}
                _ => {
                    return Err(invalid(format!(
                        "command '{}' needs exactly one of 'prompt' or 'program'",
                        command.id
                    )))
                }
            }
            if command.timeout_ms == Some(0) {
                return Err(invalid(format!(
                    "command '{}' has a zero timeout",
                    command.id
                )));
            }
        }

        Ok(())
    }

    /// The command list shown in the commands view.
    pub fn command_entries(&self) -> Vec<CommandEntry> {
        self.commands
            .iter()
            .map(|command| command.to_entry(self.executor.default_timeout_ms))
            .collect()
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            agent: self.agent.clone(),
            shell: self.executor.shell.clone(),
        }
    }

    /// Where logs go: the configured file, or `devloop.log` in the platform
    /// cache directory.
    pub fn log_file(&self) -> PathBuf {
        self.logging.file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("devloop")
                .join("devloop.log")
        })
    }
}

impl CommandConfig {
    fn to_entry(&self, default_timeout_ms: u64) -> CommandEntry {
        let action = match (&self.prompt, &self.program) {
            (Some(prompt), _) => CommandAction::Agent {
                prompt: prompt.clone(),
            },
            (None, program) => CommandAction::Shell {
                program: program.clone().unwrap_or_default(),
                args: self.args.clone(),
                timeout_ms: self.timeout_ms.unwrap_or(default_timeout_ms),
            },
        };
        let label = if self.label.trim().is_empty() {
            self.id.clone()
        } else {
            self.label.clone()
        };
        CommandEntry {
            id: self.id.clone(),
            label,
            description: self.description.clone(),
            action,
        }
    }
}
