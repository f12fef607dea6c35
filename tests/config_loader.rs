use devloop::config::{Config, ConfigError};
use devloop::executor::AgentBackend;
use devloop::state::CommandAction;

/// Config::config_path() ends in the application's directory.
#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("devloop/config.toml"));
}

#[test]
fn test_config_default_values() {
    let config = Config::default();
    assert_eq!(config.ui.tick_rate_ms, 120);
    assert_eq!(config.ui.autosave_ms, 0);
    assert_eq!(config.executor.default_timeout_ms, 30_000);
    assert_eq!(config.executor.shell, "bash");
    assert_eq!(config.logging.level, "info");
    assert!(config.persistence.snapshot_path.is_none());
    assert!(matches!(config.agent, AgentBackend::Command { .. }));
    assert!(config.log_file().ends_with("devloop/devloop.log"));
}

/// Shell commands without a timeout inherit the executor default.
#[test]
fn test_commands_inherit_default_timeout() {
    let config = Config::default();
    let status = config
        .command_entries()
        .into_iter()
        .find(|entry| entry.id == "status")
        .expect("status command");
    assert!(matches!(
        status.action,
        CommandAction::Shell { timeout_ms: 30_000, .. }
    ));
}

#[test]
fn test_zero_tick_rate_fails_validation() {
    let mut config = Config::default();
    config.ui.tick_rate_ms = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn test_unreadable_config_is_read_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    // A directory cannot be read as a file.
    let result = Config::load(Some(dir.path()));
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}

#[test]
fn test_invalid_values_in_file_fail_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[[commands]]\nid = \"a\"\nprompt = \"x\"\n\n[[commands]]\nid = \"a\"\nprogram = \"ls\"\n",
    )
    .expect("write");
    assert!(matches!(
        Config::load(Some(&path)),
        Err(ConfigError::ValidationError { .. })
    ));
}
