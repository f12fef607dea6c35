//! Snapshot encoding.
//!
//! Both formats are lossless for every valid state. Decoding validates the
//! snapshot before handing it out, so a loaded state always satisfies the
//! same invariants as one built by the reducer.

use std::path::Path;

use thiserror::Error;

use super::{AppState, StateError};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("JSON snapshot error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML snapshot error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("snapshot failed validation: {0}")]
    Invalid(#[from] StateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFormat {
    Json,
    Yaml,
}

impl StateFormat {
    /// `.yaml` and `.yml` select YAML, anything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                StateFormat::Yaml
            }
            _ => StateFormat::Json,
        }
    }
}

pub fn to_json(state: &AppState) -> Result<String, PersistError> {
    state.validate()?;
    Ok(serde_json::to_string_pretty(state)?)
}

pub fn from_json(text: &str) -> Result<AppState, PersistError> {
    let state: AppState = serde_json::from_str(text)?;
    state.validate()?;
    Ok(state)
}

pub fn to_yaml(state: &AppState) -> Result<String, PersistError> {
    state.validate()?;
    Ok(serde_yaml::to_string(state)?)
}

pub fn from_yaml(text: &str) -> Result<AppState, PersistError> {
    let state: AppState = serde_yaml::from_str(text)?;
    state.validate()?;
    Ok(state)
}

pub fn encode(state: &AppState, format: StateFormat) -> Result<String, PersistError> {
    match format {
        StateFormat::Json => to_json(state),
        StateFormat::Yaml => to_yaml(state),
    }
}

pub fn decode(text: &str, format: StateFormat) -> Result<AppState, PersistError> {
    match format {
        StateFormat::Json => from_json(text),
        StateFormat::Yaml => from_yaml(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            StateFormat::from_path(&PathBuf::from("state.yaml")),
            StateFormat::Yaml
        );
        assert_eq!(
            StateFormat::from_path(&PathBuf::from("state.YML")),
            StateFormat::Yaml
        );
        assert_eq!(
            StateFormat::from_path(&PathBuf::from("state.json")),
            StateFormat::Json
        );
        assert_eq!(
            StateFormat::from_path(&PathBuf::from("state")),
            StateFormat::Json
        );
    }

    #[test]
    fn decode_rejects_invalid_snapshot() {
        let text = r#"{"schema_version": "", "running": true}"#;
        assert!(matches!(
            from_json(text),
            Err(PersistError::Invalid(StateError::EmptySchemaVersion))
        ));
    }

    #[test]
    fn decode_rejects_malformed_text() {
        assert!(matches!(from_json("{not json"), Err(PersistError::Json(_))));
        assert!(matches!(
            from_yaml("running: [unterminated"),
            Err(PersistError::Yaml(_))
        ));
    }

    #[test]
    fn minimal_snapshot_fills_defaults() {
        let state = from_yaml("schema_version: \"1\"\nrunning: false\n").expect("decode");
        assert!(!state.running);
        assert!(state.workflows.is_empty());
        assert!(state.commands.entries.is_empty());
    }
}
