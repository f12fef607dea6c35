use thiserror::Error;

/// Closed invariants of the state tree, checked before a snapshot is
/// accepted from disk and before one is written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("schema version must not be empty")]
    EmptySchemaVersion,

    #[error("{field} must not be blank")]
    BlankIdentifier { field: String },

    #[error("{view} selection {index} is out of range for {len} entries")]
    SelectionOutOfRange {
        view: &'static str,
        index: usize,
        len: usize,
    },

    #[error("duplicate command id '{id}'")]
    DuplicateCommand { id: String },

    #[error("log view holds {len} entries, limit is {max}")]
    LogOverflow { len: usize, max: usize },

    #[error("workflow stored under '{key}' has id '{id}'")]
    WorkflowKeyMismatch { key: String, id: String },

    #[error("workflow '{id}' failed without an error message")]
    FailedWithoutError { id: String },

    #[error("workflow '{id}' is completed but progress is {progress}")]
    CompletedWithoutFullProgress { id: String, progress: f64 },

    #[error("workflow '{id}' progress {progress} is outside [0, 1]")]
    ProgressOutOfRange { id: String, progress: f64 },
}

/// Reject empty or whitespace-only identifiers.
pub(crate) fn ensure_not_blank(field: &str, value: &str) -> Result<(), StateError> {
    if value.trim().is_empty() {
        return Err(StateError::BlankIdentifier {
            field: field.to_string(),
        });
    }
    Ok(())
}
