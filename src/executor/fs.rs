//! File effects and state snapshots.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::state::{persist, AppState, StateFormat};

use super::error::ExecError;

fn io_error(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> ExecError {
    let path = path.display().to_string();
    move |source| ExecError::Io {
        action,
        path,
        source,
    }
}

pub async fn read_file(path: &str) -> Result<String, ExecError> {
    let path = Path::new(path);
    tokio::fs::read_to_string(path)
        .await
        .map_err(io_error("read", path))
}

/// Write `contents`, creating missing parent directories.
pub async fn write_file(path: &str, contents: &str) -> Result<(), ExecError> {
    let path = Path::new(path);
    ensure_parent(path).await?;
    tokio::fs::write(path, contents)
        .await
        .map_err(io_error("write", path))
}

pub async fn delete_file(path: &str) -> Result<(), ExecError> {
    let path = Path::new(path);
    tokio::fs::remove_file(path)
        .await
        .map_err(io_error("delete", path))
}

/// Snapshot `state` to `path`. The encoding follows the extension and the
/// file is replaced atomically through a sibling temp file.
pub async fn save_state(path: &str, state: &AppState) -> Result<(), ExecError> {
    let target = Path::new(path);
    let text = persist::encode(state, StateFormat::from_path(target)).map_err(|source| {
        ExecError::Persist {
            path: path.to_string(),
            source,
        }
    })?;

    ensure_parent(target).await?;
    let tmp = temp_sibling(target);
    tokio::fs::write(&tmp, text)
        .await
        .map_err(io_error("write", &tmp))?;
    if let Err(err) = tokio::fs::rename(&tmp, target).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_error("replace", target)(err));
    }
    debug!(path, "state snapshot written");
    Ok(())
}

pub async fn load_state(path: &str) -> Result<AppState, ExecError> {
    let target = Path::new(path);
    let text = tokio::fs::read_to_string(target)
        .await
        .map_err(io_error("read", target))?;
    persist::decode(&text, StateFormat::from_path(target)).map_err(|source| ExecError::Persist {
        path: path.to_string(),
        source,
    })
}

async fn ensure_parent(path: &Path) -> Result<(), ExecError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .map_err(io_error("create directory", parent)),
        _ => Ok(()),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/deeper/out.txt");
        let path = path.to_string_lossy().into_owned();

        write_file(&path, "hello").await.expect("write");
        assert_eq!(read_file(&path).await.expect("read"), "hello");
        delete_file(&path).await.expect("delete");
        assert!(read_file(&path).await.is_err());
    }

    #[tokio::test]
    async fn missing_file_error_names_the_path() {
        let err = read_file("/definitely/not/here.txt")
            .await
            .expect_err("missing file");
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        let path_str = path.to_string_lossy().into_owned();

        save_state(&path_str, &AppState::default().with_session("s-1"))
            .await
            .expect("save");
        assert!(path.exists());
        assert!(!dir.path().join("state.json.tmp").exists());

        let loaded = load_state(&path_str).await.expect("load");
        assert_eq!(loaded.session_id.as_deref(), Some("s-1"));
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_persist_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.yaml");
        std::fs::write(&path, "running: [not a bool").expect("write");

        let err = load_state(&path.to_string_lossy())
            .await
            .expect_err("corrupt snapshot");
        assert!(matches!(err, ExecError::Persist { .. }));
    }
}
