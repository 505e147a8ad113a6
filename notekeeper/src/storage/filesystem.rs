//! Filesystem storage backend
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a temporary sibling file
//! that is then renamed over the target, so a reader sees either the previous
//! snapshot or the new one.

use crate::common::{io_error_with_context, StorageResultExt};
use crate::config::NoteKeeperConfig;
use crate::error::{NoteKeeperError, Result};
use crate::storage::NoteStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory used by [`FileSystemNoteStore::new_default`]
pub const DEFAULT_STORAGE_DIR: &str = ".notekeeper";

/// Filesystem-based key-value store
#[derive(Debug, Clone)]
pub struct FileSystemNoteStore {
    root: PathBuf,
}

impl FileSystemNoteStore {
    /// Create a store rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store under `.notekeeper` in the current directory
    pub fn new_default() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| io_error_with_context(e, ".", "Failed to resolve current directory"))?;
        Ok(Self::new(cwd.join(DEFAULT_STORAGE_DIR)))
    }

    /// Create a store at the configured storage directory
    pub fn from_config(config: &NoteKeeperConfig) -> Self {
        Self::new(config.storage_dir.clone())
    }

    /// Directory holding the key files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(NoteKeeperError::Config(
            "storage key must not be empty".to_string(),
        ));
    }
    if key.contains(['/', '\\']) || key.contains("..") {
        return Err(NoteKeeperError::Config(format!(
            "storage key '{key}' must not contain path separators"
        )));
    }
    Ok(())
}

#[async_trait]
impl NoteStore for FileSystemNoteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !tokio::fs::try_exists(&path)
            .await
            .read_context(&format!("Failed to stat '{}'", path.display()))?
        {
            debug!("No snapshot at {}", path.display());
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .read_context(&format!("Failed to read '{}'", path.display()))?;
        debug!("Read {} bytes from {}", content.len(), path.display());
        Ok(Some(content))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .write_context(&format!("Failed to create '{}'", self.root.display()))?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, value)
            .await
            .write_context(&format!("Failed to write temp file '{}'", temp_path.display()))?;

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(NoteKeeperError::StorageWrite(format!(
                "Failed to rename '{}' to '{}': {e}",
                temp_path.display(),
                path.display()
            )));
        }

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
