//! Error mapping helpers
//!
//! Storage backends report failures as [`NoteKeeperError::StorageRead`] or
//! [`NoteKeeperError::StorageWrite`] regardless of the underlying cause, so the
//! repository can tell a failed load from a failed persist.

use crate::error::{NoteKeeperError, Result};
use std::path::Path;

/// Helper for creating IO errors with formatted context
pub fn io_error_with_context<P: AsRef<Path>>(
    error: std::io::Error,
    path: P,
    action: &str,
) -> NoteKeeperError {
    NoteKeeperError::Io(std::io::Error::new(
        error.kind(),
        format!("{action} '{}': {error}", path.as_ref().display()),
    ))
}

/// Extension trait mapping arbitrary errors onto the storage variants
pub trait StorageResultExt<T> {
    /// Map the error to [`NoteKeeperError::StorageRead`] with a message
    fn read_context(self, message: &str) -> Result<T>;

    /// Map the error to [`NoteKeeperError::StorageWrite`] with a message
    fn write_context(self, message: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> StorageResultExt<T> for std::result::Result<T, E> {
    fn read_context(self, message: &str) -> Result<T> {
        self.map_err(|e| NoteKeeperError::StorageRead(format!("{message}: {e}")))
    }

    fn write_context(self, message: &str) -> Result<T> {
        self.map_err(|e| NoteKeeperError::StorageWrite(format!("{message}: {e}")))
    }
}
