//! Key-value persistence for the note snapshot
//!
//! The repository sees durable storage only through [`NoteStore`]: `get` returns
//! the last value written under a key (or nothing) and `set` replaces it whole.
//! The collection lives under a single key, [`NOTES_KEY`] by default.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod filesystem;
pub mod mock_storage;

pub use filesystem::FileSystemNoteStore;
pub use mock_storage::{MockNoteStore, MockStoreConfig};

/// Key the note collection is stored under
pub const NOTES_KEY: &str = "Notes";

/// Trait for the durable key-value store
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was ever written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl<T: NoteStore + ?Sized> NoteStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}

#[async_trait]
impl<T: NoteStore + ?Sized> NoteStore for Box<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}
