//! Mock in-memory storage implementation for testing
//!
//! `MockNoteStore` keeps values in a `HashMap` behind an `Arc`, so clones share
//! the same data. Dropping a repository and building a new one over a clone of
//! the same store is how tests simulate an application restart.
//!
//! # Usage
//!
//! ```rust
//! use notekeeper::storage::{MockNoteStore, MockStoreConfig, NoteStore, NOTES_KEY};
//!
//! # async fn example() -> notekeeper::Result<()> {
//! let store = MockNoteStore::new();
//! store.set(NOTES_KEY, "[]").await?;
//! assert_eq!(store.write_count(), 1);
//!
//! store.set_config(MockStoreConfig { fail_set: true, ..Default::default() }).await;
//! assert!(store.set(NOTES_KEY, "[]").await.is_err());
//! # Ok(())
//! # }
//! ```

use crate::error::{NoteKeeperError, Result};
use crate::storage::NoteStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock in-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct MockNoteStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    config: Arc<RwLock<MockStoreConfig>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

/// Switches for simulating store failures
#[derive(Debug, Clone, Default)]
pub struct MockStoreConfig {
    /// Fail every `get`
    pub fail_get: bool,

    /// Fail every `set`
    pub fail_set: bool,

    /// Sleep before each operation (in milliseconds)
    pub operation_delay_ms: Option<u64>,
}

impl MockNoteStore {
    /// Create an empty store with no simulated failures
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given failure configuration
    pub fn new_with_config(config: MockStoreConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            ..Self::default()
        }
    }

    /// Replace the failure configuration
    pub async fn set_config(&self, config: MockStoreConfig) {
        *self.config.write().await = config;
    }

    /// Stored value for `key`, bypassing counters and failure simulation
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    /// Seed a value for `key`, bypassing counters and failure simulation
    pub async fn insert_raw(&self, key: &str, value: impl Into<String>) {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.into());
    }

    /// Number of `get` calls, failed ones included
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `set` calls, failed ones included
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn simulate_delay(&self) {
        let delay = self.config.read().await.operation_delay_ms;
        if let Some(delay_ms) = delay {
            tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
        }
    }
}

#[async_trait]
impl NoteStore for MockNoteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.simulate_delay().await;

        if self.config.read().await.fail_get {
            return Err(NoteKeeperError::StorageRead(
                "Simulated get failure".to_string(),
            ));
        }

        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.simulate_delay().await;

        if self.config.read().await.fail_set {
            return Err(NoteKeeperError::StorageWrite(
                "Simulated set failure".to_string(),
            ));
        }

        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NOTES_KEY;

    #[tokio::test]
    async fn test_get_set() {
        let store = MockNoteStore::new();

        assert_eq!(store.get(NOTES_KEY).await.unwrap(), None);
        store.set(NOTES_KEY, "[]").await.unwrap();
        assert_eq!(store.get(NOTES_KEY).await.unwrap().as_deref(), Some("[]"));

        assert_eq!(store.read_count(), 2);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MockNoteStore::new();
        let other = store.clone();

        store.set(NOTES_KEY, "shared").await.unwrap();
        assert_eq!(other.raw(NOTES_KEY).await.as_deref(), Some("shared"));
        assert_eq!(other.write_count(), 1);
    }

    #[tokio::test]
    async fn test_simulated_failures() {
        let store = MockNoteStore::new_with_config(MockStoreConfig {
            fail_get: true,
            fail_set: true,
            operation_delay_ms: None,
        });

        assert!(matches!(
            store.get(NOTES_KEY).await,
            Err(NoteKeeperError::StorageRead(_))
        ));
        assert!(matches!(
            store.set(NOTES_KEY, "x").await,
            Err(NoteKeeperError::StorageWrite(_))
        ));
        assert_eq!(store.raw(NOTES_KEY).await, None);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_config_can_change_mid_test() {
        let store = MockNoteStore::new();
        store.set(NOTES_KEY, "before").await.unwrap();

        store
            .set_config(MockStoreConfig {
                fail_set: true,
                ..Default::default()
            })
            .await;

        assert!(store.set(NOTES_KEY, "after").await.is_err());
        assert_eq!(store.raw(NOTES_KEY).await.as_deref(), Some("before"));
    }

    #[tokio::test]
    async fn test_operation_delay() {
        let store = MockNoteStore::new_with_config(MockStoreConfig {
            operation_delay_ms: Some(10),
            ..Default::default()
        });

        let start = std::time::Instant::now();
        store.get(NOTES_KEY).await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(10));
    }
}
