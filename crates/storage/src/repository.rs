use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Fixed keys for the persisted documents.
///
/// The whole learning state is one JSON blob under [`keys::PROGRESS`]; the
/// anonymous user id lives under its own key so a reset can rewrite the
/// document without losing the identity.
pub mod keys {
    pub const PROGRESS: &str = "course.progress";
    pub const USER_ID: &str = "course.user_id";
}

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-value document port for the progress state.
///
/// Adapters only move opaque strings; interpreting the JSON (and deciding
/// what to do when it does not parse) is the service layer's job. Writes are
/// read-modify-write with last-write-wins semantics; there is no cross-
/// process merge.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Deleting a missing key is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and for hosts without durable storage.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Degradation stub for environments where storage is unavailable.
///
/// Reads find nothing and writes are discarded, so every operation silently
/// works against default state instead of failing.
#[derive(Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl ProgressStore for NoopStore {
    async fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Aggregates the document port behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub documents: Arc<dyn ProgressStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            documents: Arc::new(MemoryStore::new()),
        }
    }

    #[must_use]
    pub fn noop() -> Self {
        Self {
            documents: Arc::new(NoopStore),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert!(store.read(keys::PROGRESS).await.unwrap().is_none());

        store.write(keys::PROGRESS, "{}").await.unwrap();
        assert_eq!(
            store.read(keys::PROGRESS).await.unwrap().as_deref(),
            Some("{}")
        );

        store.write(keys::PROGRESS, "{\"a\":1}").await.unwrap();
        assert_eq!(
            store.read(keys::PROGRESS).await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.remove(keys::PROGRESS).await.unwrap();
        assert!(store.read(keys::PROGRESS).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn memory_store_keys_are_independent() {
        let store = MemoryStore::new();
        store.write(keys::USER_ID, "user-1").await.unwrap();
        store.write(keys::PROGRESS, "{}").await.unwrap();

        store.remove(keys::PROGRESS).await.unwrap();
        assert_eq!(
            store.read(keys::USER_ID).await.unwrap().as_deref(),
            Some("user-1")
        );
    }

    #[tokio::test]
    async fn noop_store_discards_writes() {
        let store = NoopStore;
        store.write(keys::PROGRESS, "{}").await.unwrap();
        assert!(store.read(keys::PROGRESS).await.unwrap().is_none());
        store.remove(keys::PROGRESS).await.unwrap();
    }
}
