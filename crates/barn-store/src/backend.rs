// ABOUTME: The flat key-value storage contract the log engine persists through.
// ABOUTME: Includes an in-memory backend and blanket impls so one backend can be shared by many stores.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// Errors surfaced by a storage backend. The engine never retries these.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid namespace {0:?}: must be non-empty and must not contain ':'")]
    InvalidNamespace(String),

    #[error("backend error: {0}")]
    Other(String),
}

/// Flat text key-value storage with key enumeration.
///
/// Only per-key consistency is assumed: no atomicity or ordering guarantees
/// across keys. Enumeration is used only by garbage collection, which goes
/// through `keys` and collects every key before removing any.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    fn remove(&self, key: &str) -> Result<(), BackendError>;

    /// Number of keys currently stored.
    fn len(&self) -> Result<usize, BackendError>;

    /// The key at position `index` of the backend's enumeration order.
    fn key_at(&self, index: usize) -> Result<Option<String>, BackendError>;

    fn is_empty(&self) -> Result<bool, BackendError> {
        Ok(self.len()? == 0)
    }

    /// All keys, in enumeration order. The default walks `len` + `key_at`;
    /// backends whose `key_at` is not constant time should override it.
    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let count = self.len()?;
        let mut keys = Vec::with_capacity(count);
        for index in 0..count {
            if let Some(key) = self.key_at(index)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for &T {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        (**self).remove(key)
    }

    fn len(&self) -> Result<usize, BackendError> {
        (**self).len()
    }

    fn key_at(&self, index: usize) -> Result<Option<String>, BackendError> {
        (**self).key_at(index)
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        (**self).keys()
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        (**self).remove(key)
    }

    fn len(&self) -> Result<usize, BackendError> {
        (**self).len()
    }

    fn key_at(&self, index: usize) -> Result<Option<String>, BackendError> {
        (**self).key_at(index)
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        (**self).keys()
    }
}

/// A process-local backend, the moral equivalent of a browser's storage area.
/// Cloning shares nothing; wrap in `Arc` or borrow to share between stores.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored key and value.
    pub fn dump(&self) -> BTreeMap<String, String> {
        self.entries.lock().clone()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn len(&self) -> Result<usize, BackendError> {
        Ok(self.entries.lock().len())
    }

    fn key_at(&self, index: usize) -> Result<Option<String>, BackendError> {
        Ok(self.entries.lock().keys().nth(index).cloned())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.entries.lock().keys().cloned().collect())
    }
}
