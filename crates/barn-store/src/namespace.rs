// ABOUTME: Partitions one shared flat storage space into per-application key prefixes.
// ABOUTME: Enumeration only ever yields the namespace's own keys, with the prefix stripped.

use crate::backend::{BackendError, StorageBackend};

/// Separator between namespace and key in the underlying storage.
pub const SEPARATOR: char = ':';

/// A view of a backend restricted to keys under `<namespace>:`.
#[derive(Debug, Clone)]
pub struct Namespaced<B> {
    inner: B,
    namespace: String,
    prefix: String,
}

impl<B: StorageBackend> Namespaced<B> {
    /// Fails with `InvalidNamespace` if `namespace` is empty or contains
    /// `SEPARATOR`. Either would let one namespace enumerate another's keys.
    pub fn new(namespace: &str, inner: B) -> Result<Self, BackendError> {
        if namespace.is_empty() || namespace.contains(SEPARATOR) {
            return Err(BackendError::InvalidNamespace(namespace.to_string()));
        }
        Ok(Self {
            inner,
            namespace: namespace.to_string(),
            prefix: format!("{}{}", namespace, SEPARATOR),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn qualify(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl<B: StorageBackend> StorageBackend for Namespaced<B> {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.inner.get(&self.qualify(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.inner.set(&self.qualify(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        self.inner.remove(&self.qualify(key))
    }

    // len and key_at each enumerate the whole inner backend; walk with keys().
    fn len(&self) -> Result<usize, BackendError> {
        Ok(self.keys()?.len())
    }

    fn key_at(&self, index: usize) -> Result<Option<String>, BackendError> {
        Ok(self.keys()?.into_iter().nth(index))
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        Ok(self
            .inner
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.prefix).map(str::to_string))
            .collect())
    }
}
