// ABOUTME: A storage backend persisted as one JSON object file on disk.
// ABOUTME: Every write rewrites the file atomically (temp file, fsync, rename) so a crash never tears it.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::backend::{BackendError, StorageBackend};

/// File-backed flat key-value storage. The whole map is held in memory and
/// flushed on every `set`/`remove`.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileBackend {
    /// Open (or create) a data file at the given path.
    /// Creates parent directories if they do not exist.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let entries = if path.exists() {
            let contents = fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    /// Returns the path to the underlying data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the map using atomic write (write to .tmp, fsync, rename).
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), BackendError> {
        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(entries)?;

        let mut file = File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;

        // Best-effort: the rename already succeeded and the data is consistent.
        if let Some(parent) = self.path.parent()
            && let Ok(dir) = File::open(parent)
        {
            if let Err(e) = dir.sync_all() {
                tracing::debug!("directory fsync for {} failed: {}", parent.display(), e);
            }
        }

        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let mut entries = self.entries.lock();
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&entries) {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        let mut entries = self.entries.lock();
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("barn.json");

        let backend = FileBackend::open(&path).unwrap();
        backend.set("KEYSET", "0").unwrap();
        backend.set("0_0", r#"{"cmd":"SET","args":["k","v"]}"#).unwrap();
        backend.set("0_1", "doomed").unwrap();
        backend.remove("0_1").unwrap();
        drop(backend);

        let reopened = FileBackend::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 2);
        assert_eq!(reopened.get("KEYSET").unwrap(), Some("0".to_string()));
        assert_eq!(
            reopened.get("0_0").unwrap(),
            Some(r#"{"cmd":"SET","args":["k","v"]}"#.to_string())
        );
        assert_eq!(reopened.get("0_1").unwrap(), None);
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep").join("nested").join("barn.json");

        let backend = FileBackend::open(&path).unwrap();
        assert!(backend.is_empty().unwrap());

        backend.set("k", "v").unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn empty_file_opens_as_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        File::create(&path).unwrap();

        let backend = FileBackend::open(&path).unwrap();
        assert!(backend.is_empty().unwrap());
    }

    #[test]
    fn corrupt_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.json");
        fs::write(&path, r#"{"KEYSET": "0", "0_0": "#).unwrap();

        let err = FileBackend::open(&path).unwrap_err();
        assert!(matches!(err, BackendError::Json(_)));
    }
}
