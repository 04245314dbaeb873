//! Key-value store adapters backing the lookup cache.
//!
//! - [`MemoryStore`]: process-local map, used by tests and ephemeral sessions.
//! - [`FileStore`]: a single JSON object file mapping keys to string values.

use skyroute_abstraction::{KeyValueStore, StorageError};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.read().map(|values| values.len()).unwrap_or_default()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| StorageError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed key-value store.
///
/// The file is read on every `get` and rewritten on every `set`, so several
/// processes sharing the file see each other's last write. A `set` writes a
/// temporary file next to the target and renames it into place, so readers
/// never observe a partially written file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            StorageError::Serialization(format!("{}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut values = self.load()?;
        Ok(values.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::LockPoisoned)?;

        let mut values = match self.load() {
            Ok(values) => values,
            Err(StorageError::Serialization(e)) => {
                warn!(error = %e, "Replacing unreadable storage file");
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), value.to_string());

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let content = serde_json::to_string(&values)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(content.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;

        debug!(path = %self.path.display(), key, "Wrote storage file");
        Ok(())
    }
}
