//! String key-value store
//!
//! Flat map of string keys to raw string values, persisted as one JSON
//! object. Values are opaque: callers serialize their own data.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Could not determine data directory")]
    NoDataDir,
}

/// Minimal key-value interface
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store (tests, or when no data directory exists)
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON-file backed store; every write rewrites the whole file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Default location (~/.local/share/cinezy/storage.json on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("cinezy").join("storage.json"))
    }

    /// Open the store at the default location
    pub fn open_default() -> Result<Self, StorageError> {
        let path = Self::default_path().ok_or(StorageError::NoDataDir)?;
        Self::open(path)
    }

    /// Open (or lazily create) the store at `path`.
    ///
    /// A file that is not a JSON string map is moved aside to `<path>.bak`
    /// and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    let backup = path.with_extension("json.bak");
                    warn!(path = %path.display(), error = %e, "storage file unreadable, moving aside");
                    std::fs::rename(&path, &backup)?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = entries.len(), "storage opened");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `entries` to disk; the in-memory map is only replaced after this succeeds
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value);
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basics() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a"), None);

        store.set("a", "1".into()).unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));

        store.remove("a").unwrap();
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("feedback_tt1", "great".into()).unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("feedback_tt1").as_deref(), Some("great"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("none.json")).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_file_store_corrupt_file_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("x"), None);
        assert!(dir.path().join("storage.json.bak").exists());
    }

    #[test]
    fn test_file_store_failed_write_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("cinezy");
        let mut store = FileStore::open(parent.join("storage.json")).unwrap();
        store.set("kept", "1".into()).unwrap();

        // Parent directory replaced by a plain file: every write now fails
        std::fs::remove_dir_all(&parent).unwrap();
        std::fs::write(&parent, "blocker").unwrap();

        assert!(store.set("feedback_tt1", "note".into()).is_err());
        assert_eq!(store.get("feedback_tt1"), None);

        assert!(store.remove("kept").is_err());
        assert_eq!(store.get("kept").as_deref(), Some("1"));
    }

    #[test]
    fn test_file_store_remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("s.json")).unwrap();
        assert!(store.remove("nope").is_ok());
        assert!(!store.path().exists());
    }
}
