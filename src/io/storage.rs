//! Key/value blob storage for persisted history
//!
//! Mirrors browser local storage: string values addressed by key, with an
//! optional byte quota. Two backends:
//! - `FileStorage` - one JSON file per key under a directory
//! - `MemoryStorage` - in-process map, for tests and ephemeral sessions

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Storage failure. Always recoverable: callers fall back to in-memory state.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("storage quota exceeded: {needed} bytes needed, limit {limit}")]
    QuotaExceeded { needed: u64, limit: u64 },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("persisted history is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
}

pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError>;
}

fn check_quota(max_bytes: Option<u64>, value: &str) -> Result<(), PersistenceError> {
    match max_bytes {
        Some(limit) if value.len() as u64 > limit => {
            Err(PersistenceError::QuotaExceeded { needed: value.len() as u64, limit })
        }
        _ => Ok(()),
    }
}

/// File-backed storage: `<dir>/<key>.json`
pub struct FileStorage {
    dir: PathBuf,
    max_bytes: Option<u64>,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        info!(dir = %dir.display(), "file_storage_initialized");
        Self { dir, max_bytes: None }
    }

    pub fn with_max_bytes(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        check_quota(self.max_bytes, value)?;

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        // Readers never observe a partially written blob
        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!("{}.json.tmp", key));
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;

        debug!(path = %path.display(), bytes = value.len(), "storage_item_written");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "storage_item_removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    max_bytes: Option<u64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_bytes(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        check_quota(self.max_bytes, value)?;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.items.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove_item(key)
    }
}
