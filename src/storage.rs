//! Key-value blob media the store persists into.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dirs_next as dirs;

use crate::error::StorageError;

/// A key-value medium holding serialized blobs.
///
/// `save` must be durable when it returns `Ok`; on `Err` the previous value
/// for the key is left untouched.
pub trait BlobStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

fn check_quota(key: &str, value: &str, limit: Option<usize>) -> Result<(), StorageError> {
    match limit {
        Some(limit) if value.len() > limit => Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            size: value.len(),
            limit,
        }),
        _ => Ok(()),
    }
}

/// In-memory medium, mainly for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
    limit_bytes: Option<usize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any single blob larger than `limit_bytes`.
    pub fn with_limit(limit_bytes: usize) -> Self {
        Self {
            blobs: HashMap::new(),
            limit_bytes: Some(limit_bytes),
        }
    }

    pub fn set_limit(&mut self, limit_bytes: Option<usize>) {
        self.limit_bytes = limit_bytes;
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(key, value, self.limit_bytes)?;
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
    limit_bytes: Option<usize>,
}

impl FileBlobStore {
    const APP_DIR: &'static str = "duo_workout_tracker";

    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            limit_bytes: None,
        }
    }

    /// Platform data directory, e.g. `~/.local/share/duo_workout_tracker`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join(Self::APP_DIR))
    }

    pub fn with_limit(mut self, limit_bytes: Option<usize>) -> Self {
        self.limit_bytes = limit_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(key, value, self.limit_bytes)?;
        std::fs::create_dir_all(&self.dir)?;
        // Write beside the target and rename so readers never see a partial blob.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
