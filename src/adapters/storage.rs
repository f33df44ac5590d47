use crate::domain::ports::KeyValueStore;
use crate::utils::error::{CatalogError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// One file per key under `base_path`.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn write_error(key: &str, e: std::io::Error) -> CatalogError {
        CatalogError::PersistenceError {
            key: key.to_string(),
            reason: e.to_string(),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The value is written to a sibling temp file and renamed into place so
    /// readers never observe a partial write.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let full_path = self.path_for(key);
        fs::create_dir_all(&self.base_path).map_err(|e| Self::write_error(key, e))?;

        let tmp_path = full_path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(|e| Self::write_error(key, e))?;
        fs::rename(&tmp_path, &full_path).map_err(|e| Self::write_error(key, e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::write_error(key, e)),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    writes: usize,
}

/// In-memory store; clones share the same map. An optional quota (in bytes
/// of keys plus values) makes writes fail the way browser storage does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            inner: Arc::default(),
            quota: Some(quota_bytes),
        }
    }

    /// Number of successful `set` calls.
    pub fn write_count(&self) -> usize {
        self.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>> {
        self.inner.lock().map_err(|_| CatalogError::PersistenceError {
            key: String::new(),
            reason: "memory store lock poisoned".to_string(),
        })
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.lock()?;
        if let Some(quota) = self.quota {
            let others: usize = inner
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(CatalogError::PersistenceError {
                    key: key.to_string(),
                    reason: "quota exceeded".to_string(),
                });
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.entries.remove(key);
        Ok(())
    }
}
