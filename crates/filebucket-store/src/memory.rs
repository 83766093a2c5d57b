//! In-memory implementation of the Backend trait.
//!
//! This is primarily for testing. It has the same semantics as the
//! directory backend but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;
use filebucket_core::StoragePath;

use crate::error::{Result, StoreError};
use crate::traits::{Backend, SaveMetadata, SaveOutcome};

/// In-memory backend.
///
/// All data is lost when the backend is dropped. Thread-safe via RwLock.
pub struct MemoryBackend {
    inner: RwLock<HashMap<StoragePath, Stored>>,
}

struct Stored {
    contents: Bytes,
    original_paths: Vec<String>,
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored paths.
    pub fn len(&self) -> Result<usize> {
        Ok(self.inner.read().map_err(|_| StoreError::LockPoisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Every stored path, sorted.
    pub fn paths(&self) -> Result<Vec<StoragePath>> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut paths: Vec<StoragePath> = inner.keys().cloned().collect();
        paths.sort();
        Ok(paths)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MemoryBackend {
    fn save(&self, path: &StoragePath, contents: &[u8], metadata: &SaveMetadata) -> Result<SaveOutcome> {
        metadata.validate()?;
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;

        let outcome = match inner.get(path) {
            Some(stored) if stored.contents.as_ref() != contents => {
                return Err(StoreError::Collision(path.to_string()));
            }
            Some(_) => SaveOutcome::AlreadyPresent,
            None => {
                inner.insert(
                    path.clone(),
                    Stored {
                        contents: Bytes::copy_from_slice(contents),
                        original_paths: Vec::new(),
                    },
                );
                SaveOutcome::Stored
            }
        };

        if let (Some(original), Some(stored)) = (&metadata.original_path, inner.get_mut(path)) {
            if !stored.original_paths.contains(original) {
                stored.original_paths.push(original.clone());
            }
        }

        Ok(outcome)
    }

    fn load(&self, path: &StoragePath) -> Result<Option<Bytes>> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.get(path).map(|s| s.contents.clone()))
    }

    fn exists(&self, path: &StoragePath) -> Result<bool> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.contains_key(path))
    }

    fn original_paths(&self, path: &StoragePath) -> Result<Vec<String>> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner
            .get(path)
            .map(|s| s.original_paths.clone())
            .unwrap_or_default())
    }
}
