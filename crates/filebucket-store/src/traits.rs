//! Backend trait: the abstract interface for bucket file persistence.
//!
//! The core hands a backend a [`StoragePath`] and the bytes to keep there.
//! Backends never compute checksums and never decide paths.

use bytes::Bytes;
use filebucket_core::StoragePath;

use crate::error::{Result, StoreError};

/// Result of saving contents at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Contents were written.
    Stored,
    /// Identical contents were already present (idempotent, not an error).
    AlreadyPresent,
}

/// Sidecar data stored next to the contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveMetadata {
    /// Path of the file on the machine it came from, if known.
    pub original_path: Option<String>,
}

impl SaveMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_original_path(mut self, path: impl Into<String>) -> Self {
        self.original_path = Some(path.into());
        self
    }

    /// Check the metadata can be recorded. Original paths must be non-empty
    /// single lines.
    pub fn validate(&self) -> Result<()> {
        match self.original_path.as_deref() {
            Some("") => Err(StoreError::InvalidData("original path is empty".into())),
            Some(path) if path.contains(|c: char| c == '\n' || c == '\r') => Err(
                StoreError::InvalidData(format!("original path contains a line break: {:?}", path)),
            ),
            _ => Ok(()),
        }
    }
}

/// The backend trait: minimal interface for path-addressed storage.
///
/// # Design Notes
///
/// - **Write if absent**: saving at a path that already holds the same bytes
///   returns `AlreadyPresent`. Saving different bytes there is a
///   [`Collision`](crate::StoreError::Collision).
/// - **Absence is not an error**: `load` returns `Ok(None)` on a miss.
/// - **Original paths accumulate**: each distinct original path is recorded
///   once per stored path. Metadata failing [`SaveMetadata::validate`] is
///   rejected before anything is written.
pub trait Backend: Send + Sync {
    /// Store `contents` at `path` unless they are already there.
    fn save(&self, path: &StoragePath, contents: &[u8], metadata: &SaveMetadata) -> Result<SaveOutcome>;

    /// Load the contents stored at `path`.
    fn load(&self, path: &StoragePath) -> Result<Option<Bytes>>;

    /// Check whether anything is stored at `path`.
    fn exists(&self, path: &StoragePath) -> Result<bool>;

    /// Original file paths recorded for `path`, in the order first seen.
    fn original_paths(&self, path: &StoragePath) -> Result<Vec<String>>;
}
