//! On-disk bucket directory.
//!
//! Layout under the bucket root, one leaf directory per stored path:
//!
//! ```text
//! <root>/8/b/3/7/0/2/a/d/8b3702ad1aed1ace7e32bde76ffffb2d/
//!     contents    the stored bytes
//!     paths       original file paths, one per line
//! ```
//!
//! Contents are written to a temporary file in the leaf directory and then
//! persisted with no-clobber semantics, so concurrent writers racing on the
//! same path never tear or overwrite each other.
//!
//! The `paths` sidecar is rewritten whole: read, merge, write a temporary
//! file, rename over the old one. Updates to one leaf are serialized by a
//! process-wide lock keyed on the leaf directory.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use bytes::Bytes;
use filebucket_core::StoragePath;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::traits::{Backend, SaveMetadata, SaveOutcome};

const CONTENTS_FILE: &str = "contents";
const PATHS_FILE: &str = "paths";

/// Backend storing files under a bucket directory.
#[derive(Debug, Clone)]
pub struct DirectoryBackend {
    root: PathBuf,
}

impl DirectoryBackend {
    /// Use `root` as the bucket directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute leaf directory for a storage path.
    pub fn leaf_dir(&self, path: &StoragePath) -> PathBuf {
        self.root.join(path.to_path_buf())
    }

    fn contents_file(&self, path: &StoragePath) -> PathBuf {
        self.leaf_dir(path).join(CONTENTS_FILE)
    }

    fn verify_existing(&self, path: &StoragePath, contents: &[u8]) -> Result<SaveOutcome> {
        let existing = fs::read(self.contents_file(path))?;
        if existing != contents {
            return Err(StoreError::Collision(path.to_string()));
        }
        Ok(SaveOutcome::AlreadyPresent)
    }

    fn write_contents(&self, path: &StoragePath, contents: &[u8]) -> Result<SaveOutcome> {
        let dir = self.leaf_dir(path);
        let target = dir.join(CONTENTS_FILE);

        if target.exists() {
            return self.verify_existing(path, contents);
        }

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;

        match tmp.persist_noclobber(&target) {
            Ok(_) => Ok(SaveOutcome::Stored),
            // Another writer got there first.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                self.verify_existing(path, contents)
            }
            Err(e) => Err(e.error.into()),
        }
    }

    fn record_original_path(&self, path: &StoragePath, original: &str) -> Result<()> {
        let dir = self.leaf_dir(path);

        with_leaf_lock(&dir, || {
            let mut originals = self.original_paths(path)?;
            if originals.iter().any(|p| p == original) {
                return Ok(());
            }
            originals.push(original.to_string());

            let mut tmp = NamedTempFile::new_in(&dir)?;
            for p in &originals {
                writeln!(tmp, "{}", p)?;
            }
            tmp.as_file().sync_all()?;
            tmp.persist(dir.join(PATHS_FILE)).map_err(|e| e.error)?;
            Ok(())
        })
    }
}

type LockTable = Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>;

fn leaf_locks() -> &'static LockTable {
    static LOCKS: OnceLock<LockTable> = OnceLock::new();
    LOCKS.get_or_init(Default::default)
}

/// Run `f` holding the lock for `dir`. The table entry is dropped once no
/// other caller holds it.
fn with_leaf_lock<T>(dir: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
    // Handles opened with different spellings of one root share a key.
    let key = fs::canonicalize(dir)?;
    let lock = {
        let mut table = leaf_locks().lock().map_err(|_| StoreError::LockPoisoned)?;
        table.entry(key.clone()).or_default().clone()
    };

    let result = {
        let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        f()
    };

    let mut table = leaf_locks().lock().map_err(|_| StoreError::LockPoisoned)?;
    // One reference in the table, one here.
    if Arc::strong_count(&lock) == 2 {
        table.remove(&key);
    }
    result
}

impl Backend for DirectoryBackend {
    fn save(&self, path: &StoragePath, contents: &[u8], metadata: &SaveMetadata) -> Result<SaveOutcome> {
        metadata.validate()?;
        fs::create_dir_all(self.leaf_dir(path))?;

        let outcome = self.write_contents(path, contents)?;
        if let Some(original) = &metadata.original_path {
            self.record_original_path(path, original)?;
        }

        debug!(%path, ?outcome, "saved to bucket directory");
        Ok(outcome)
    }

    fn load(&self, path: &StoragePath) -> Result<Option<Bytes>> {
        match fs::read(self.contents_file(path)) {
            Ok(bytes) => Ok(Some(Bytes::from(bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, path: &StoragePath) -> Result<bool> {
        Ok(self.contents_file(path).is_file())
    }

    fn original_paths(&self, path: &StoragePath) -> Result<Vec<String>> {
        match fs::read_to_string(self.leaf_dir(path).join(PATHS_FILE)) {
            Ok(text) => Ok(text.lines().filter(|l| !l.is_empty()).map(String::from).collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
