//! The FileBucket: unified API over digest policy, bucket files and storage.
//!
//! The bucket resolves its algorithm list once, when it is created, and uses
//! that list for every file it makes, saves, or finds afterwards.

use filebucket_core::{
    AlgorithmList, BucketFile, Checksum, ChecksumComputer, DigestAlgorithm, DigestPolicy,
    FileOptions, StoragePath,
};
use filebucket_store::{Backend, DirectoryBackend, SaveMetadata, SaveOutcome};
use tracing::debug;

use crate::config::BucketConfig;
use crate::error::{BucketError, Result};

/// One stored copy of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCopy {
    pub checksum: Checksum,
    pub path: StoragePath,
    pub outcome: SaveOutcome,
}

/// What a save wrote, one entry per configured algorithm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub copies: Vec<SavedCopy>,
}

impl SaveReport {
    /// Number of copies that were newly written.
    pub fn stored(&self) -> usize {
        self.copies
            .iter()
            .filter(|c| c.outcome == SaveOutcome::Stored)
            .count()
    }

    pub fn paths(&self) -> impl Iterator<Item = &StoragePath> {
        self.copies.iter().map(|c| &c.path)
    }
}

/// A content-addressable file bucket.
pub struct FileBucket<B: Backend> {
    backend: B,
    computer: ChecksumComputer,
}

impl<B: Backend> FileBucket<B> {
    /// Create a bucket, resolving the configured algorithms on this host.
    ///
    /// Fails if the algorithm setting is invalid or nothing in it works.
    pub fn new(backend: B, config: &BucketConfig) -> Result<Self> {
        Self::with_policy(backend, config, &DigestPolicy::default())
    }

    /// Create a bucket resolving algorithms with a specific policy.
    pub fn with_policy(backend: B, config: &BucketConfig, policy: &DigestPolicy) -> Result<Self> {
        let algorithms = policy.resolve(&config.digest_algorithms)?;
        Ok(Self {
            backend,
            computer: ChecksumComputer::new(policy.provider().clone(), algorithms),
        })
    }

    pub fn algorithms(&self) -> &AlgorithmList {
        self.computer.algorithms()
    }

    pub fn computer(&self) -> &ChecksumComputer {
        &self.computer
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Files
    // ─────────────────────────────────────────────────────────────────────────

    /// Make a file checksummed with this bucket's algorithms.
    pub fn file(&self, contents: impl Into<bytes::Bytes>) -> BucketFile {
        BucketFile::new(contents, self.computer.clone())
    }

    pub fn file_with_options(
        &self,
        contents: impl Into<bytes::Bytes>,
        options: FileOptions,
    ) -> BucketFile {
        BucketFile::with_options(contents, self.computer.clone(), options)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Save / Find
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a file under the path of every configured algorithm.
    ///
    /// Paths always come from hashing the contents. A caller-supplied
    /// checksum is verified against the contents and rejected on mismatch.
    pub fn save(&self, file: &BucketFile, metadata: &SaveMetadata) -> Result<SaveReport> {
        let contents = file.contents();

        if file.is_overridden() {
            let claimed = file.checksum()?;
            self.ensure_usable(claimed.algorithm())?;
            let actual = self.computer.compute_with(claimed.algorithm(), contents)?;
            if &actual != claimed {
                return Err(BucketError::ChecksumMismatch {
                    claimed: claimed.to_string(),
                    actual: actual.to_string(),
                });
            }
        }

        let mut report = SaveReport::default();
        for checksum in self.computer.compute_all(contents)? {
            let path = StoragePath::for_checksum(&checksum);
            let outcome = self.backend.save(&path, contents, metadata)?;
            debug!(%checksum, %path, ?outcome, "saved bucket file");
            report.copies.push(SavedCopy {
                checksum,
                path,
                outcome,
            });
        }

        Ok(report)
    }

    /// Find a file by its `algorithm/digest` name.
    ///
    /// Returns `None` when nothing is stored there. The returned file reports
    /// exactly the checksum it was looked up by. Names using an algorithm this
    /// host cannot run are refused, since their contents cannot be verified.
    pub fn find(&self, name: &str) -> Result<Option<BucketFile>> {
        let checksum = Checksum::from_name(name)?;
        self.ensure_usable(checksum.algorithm())?;
        let path = StoragePath::for_checksum(&checksum);

        let Some(contents) = self.backend.load(&path)? else {
            debug!(name, "bucket file not found");
            return Ok(None);
        };

        let actual = self.computer.compute_with(checksum.algorithm(), &contents)?;
        if actual != checksum {
            return Err(BucketError::CorruptContents(name.to_string()));
        }

        let options = FileOptions::new().override_checksum(checksum);
        Ok(Some(BucketFile::with_options(
            contents,
            self.computer.clone(),
            options,
        )))
    }

    fn ensure_usable(&self, algorithm: DigestAlgorithm) -> Result<()> {
        if self.algorithms().is_usable(algorithm) {
            Ok(())
        } else {
            Err(BucketError::UnusableAlgorithm(algorithm))
        }
    }

    /// Check whether a file is stored under `name`.
    pub fn exists(&self, name: &str) -> Result<bool> {
        let checksum = Checksum::from_name(name)?;
        Ok(self.backend.exists(&StoragePath::for_checksum(&checksum))?)
    }

    /// Original file paths recorded for the file stored under `name`.
    pub fn original_paths(&self, name: &str) -> Result<Vec<String>> {
        let checksum = Checksum::from_name(name)?;
        Ok(self
            .backend
            .original_paths(&StoragePath::for_checksum(&checksum))?)
    }
}

impl FileBucket<DirectoryBackend> {
    /// Open the on-disk bucket named by `config.bucket_dir`.
    pub fn open(config: &BucketConfig) -> Result<Self> {
        let dir = config
            .bucket_dir
            .as_ref()
            .ok_or(BucketError::MissingBucketDir)?;
        Self::new(DirectoryBackend::open(dir)?, config)
    }
}
