//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use filebucket::{BucketConfig, FileBucket};
use filebucket_core::{
    DigestAlgorithm, DigestError, DigestPolicy, DigestProvider, RustCryptoDigests,
};
use filebucket_store::{DirectoryBackend, MemoryBackend};
use tempfile::TempDir;

/// A digest provider that refuses some algorithms, like a FIPS host
/// refusing MD5.
#[derive(Debug, Clone, Default)]
pub struct FailingDigests {
    refused: Vec<DigestAlgorithm>,
    panics: bool,
}

impl FailingDigests {
    pub fn refusing(refused: impl IntoIterator<Item = DigestAlgorithm>) -> Self {
        Self {
            refused: refused.into_iter().collect(),
            panics: false,
        }
    }

    /// Refuse MD5 only.
    pub fn fips() -> Self {
        Self::refusing([DigestAlgorithm::Md5])
    }

    /// Panic instead of returning an error for refused algorithms.
    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    pub fn policy(self) -> DigestPolicy {
        DigestPolicy::new(Arc::new(self))
    }
}

impl DigestProvider for FailingDigests {
    fn hex_digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> Result<String, DigestError> {
        if self.refused.contains(&algorithm) {
            if self.panics {
                panic!("{} disabled for FIPS mode", algorithm);
            }
            return Err(DigestError::new(algorithm, "disabled for FIPS mode"));
        }
        RustCryptoDigests.hex_digest(algorithm, data)
    }
}

/// A test fixture with an in-memory bucket.
pub struct TestFixture {
    pub bucket: FileBucket<MemoryBackend>,
}

impl TestFixture {
    /// Bucket with the default algorithm setting.
    pub fn new() -> Self {
        Self::with_algorithms(filebucket::DEFAULT_DIGEST_ALGORITHMS)
    }

    /// Bucket with the given algorithm setting.
    ///
    /// Panics if the setting does not resolve.
    pub fn with_algorithms(algorithms: &str) -> Self {
        Self::with_policy(algorithms, &DigestPolicy::default())
    }

    /// Bucket resolving its algorithms against a specific policy.
    pub fn with_policy(algorithms: &str, policy: &DigestPolicy) -> Self {
        let config = BucketConfig::default().with_digest_algorithms(algorithms);
        let bucket = FileBucket::with_policy(MemoryBackend::new(), &config, policy)
            .expect("algorithm setting should resolve");
        Self { bucket }
    }

    pub fn backend(&self) -> &MemoryBackend {
        self.bucket.backend()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A bucket backed by a temporary directory, removed on drop.
pub struct DirectoryFixture {
    pub dir: TempDir,
    pub bucket: FileBucket<DirectoryBackend>,
}

impl DirectoryFixture {
    pub fn with_algorithms(algorithms: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = BucketConfig::default()
            .with_digest_algorithms(algorithms)
            .with_bucket_dir(dir.path());
        let bucket = FileBucket::open(&config).expect("open directory bucket");
        Self { dir, bucket }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filebucket_core::ConfigError;
    use filebucket_store::SaveMetadata;

    #[test]
    fn test_fips_provider_demotes_md5() {
        let fixture = TestFixture::with_policy("md5, sha256", &FailingDigests::fips().policy());
        assert_eq!(
            fixture.bucket.algorithms().as_slice(),
            &[DigestAlgorithm::Sha256]
        );
    }

    #[test]
    fn test_fips_provider_md5_only_is_fatal() {
        let policy = FailingDigests::fips().policy();
        assert_eq!(policy.resolve("md5"), Err(ConfigError::NoWorkableAlgorithms));
    }

    #[test]
    fn test_panicking_provider_demoted() {
        let policy = FailingDigests::fips().panicking().policy();
        let list = policy.resolve("md5, sha1").unwrap();
        assert_eq!(list.as_slice(), &[DigestAlgorithm::Sha1]);
    }

    #[test]
    fn test_directory_fixture_saves() {
        let fixture = DirectoryFixture::with_algorithms("md5");
        let file = fixture.bucket.file("hello");
        fixture.bucket.save(&file, &SaveMetadata::new()).unwrap();

        let leaf = fixture
            .dir
            .path()
            .join(file.storage_path().unwrap().to_path_buf());
        assert!(leaf.join("contents").is_file());
    }
}
