//! Bucket configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Algorithms used when nothing is configured.
///
/// MD5 first for compatibility with existing buckets; on hosts that refuse
/// MD5 the policy demotes it and SHA-256 becomes primary.
pub const DEFAULT_DIGEST_ALGORITHMS: &str = "md5, sha256";

/// Configuration for a [`FileBucket`](crate::FileBucket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    /// Comma-separated digest algorithms, primary first.
    pub digest_algorithms: String,
    /// Root of the on-disk bucket, when using a directory backend.
    pub bucket_dir: Option<PathBuf>,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            digest_algorithms: DEFAULT_DIGEST_ALGORITHMS.to_string(),
            bucket_dir: None,
        }
    }
}

impl BucketConfig {
    pub fn with_digest_algorithms(mut self, value: impl Into<String>) -> Self {
        self.digest_algorithms = value.into();
        self
    }

    pub fn with_bucket_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bucket_dir = Some(dir.into());
        self
    }
}
