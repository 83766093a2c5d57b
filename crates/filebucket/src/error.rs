//! Error types for the bucket.

use filebucket_core::{ConfigError, CoreError, DigestAlgorithm, DigestError, ValidationError};
use filebucket_store::StoreError;
use thiserror::Error;

/// Errors that can occur during bucket operations.
#[derive(Debug, Error)]
pub enum BucketError {
    /// The digest algorithm setting is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid caller input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A digest implementation failed after passing its probe.
    #[error("digest error: {0}")]
    Digest(#[from] DigestError),

    /// Encoding or decoding error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A directory backend was requested without a bucket directory.
    #[error("no bucket directory configured")]
    MissingBucketDir,

    /// A caller-supplied checksum does not match the contents.
    #[error("checksum mismatch: claimed {claimed}, contents hash to {actual}")]
    ChecksumMismatch { claimed: String, actual: String },

    /// The algorithm failed its probe on this host.
    #[error("digest algorithm {0} is not usable on this host")]
    UnusableAlgorithm(DigestAlgorithm),

    /// Stored contents no longer hash to the name they are stored under.
    #[error("corrupt contents stored under {0}")]
    CorruptContents(String),
}

/// Result type for bucket operations.
pub type Result<T> = std::result::Result<T, BucketError>;
