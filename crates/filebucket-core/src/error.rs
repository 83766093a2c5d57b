//! Error types for the file bucket core.

use thiserror::Error;

use crate::algorithm::DigestAlgorithm;

/// Errors raised while resolving the configured digest algorithm list.
///
/// These are fatal at startup: a bucket must not come up without a workable
/// algorithm.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no digest algorithms configured")]
    EmptyAlgorithmList,

    #[error("empty digest algorithm name in {0:?}")]
    EmptyAlgorithmName(String),

    #[error("unknown digest algorithm(s): {}", .0.join(" "))]
    UnknownAlgorithms(Vec<String>),

    #[error("no workable digest algorithms")]
    NoWorkableAlgorithms,
}

/// Validation errors for caller-supplied input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("contents must be a string, got {got}")]
    InvalidContents { got: &'static str },

    #[error("unknown option(s): {}", .0.join(", "))]
    UnknownOptions(Vec<String>),

    #[error("unknown key(s): {}", .0.join(", "))]
    UnknownKeys(Vec<String>),

    #[error("missing key: {0}")]
    MissingKey(&'static str),

    #[error("malformed checksum: {0:?}")]
    MalformedChecksum(String),

    #[error("malformed bucket name: {0:?}")]
    MalformedName(String),
}

/// A digest implementation refused or failed to produce a digest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{algorithm} digest failed: {reason}")]
pub struct DigestError {
    pub algorithm: DigestAlgorithm,
    pub reason: String,
}

impl DigestError {
    pub fn new(algorithm: DigestAlgorithm, reason: impl Into<String>) -> Self {
        Self {
            algorithm,
            reason: reason.into(),
        }
    }
}

/// Core errors that can occur while working with bucket files.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
