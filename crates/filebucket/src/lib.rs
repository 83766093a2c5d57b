//! # File Bucket
//!
//! A content-addressable file store. Files are saved under the digest of
//! their contents and found again by `algorithm/digest` name.
//!
//! ## Overview
//!
//! The bucket provides:
//! - **Digest policy**: The configured algorithm list is resolved once, and
//!   algorithms the host refuses to run are dropped with a warning
//! - **Bucket files**: Immutable contents with a lazily computed checksum
//! - **Storage**: Pluggable backends keyed by fanned-out checksum paths
//!
//! ## Quick Start
//!
//! ```rust
//! use filebucket::{BucketConfig, FileBucket, MemoryBackend, SaveMetadata};
//!
//! let config = BucketConfig::default().with_digest_algorithms("md5, sha256");
//! let bucket = FileBucket::new(MemoryBackend::new(), &config).unwrap();
//!
//! let file = bucket.file("file\r\n contents");
//! bucket.save(&file, &SaveMetadata::new()).unwrap();
//!
//! let found = bucket
//!     .find("sha256/7152323bbca95871b2090190e80a02e05d7f164df9c4c3f543f6ff63dd817523")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(found.contents(), b"file\r\n contents");
//! ```
//!
//! ## Crate Structure
//!
//! - [`core`] - Digest policy, checksums, storage paths, bucket files, formats
//! - [`store`] - Storage backends
//! - [`bucket`] - The [`FileBucket`] facade

pub mod bucket;
pub mod config;
pub mod error;

pub use filebucket_core as core;
pub use filebucket_store as store;

pub use bucket::{FileBucket, SaveReport, SavedCopy};
pub use config::{BucketConfig, DEFAULT_DIGEST_ALGORITHMS};
pub use error::{BucketError, Result};

pub use filebucket_core::{
    BucketFile, Checksum, DigestAlgorithm, DigestPolicy, FileOptions, Format, StoragePath,
};
pub use filebucket_store::{Backend, DirectoryBackend, MemoryBackend, SaveMetadata, SaveOutcome};
