//! # File Bucket Core
//!
//! Pure primitives for a content-addressable file store: files are
//! identified by the digest of their contents, not by name.
//!
//! This crate contains no I/O. Storage lives in `filebucket-store`.
//!
//! ## Key Types
//!
//! - [`DigestPolicy`] - Resolves the configured algorithm list, dropping
//!   algorithms the host cannot run
//! - [`AlgorithmList`] - The resolved, ordered algorithms; the first is primary
//! - [`ChecksumComputer`] - Computes `{algorithm}digest` checksums
//! - [`StoragePath`] - The directory path a checksum lives at
//! - [`BucketFile`] - Immutable contents with a lazily computed checksum
//!
//! ## Formats
//!
//! Bucket files encode to a compact CBOR form or to a deprecated JSON form.
//! See the [`format`] module.
//!
//! ## Example
//!
//! ```rust
//! use filebucket_core::{BucketFile, ChecksumComputer, DigestPolicy};
//!
//! let policy = DigestPolicy::default();
//! let algorithms = policy.resolve("md5, sha256").unwrap();
//! let computer = ChecksumComputer::new(policy.provider().clone(), algorithms);
//!
//! let file = BucketFile::new("file\r\n contents", computer);
//! assert_eq!(file.name().unwrap(), "md5/8b3702ad1aed1ace7e32bde76ffffb2d");
//! ```

pub mod address;
pub mod algorithm;
pub mod checksum;
pub mod digest;
pub mod error;
pub mod file;
pub mod format;
pub mod policy;

pub use address::{StoragePath, FANOUT_DEPTH};
pub use algorithm::{Checksum, DigestAlgorithm};
pub use checksum::ChecksumComputer;
pub use digest::{DigestProvider, RustCryptoDigests};
pub use error::{ConfigError, CoreError, DigestError, ValidationError};
pub use file::{BucketFile, FileOptions, OVERRIDE_CHECKSUM};
pub use format::{convert_from, render, DeprecationObserver, Format, TracingDeprecations};
pub use policy::{parse_algorithms, AlgorithmList, DigestPolicy, PROBE_INPUT};
