//! # File Bucket Testkit
//!
//! Testing utilities for the file bucket.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known contents with expected digests and storage paths
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Buckets ready for tests, and a digest provider that refuses
//!   algorithms the way FIPS hosts do
//!
//! ## Golden Vectors
//!
//! ```rust
//! use filebucket_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let file = vector.file();
//!     assert_eq!(file.storage_path().unwrap().to_string(), vector.path);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use filebucket_testkit::generators::ConfigParams;
//!
//! proptest! {
//!     #[test]
//!     fn setting_parses(params: ConfigParams) {
//!         let parsed = filebucket_core::parse_algorithms(&params.render()).unwrap();
//!         prop_assert_eq!(parsed, params.algorithms);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use filebucket_testkit::fixtures::{FailingDigests, TestFixture};
//!
//! let fixture = TestFixture::with_policy("md5, sha256", &FailingDigests::fips().policy());
//! assert_eq!(fixture.bucket.algorithms().to_string(), "sha256");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{DirectoryFixture, FailingDigests, TestFixture};
pub use generators::ConfigParams;
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector, SAMPLE_CONTENTS};
