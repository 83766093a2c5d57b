//! # File Bucket Store
//!
//! Storage abstraction for the file bucket. Backends keep bytes at the
//! paths the core derives from checksums; they never hash anything.
//!
//! ## Key Types
//!
//! - [`Backend`] - The trait for all storage operations
//! - [`DirectoryBackend`] - A bucket directory on the local filesystem
//! - [`MemoryBackend`] - In-memory storage for tests
//! - [`SaveOutcome`] - Result of saving contents at a path
//! - [`SaveMetadata`] - Sidecar data such as the original file path
//!
//! ## Usage
//!
//! ```rust,no_run
//! use filebucket_core::{Checksum, StoragePath};
//! use filebucket_store::{Backend, DirectoryBackend, SaveMetadata};
//!
//! let backend = DirectoryBackend::open("/var/lib/bucket").unwrap();
//! let checksum = Checksum::parse("{md5}8b3702ad1aed1ace7e32bde76ffffb2d").unwrap();
//! let path = StoragePath::for_checksum(&checksum);
//!
//! backend
//!     .save(&path, b"file\r\n contents", &SaveMetadata::new().with_original_path("/etc/motd"))
//!     .unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent saves**: Saving the same bytes twice returns `AlreadyPresent`
//! - **Collision detection**: Different bytes at an existing path is an error
//! - **Misses are not errors**: `load` returns `None`

pub mod directory;
pub mod error;
pub mod memory;
pub mod traits;

pub use directory::DirectoryBackend;
pub use error::{Result, StoreError};
pub use memory::MemoryBackend;
pub use traits::{Backend, SaveMetadata, SaveOutcome};
