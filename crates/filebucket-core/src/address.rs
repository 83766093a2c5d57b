//! Content addresses: storage paths derived from checksums.
//!
//! The first [`FANOUT_DEPTH`] hex characters of the digest each become a
//! one-character directory, followed by the full digest as the leaf. Every
//! level therefore has at most 16 entries, and the path stays traceable to
//! the digest by eye:
//!
//! ```text
//! 8/b/3/7/0/2/a/d/8b3702ad1aed1ace7e32bde76ffffb2d
//! ```
//!
//! The depth is the same for every algorithm.

use std::fmt;
use std::path::PathBuf;

use crate::algorithm::Checksum;

/// Number of single-character directory levels.
pub const FANOUT_DEPTH: usize = 8;

/// A storage-relative path for a checksum. Always computed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoragePath {
    segments: Vec<String>,
}

impl StoragePath {
    /// Derive the path for a checksum.
    pub fn for_checksum(checksum: &Checksum) -> Self {
        let digest = checksum.digest();
        let mut segments: Vec<String> = digest
            .chars()
            .take(FANOUT_DEPTH)
            .map(String::from)
            .collect();
        segments.push(digest.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The leaf segment (the full digest).
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Relative filesystem path for the leaf directory.
    pub fn to_path_buf(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl From<&Checksum> for StoragePath {
    fn from(checksum: &Checksum) -> Self {
        Self::for_checksum(checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::DigestAlgorithm;
    use proptest::prelude::*;

    #[test]
    fn test_md5_path() {
        let digest = "8b3702ad1aed1ace7e32bde76ffffb2d";
        let checksum = Checksum::new(DigestAlgorithm::Md5, digest).unwrap();
        let path = StoragePath::for_checksum(&checksum);

        assert_eq!(
            path.segments(),
            &["8", "b", "3", "7", "0", "2", "a", "d", digest]
        );
        assert_eq!(path.leaf(), digest);
        assert_eq!(path.to_string(), format!("8/b/3/7/0/2/a/d/{}", digest));
    }

    #[test]
    fn test_sha256_path_has_same_depth() {
        let digest = "7152323bbca95871b2090190e80a02e05d7f164df9c4c3f543f6ff63dd817523";
        let checksum = Checksum::new(DigestAlgorithm::Sha256, digest).unwrap();
        let path = StoragePath::for_checksum(&checksum);

        assert_eq!(path.segments().len(), FANOUT_DEPTH + 1);
        assert_eq!(path.to_string(), format!("7/1/5/2/3/2/3/b/{}", digest));
    }

    #[test]
    fn test_path_buf_components() {
        let checksum = Checksum::new(DigestAlgorithm::Sha1, "8b1ab916151c0e1c2fedd3380e1d5c427e7d3924").unwrap();
        let path = StoragePath::from(&checksum).to_path_buf();
        assert_eq!(path.components().count(), FANOUT_DEPTH + 1);
        assert!(path.starts_with("8/b/1/a/b/9/1/6"));
    }

    proptest! {
        #[test]
        fn test_path_injective_on_digests(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            let ca = Checksum::from_digest_bytes(DigestAlgorithm::Sha256, &a).unwrap();
            let cb = Checksum::from_digest_bytes(DigestAlgorithm::Sha256, &b).unwrap();

            prop_assert_eq!(StoragePath::from(&ca), StoragePath::from(&ca.clone()));
            prop_assert_eq!(a == b, StoragePath::from(&ca) == StoragePath::from(&cb));
        }
    }
}
