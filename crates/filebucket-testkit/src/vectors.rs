//! Golden test vectors for deterministic verification.
//!
//! Each vector pins the digest and storage path of known contents under one
//! algorithm. Any change to hashing or path layout breaks existing buckets,
//! so these must never change.

use filebucket_core::{AlgorithmList, BucketFile, ChecksumComputer, DigestAlgorithm};

/// Contents used by most vectors. The CRLF catches newline translation.
pub const SAMPLE_CONTENTS: &[u8] = b"file\r\n contents";

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub algorithm: DigestAlgorithm,
    pub contents: &'static [u8],
    /// Expected lowercase hex digest.
    pub digest: &'static str,
    /// Expected storage path, `/`-joined.
    pub path: &'static str,
}

impl GoldenVector {
    /// Expected checksum text, `{alg}digest`.
    pub fn checksum(&self) -> String {
        format!("{{{}}}{}", self.algorithm, self.digest)
    }

    /// Expected lookup name, `alg/digest`.
    pub fn name_for_lookup(&self) -> String {
        format!("{}/{}", self.algorithm, self.digest)
    }

    /// Build the vector's file with its algorithm as the only one configured.
    pub fn file(&self) -> BucketFile {
        let computer = ChecksumComputer::with_algorithms(AlgorithmList::single(self.algorithm));
        BucketFile::new(self.contents, computer)
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "md5 of sample contents",
            algorithm: DigestAlgorithm::Md5,
            contents: SAMPLE_CONTENTS,
            digest: "8b3702ad1aed1ace7e32bde76ffffb2d",
            path: "8/b/3/7/0/2/a/d/8b3702ad1aed1ace7e32bde76ffffb2d",
        },
        GoldenVector {
            name: "sha1 of sample contents",
            algorithm: DigestAlgorithm::Sha1,
            contents: SAMPLE_CONTENTS,
            digest: "8b1ab916151c0e1c2fedd3380e1d5c427e7d3924",
            path: "8/b/1/a/b/9/1/6/8b1ab916151c0e1c2fedd3380e1d5c427e7d3924",
        },
        GoldenVector {
            name: "sha256 of sample contents",
            algorithm: DigestAlgorithm::Sha256,
            contents: SAMPLE_CONTENTS,
            digest: "7152323bbca95871b2090190e80a02e05d7f164df9c4c3f543f6ff63dd817523",
            path: "7/1/5/2/3/2/3/b/7152323bbca95871b2090190e80a02e05d7f164df9c4c3f543f6ff63dd817523",
        },
        GoldenVector {
            name: "md5 of empty contents",
            algorithm: DigestAlgorithm::Md5,
            contents: b"",
            digest: "d41d8cd98f00b204e9800998ecf8427e",
            path: "d/4/1/d/8/c/d/9/d41d8cd98f00b204e9800998ecf8427e",
        },
        GoldenVector {
            name: "sha256 of empty contents",
            algorithm: DigestAlgorithm::Sha256,
            contents: b"",
            digest: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            path: "e/3/b/0/c/4/4/2/e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        },
    ]
}

/// Check every vector, returning the names of those that fail.
pub fn verify_all_vectors() -> Vec<&'static str> {
    all_vectors()
        .into_iter()
        .filter(|v| {
            let file = v.file();
            let checksum = file.checksum().map(|c| c.to_string()).ok();
            let path = file.storage_path().map(|p| p.to_string()).ok();
            checksum.as_deref() != Some(v.checksum().as_str()) || path.as_deref() != Some(v.path)
        })
        .map(|v| v.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_pass() {
        assert!(verify_all_vectors().is_empty(), "failed: {:?}", verify_all_vectors());
    }

    #[test]
    fn test_vector_names() {
        for v in all_vectors() {
            let file = v.file();
            assert_eq!(file.name().unwrap(), v.name_for_lookup());
            assert_eq!(file.checksum_type(), v.algorithm);
        }
    }
}
