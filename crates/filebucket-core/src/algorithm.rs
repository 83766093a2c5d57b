//! Digest algorithms and the checksums they produce.
//!
//! A [`Checksum`] is rendered as `{algorithm}digest` and a bucket name as
//! `algorithm/digest`. Both are parsed strictly: lowercase hex only, and the
//! digest length must match the algorithm.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The fixed set of digest algorithms a bucket may be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Every allowed algorithm, in declaration order.
    pub const ALL: [DigestAlgorithm; 3] = [Self::Md5, Self::Sha1, Self::Sha256];

    /// The configuration / wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    /// Length of the lowercase hex digest.
    pub const fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }

    /// Look up an algorithm by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ValidationError::MalformedChecksum(s.to_string()))
    }
}

/// An algorithm paired with the lowercase hex digest it produced.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checksum {
    algorithm: DigestAlgorithm,
    digest: String,
}

impl Checksum {
    /// Build a checksum, validating the digest against the algorithm.
    pub fn new(algorithm: DigestAlgorithm, digest: impl Into<String>) -> Result<Self, ValidationError> {
        let digest = digest.into();
        if !is_digest_for(algorithm, &digest) {
            return Err(ValidationError::MalformedChecksum(format!(
                "{{{}}}{}",
                algorithm, digest
            )));
        }
        Ok(Self { algorithm, digest })
    }

    /// Build a checksum from raw digest bytes.
    pub fn from_digest_bytes(
        algorithm: DigestAlgorithm,
        bytes: &[u8],
    ) -> Result<Self, ValidationError> {
        Self::new(algorithm, hex::encode(bytes))
    }

    /// Parse the `{algorithm}digest` form.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedChecksum(s.to_string());

        let rest = s.strip_prefix('{').ok_or_else(malformed)?;
        let (name, digest) = rest.split_once('}').ok_or_else(malformed)?;
        let algorithm = DigestAlgorithm::from_name(name).ok_or_else(malformed)?;

        Self::new(algorithm, digest).map_err(|_| malformed())
    }

    /// Parse the `algorithm/digest` bucket name form.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedName(name.to_string());

        let (algorithm, digest) = name.split_once('/').ok_or_else(malformed)?;
        let algorithm = DigestAlgorithm::from_name(algorithm).ok_or_else(malformed)?;

        Self::new(algorithm, digest).map_err(|_| malformed())
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The hex digest without the algorithm tag.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// The url-safe `algorithm/digest` name.
    pub fn to_name(&self) -> String {
        format!("{}/{}", self.algorithm, self.digest)
    }
}

fn is_digest_for(algorithm: DigestAlgorithm, digest: &str) -> bool {
    digest.len() == algorithm.hex_len()
        && digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.algorithm, self.digest)
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self)
    }
}

impl FromStr for Checksum {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
