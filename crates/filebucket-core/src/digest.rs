//! Digest implementations behind a provider trait.
//!
//! Which algorithms actually work depends on the host: FIPS-restricted
//! environments refuse MD5 at runtime. The policy probes a provider once at
//! startup instead of scattering availability checks through hashing.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::algorithm::DigestAlgorithm;
use crate::error::DigestError;

/// A source of hex digests for the allowed algorithms.
pub trait DigestProvider: Send + Sync {
    /// Compute the lowercase hex digest of `data`.
    fn hex_digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> Result<String, DigestError>;
}

/// Pure-Rust digests from the RustCrypto crates. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoDigests;

impl DigestProvider for RustCryptoDigests {
    fn hex_digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> Result<String, DigestError> {
        let hex = match algorithm {
            DigestAlgorithm::Md5 => hex::encode(Md5::digest(data)),
            DigestAlgorithm::Sha1 => hex::encode(Sha1::digest(data)),
            DigestAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        };
        Ok(hex)
    }
}
