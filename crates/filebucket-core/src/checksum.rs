//! Checksum computation over a resolved algorithm list.

use std::fmt;
use std::sync::Arc;

use crate::algorithm::{Checksum, DigestAlgorithm};
use crate::digest::{DigestProvider, RustCryptoDigests};
use crate::error::DigestError;
use crate::policy::AlgorithmList;

/// Computes checksums with a provider and a resolved algorithm list.
///
/// Cheap to clone; the provider is shared. The list is fixed for the
/// lifetime of the computer, so demotions made at resolution never change.
#[derive(Clone)]
pub struct ChecksumComputer {
    provider: Arc<dyn DigestProvider>,
    algorithms: AlgorithmList,
}

impl ChecksumComputer {
    pub fn new(provider: Arc<dyn DigestProvider>, algorithms: AlgorithmList) -> Self {
        Self {
            provider,
            algorithms,
        }
    }

    /// A computer using the RustCrypto digests.
    pub fn with_algorithms(algorithms: AlgorithmList) -> Self {
        Self::new(Arc::new(RustCryptoDigests), algorithms)
    }

    pub fn algorithms(&self) -> &AlgorithmList {
        &self.algorithms
    }

    /// The algorithm embedded in checksums from [`compute`](Self::compute).
    pub fn primary(&self) -> DigestAlgorithm {
        self.algorithms.primary()
    }

    /// Checksum `content` with the primary algorithm.
    pub fn compute(&self, content: &[u8]) -> Result<Checksum, DigestError> {
        self.compute_with(self.primary(), content)
    }

    /// Checksum `content` once per configured algorithm, in list order.
    pub fn compute_all(&self, content: &[u8]) -> Result<Vec<Checksum>, DigestError> {
        self.algorithms
            .iter()
            .map(|algorithm| self.compute_with(algorithm, content))
            .collect()
    }

    /// Checksum `content` with a specific algorithm, configured or not.
    ///
    /// Algorithms that failed their probe are refused without calling the
    /// provider.
    pub fn compute_with(
        &self,
        algorithm: DigestAlgorithm,
        content: &[u8],
    ) -> Result<Checksum, DigestError> {
        if !self.algorithms.is_usable(algorithm) {
            return Err(DigestError::new(algorithm, "not usable on this host"));
        }
        let hex = self.provider.hex_digest(algorithm, content)?;
        Checksum::new(algorithm, hex).map_err(|e| DigestError::new(algorithm, e.to_string()))
    }
}

impl fmt::Debug for ChecksumComputer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksumComputer")
            .field("algorithms", &self.algorithms)
            .finish_non_exhaustive()
    }
}
