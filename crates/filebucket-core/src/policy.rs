//! Digest algorithm policy: turns the configured algorithm list into the
//! ordered set of algorithms this process will actually use.
//!
//! Resolution happens once, at configuration load:
//!
//! 1. Split the value on `,` and trim whitespace around each name.
//! 2. Reject unknown names, all of them in one error, before probing.
//! 3. Probe each algorithm by digesting a fixed string. An algorithm whose
//!    probe errors or panics is dropped with a warning.
//! 4. Fail if nothing survives.
//!
//! Allowed algorithms that were not configured are probed too. The resolved
//! list records every failure, and checksum computation refuses those
//! algorithms instead of calling the provider again.
//!
//! The surviving list keeps the configured order; its first entry is the
//! primary algorithm.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::algorithm::DigestAlgorithm;
use crate::digest::{DigestProvider, RustCryptoDigests};
use crate::error::ConfigError;

/// Input digested when probing an algorithm.
pub const PROBE_INPUT: &[u8] = b"test digest string";

/// A non-empty, duplicate-free, ordered list of digest algorithms.
///
/// A list produced by [`DigestPolicy::resolve`] also remembers which allowed
/// algorithms failed their probe, so nothing downstream calls them again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlgorithmList {
    algorithms: Vec<DigestAlgorithm>,
    unusable: Vec<DigestAlgorithm>,
}

impl AlgorithmList {
    /// Build a list, dropping repeated entries after their first occurrence.
    pub fn new(algorithms: impl IntoIterator<Item = DigestAlgorithm>) -> Result<Self, ConfigError> {
        let mut list = Vec::new();
        for algorithm in algorithms {
            if !list.contains(&algorithm) {
                list.push(algorithm);
            }
        }
        if list.is_empty() {
            return Err(ConfigError::EmptyAlgorithmList);
        }
        Ok(Self {
            algorithms: list,
            unusable: Vec::new(),
        })
    }

    /// A single-algorithm list.
    pub fn single(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithms: vec![algorithm],
            unusable: Vec::new(),
        }
    }

    /// Mark algorithms as unusable on this host. Listed entries are removed.
    pub fn with_unusable(
        self,
        unusable: impl IntoIterator<Item = DigestAlgorithm>,
    ) -> Result<Self, ConfigError> {
        let unusable: Vec<DigestAlgorithm> = unusable.into_iter().collect();
        let mut list = Self::new(self.algorithms.into_iter().filter(|a| !unusable.contains(a)))?;
        list.unusable = DigestAlgorithm::ALL
            .into_iter()
            .filter(|a| unusable.contains(a) || self.unusable.contains(a))
            .collect();
        Ok(list)
    }

    /// The primary algorithm (first configured).
    pub fn primary(&self) -> DigestAlgorithm {
        self.algorithms[0]
    }

    pub fn as_slice(&self) -> &[DigestAlgorithm] {
        &self.algorithms
    }

    pub fn iter(&self) -> impl Iterator<Item = DigestAlgorithm> + '_ {
        self.algorithms.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    pub fn contains(&self, algorithm: DigestAlgorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }

    /// Algorithms that failed their probe.
    pub fn unusable(&self) -> &[DigestAlgorithm] {
        &self.unusable
    }

    /// Whether `algorithm` may be handed to the digest provider.
    pub fn is_usable(&self, algorithm: DigestAlgorithm) -> bool {
        !self.unusable.contains(&algorithm)
    }
}

impl fmt::Display for AlgorithmList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.algorithms.iter().map(|a| a.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

/// Parse a configured algorithm list without probing.
///
/// Rejects empty values, empty names, and names outside the allowed set.
pub fn parse_algorithms(value: &str) -> Result<Vec<DigestAlgorithm>, ConfigError> {
    let names: Vec<&str> = value.split(',').map(str::trim).collect();

    if names.iter().all(|n| n.is_empty()) {
        return Err(ConfigError::EmptyAlgorithmList);
    }
    if names.iter().any(|n| n.is_empty()) {
        return Err(ConfigError::EmptyAlgorithmName(value.to_string()));
    }

    let mut unknown: Vec<String> = Vec::new();
    let mut algorithms = Vec::with_capacity(names.len());
    for name in names {
        match DigestAlgorithm::from_name(name) {
            Some(algorithm) => algorithms.push(algorithm),
            None => {
                if !unknown.iter().any(|u| u == name) {
                    unknown.push(name.to_string());
                }
            }
        }
    }

    if !unknown.is_empty() {
        return Err(ConfigError::UnknownAlgorithms(unknown));
    }
    Ok(algorithms)
}

/// Resolves configured algorithm lists against a digest provider.
#[derive(Clone)]
pub struct DigestPolicy {
    provider: Arc<dyn DigestProvider>,
}

impl DigestPolicy {
    /// Create a policy that probes the given provider.
    pub fn new(provider: Arc<dyn DigestProvider>) -> Self {
        Self { provider }
    }

    /// The provider algorithms are probed against.
    pub fn provider(&self) -> &Arc<dyn DigestProvider> {
        &self.provider
    }

    /// Resolve a configured value into the list of usable algorithms.
    ///
    /// Allowed algorithms outside the configured list are probed as well, so
    /// lookups by any algorithm name never reach a provider that refuses it.
    pub fn resolve(&self, value: &str) -> Result<AlgorithmList, ConfigError> {
        let configured = AlgorithmList::new(parse_algorithms(value)?)?;

        let mut unusable = Vec::new();
        for algorithm in configured.iter() {
            if let Err(reason) = self.probe(algorithm) {
                warn!(%algorithm, %reason, "digest algorithm {} fails; not using it", algorithm);
                unusable.push(algorithm);
            }
        }
        for algorithm in DigestAlgorithm::ALL {
            if configured.contains(algorithm) {
                continue;
            }
            if let Err(reason) = self.probe(algorithm) {
                debug!(%algorithm, %reason, "unconfigured digest algorithm fails");
                unusable.push(algorithm);
            }
        }

        let list = configured
            .with_unusable(unusable)
            .map_err(|_| ConfigError::NoWorkableAlgorithms)?;
        info!(algorithms = %list, "resolved digest algorithms");
        Ok(list)
    }

    /// Check that the provider can digest with `algorithm` on this host.
    pub fn probe(&self, algorithm: DigestAlgorithm) -> Result<(), String> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.provider.hex_digest(algorithm, PROBE_INPUT)
        }));

        match outcome {
            Ok(Ok(hex)) if hex.len() == algorithm.hex_len() => Ok(()),
            Ok(Ok(hex)) => Err(format!("unexpected digest length {}", hex.len())),
            Ok(Err(e)) => Err(e.reason),
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

impl Default for DigestPolicy {
    fn default() -> Self {
        Self::new(Arc::new(RustCryptoDigests))
    }
}

impl fmt::Debug for DigestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestPolicy").finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "digest implementation panicked".to_string()
    }
}
