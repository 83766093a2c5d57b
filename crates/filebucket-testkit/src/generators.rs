//! Proptest generators for property-based testing.

use proptest::prelude::*;

use filebucket_core::{AlgorithmList, ChecksumComputer, DigestAlgorithm};

/// Generate a digest algorithm.
pub fn algorithm() -> impl Strategy<Value = DigestAlgorithm> {
    prop_oneof![
        Just(DigestAlgorithm::Md5),
        Just(DigestAlgorithm::Sha1),
        Just(DigestAlgorithm::Sha256),
    ]
}

/// Generate an ordered, duplicate-free algorithm list.
pub fn algorithm_list() -> impl Strategy<Value = AlgorithmList> {
    Just(DigestAlgorithm::ALL.to_vec())
        .prop_shuffle()
        .prop_flat_map(|all| (1..=all.len()).prop_map(move |n| all[..n].to_vec()))
        .prop_map(|algs| AlgorithmList::new(algs).expect("non-empty"))
}

/// Generate file contents of up to `max_len` bytes.
pub fn contents(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate UTF-8 file contents, including control characters.
pub fn text_contents() -> impl Strategy<Value = String> {
    "(?s).{0,256}".prop_map(String::from)
}

/// Parameters for a configured algorithm setting.
#[derive(Debug, Clone)]
pub struct ConfigParams {
    /// The algorithms the setting names, in order.
    pub algorithms: Vec<DigestAlgorithm>,
    /// Whitespace placed around each name.
    pub padding: Vec<(String, String)>,
}

impl ConfigParams {
    /// The setting as it would appear in configuration.
    pub fn render(&self) -> String {
        self.algorithms
            .iter()
            .zip(&self.padding)
            .map(|(alg, (before, after))| format!("{}{}{}", before, alg, after))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Arbitrary for ConfigParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::vec(algorithm(), 1..=5)
            .prop_flat_map(|algorithms| {
                let n = algorithms.len();
                let pad = "[ \t]{0,3}";
                (
                    Just(algorithms),
                    prop::collection::vec((pad, pad), n..=n),
                )
            })
            .prop_map(|(algorithms, padding)| ConfigParams {
                algorithms,
                padding,
            })
            .boxed()
    }
}

/// A computer over the given algorithms using the RustCrypto digests.
pub fn computer(algorithms: AlgorithmList) -> ChecksumComputer {
    ChecksumComputer::with_algorithms(algorithms)
}
