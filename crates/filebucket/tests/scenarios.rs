//! End-to-end behavior of the bucket: configuration, files, formats, storage.

use std::io;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use filebucket::core::{
    convert_from, render, ChecksumComputer, ConfigError, CoreError, TracingDeprecations,
    ValidationError,
};
use filebucket::{
    BucketConfig, BucketError, BucketFile, Checksum, DigestAlgorithm, DirectoryBackend,
    FileBucket, FileOptions, Format, MemoryBackend, SaveMetadata,
};
use filebucket_testkit::{DirectoryFixture, FailingDigests, TestFixture, SAMPLE_CONTENTS};
use proptest::prelude::*;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn output(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

/// Run `f` with WARN-level logs captured.
fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    let value = tracing::subscriber::with_default(subscriber, f);
    (value, capture.output())
}

fn config_error(algorithms: &str) -> ConfigError {
    let config = BucketConfig::default().with_digest_algorithms(algorithms);
    match FileBucket::new(MemoryBackend::new(), &config) {
        Err(BucketError::Config(e)) => e,
        Err(other) => panic!("expected a configuration error, got {other}"),
        Ok(_) => panic!("expected {algorithms:?} to be rejected"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unusable_settings_fail_at_startup() {
    assert_eq!(config_error(""), ConfigError::EmptyAlgorithmList);
    assert_eq!(config_error(","), ConfigError::EmptyAlgorithmList);
    assert_eq!(
        config_error("flarble"),
        ConfigError::UnknownAlgorithms(vec!["flarble".into()])
    );
    assert_eq!(
        config_error("md5, flarble, sha512"),
        ConfigError::UnknownAlgorithms(vec!["flarble".into(), "sha512".into()])
    );
}

#[test]
fn test_every_algorithm_refused_is_fatal() {
    let config = BucketConfig::default().with_digest_algorithms("md5, sha1");
    let policy = FailingDigests::refusing([DigestAlgorithm::Md5, DigestAlgorithm::Sha1]).policy();

    let result = FileBucket::with_policy(MemoryBackend::new(), &config, &policy);
    assert!(matches!(
        result,
        Err(BucketError::Config(ConfigError::NoWorkableAlgorithms))
    ));
}

#[test]
fn test_fips_host_falls_back_with_warning() -> Result<()> {
    let (fixture, logs) = capture_warnings(|| {
        TestFixture::with_policy("md5, sha256", &FailingDigests::fips().policy())
    });

    assert!(logs.contains("digest algorithm md5 fails; not using it"));
    assert_eq!(fixture.bucket.algorithms().primary(), DigestAlgorithm::Sha256);

    let file = fixture.bucket.file(SAMPLE_CONTENTS);
    assert_eq!(file.checksum_type(), DigestAlgorithm::Sha256);
    assert_eq!(
        file.checksum()?.to_string(),
        "{sha256}7152323bbca95871b2090190e80a02e05d7f164df9c4c3f543f6ff63dd817523"
    );
    Ok(())
}

#[test]
fn test_config_from_json() -> Result<()> {
    let config: BucketConfig = serde_json::from_str(r#"{"digest_algorithms": "sha256"}"#)?;
    assert_eq!(config.bucket_dir, None);

    let bucket = FileBucket::new(MemoryBackend::new(), &config)?;
    assert_eq!(bucket.algorithms().as_slice(), &[DigestAlgorithm::Sha256]);

    let defaults: BucketConfig = serde_json::from_str("{}")?;
    assert_eq!(defaults, BucketConfig::default());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Files
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_md5_file_identity() -> Result<()> {
    let fixture = TestFixture::with_algorithms("md5");
    let file = fixture.bucket.file(SAMPLE_CONTENTS);

    assert_eq!(file.checksum_type(), DigestAlgorithm::Md5);
    assert_eq!(file.checksum()?.to_string(), "{md5}8b3702ad1aed1ace7e32bde76ffffb2d");
    assert_eq!(file.checksum_data()?, "8b3702ad1aed1ace7e32bde76ffffb2d");
    assert_eq!(file.name()?, "md5/8b3702ad1aed1ace7e32bde76ffffb2d");
    assert_eq!(
        file.storage_path()?.to_string(),
        "8/b/3/7/0/2/a/d/8b3702ad1aed1ace7e32bde76ffffb2d"
    );
    Ok(())
}

#[test]
fn test_primary_is_first_configured() -> Result<()> {
    let fixture = TestFixture::with_algorithms("sha1, sha256");
    let file = fixture.bucket.file(SAMPLE_CONTENTS);

    assert_eq!(file.checksum_type(), DigestAlgorithm::Sha1);
    assert_eq!(file.checksum()?.to_string(), "{sha1}8b1ab916151c0e1c2fedd3380e1d5c427e7d3924");
    Ok(())
}

#[test]
fn test_non_string_contents_rejected() {
    let fixture = TestFixture::with_algorithms("md5");
    let computer = fixture.bucket.computer().clone();

    let err = BucketFile::from_value(&serde_json::json!(5), computer, FileOptions::new())
        .unwrap_err();
    assert_eq!(err, ValidationError::InvalidContents { got: "a number" });
    assert_eq!(err.to_string(), "contents must be a string, got a number");
}

#[test]
fn test_unknown_option_rejected() {
    let err = FileOptions::from_pairs([("crazy_option", "should not be valid")]).unwrap_err();
    assert_eq!(err, ValidationError::UnknownOptions(vec!["crazy_option".into()]));
}

#[test]
fn test_override_checksum_option() -> Result<()> {
    let fixture = TestFixture::with_algorithms("md5");
    let options = FileOptions::from_pairs([(
        "override_checksum",
        "{sha256}7152323bbca95871b2090190e80a02e05d7f164df9c4c3f543f6ff63dd817523",
    )])?;
    let file = fixture.bucket.file_with_options(SAMPLE_CONTENTS, options);

    assert_eq!(file.checksum_type(), DigestAlgorithm::Sha256);
    assert!(file.is_overridden());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Formats
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compact_round_trip_keeps_checksum() -> Result<()> {
    let fixture = TestFixture::with_algorithms("md5");
    let file = fixture.bucket.file(SAMPLE_CONTENTS);

    let (decoded, logs) = capture_warnings(|| -> Result<BucketFile> {
        let bytes = render(&file, Format::Compact, &TracingDeprecations)?;
        Ok(convert_from(
            Format::Compact,
            &bytes,
            fixture.bucket.computer().clone(),
            &TracingDeprecations,
        )?)
    });
    let decoded = decoded?;

    assert_eq!(decoded.contents(), SAMPLE_CONTENTS);
    assert_eq!(decoded.checksum()?, file.checksum()?);
    assert!(logs.is_empty());
    Ok(())
}

#[test]
fn test_structured_round_trip_warns() -> Result<()> {
    let fixture = TestFixture::with_algorithms("md5");
    let file = fixture.bucket.file(SAMPLE_CONTENTS);

    let (decoded, logs) = capture_warnings(|| -> Result<BucketFile> {
        let text = render(&file, Format::Structured, &TracingDeprecations)?;
        assert_eq!(text, br#"{"contents":"file\r\n contents"}"#);
        Ok(convert_from(
            Format::Structured,
            &text,
            fixture.bucket.computer().clone(),
            &TracingDeprecations,
        )?)
    });
    let decoded = decoded?;

    assert_eq!(decoded.checksum()?, file.checksum()?);
    assert!(logs.contains("Serializing bucket files to the structured format is deprecated."));
    assert!(logs.contains(
        "Deserializing bucket files from the structured format is deprecated. Upgrade to a newer version."
    ));
    Ok(())
}

#[test]
fn test_structured_non_string_contents() {
    let computer = ChecksumComputer::with_algorithms(
        filebucket::core::AlgorithmList::single(DigestAlgorithm::Md5),
    );
    let result = convert_from(
        Format::Structured,
        br#"{"contents":5}"#,
        computer,
        &TracingDeprecations,
    );

    assert!(matches!(
        result,
        Err(CoreError::Validation(ValidationError::InvalidContents { .. }))
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Storage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_find_before_save_is_none() -> Result<()> {
    let fixture = TestFixture::with_algorithms("md5");
    assert!(fixture
        .bucket
        .find("md5/8b3702ad1aed1ace7e32bde76ffffb2d")?
        .is_none());
    Ok(())
}

#[test]
fn test_save_then_find_by_secondary() -> Result<()> {
    let fixture = TestFixture::with_algorithms("sha1, sha256");
    let file = fixture.bucket.file(SAMPLE_CONTENTS);
    fixture.bucket.save(&file, &SaveMetadata::new())?;

    let name = "sha256/7152323bbca95871b2090190e80a02e05d7f164df9c4c3f543f6ff63dd817523";
    assert!(fixture.bucket.exists(name)?);

    let found = fixture.bucket.find(name)?.expect("saved under sha256");
    assert_eq!(found.checksum_type(), DigestAlgorithm::Sha256);
    assert_eq!(found.name()?, name);
    Ok(())
}

#[test]
fn test_fips_host_refuses_md5_lookups() -> Result<()> {
    let shared = DirectoryFixture::with_algorithms("md5, sha256");
    shared
        .bucket
        .save(&shared.bucket.file(SAMPLE_CONTENTS), &SaveMetadata::new())?;

    let config = BucketConfig::default().with_digest_algorithms("md5, sha256");
    let fips = FileBucket::with_policy(
        DirectoryBackend::open(shared.dir.path())?,
        &config,
        &FailingDigests::fips().panicking().policy(),
    )?;

    let result = fips.find("md5/8b3702ad1aed1ace7e32bde76ffffb2d");
    assert!(matches!(
        result,
        Err(BucketError::UnusableAlgorithm(DigestAlgorithm::Md5))
    ));

    // The same contents are still reachable through an algorithm this host runs.
    let found = fips
        .find("sha256/7152323bbca95871b2090190e80a02e05d7f164df9c4c3f543f6ff63dd817523")?
        .expect("saved under sha256");
    assert_eq!(found.contents(), SAMPLE_CONTENTS);
    Ok(())
}

#[test]
fn test_fips_host_refuses_md5_override() -> Result<()> {
    let fixture =
        TestFixture::with_policy("md5, sha256", &FailingDigests::fips().panicking().policy());
    let claimed = Checksum::parse("{md5}8b3702ad1aed1ace7e32bde76ffffb2d")?;
    let file = fixture
        .bucket
        .file_with_options(SAMPLE_CONTENTS, FileOptions::new().override_checksum(claimed));

    let result = fixture.bucket.save(&file, &SaveMetadata::new());
    assert!(matches!(
        result,
        Err(BucketError::UnusableAlgorithm(DigestAlgorithm::Md5))
    ));
    assert!(fixture.backend().is_empty()?);
    Ok(())
}

#[test]
fn test_fips_host_refuses_unconfigured_algorithm() -> Result<()> {
    let policy = FailingDigests::refusing([DigestAlgorithm::Sha1]).panicking().policy();
    let fixture = TestFixture::with_policy("sha256", &policy);

    let result = fixture.bucket.find("sha1/8b1ab916151c0e1c2fedd3380e1d5c427e7d3924");
    assert!(matches!(
        result,
        Err(BucketError::UnusableAlgorithm(DigestAlgorithm::Sha1))
    ));
    Ok(())
}

proptest! {
    #[test]
    fn test_save_then_find_any_contents(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let fixture = TestFixture::with_algorithms("md5, sha1, sha256");
        let file = fixture.bucket.file(data.clone());
        let report = fixture.bucket.save(&file, &SaveMetadata::new()).unwrap();
        prop_assert_eq!(report.copies.len(), 3);

        for copy in &report.copies {
            let found = fixture.bucket.find(&copy.checksum.to_name()).unwrap().unwrap();
            prop_assert_eq!(found.contents(), data.as_slice());
            prop_assert_eq!(found.checksum().unwrap(), &copy.checksum);
        }
    }
}
