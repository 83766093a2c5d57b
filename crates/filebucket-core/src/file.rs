//! The bucket file: an immutable piece of content addressed by checksum.
//!
//! A [`BucketFile`] owns its bytes and computes its checksum on first use,
//! caching it for every later read. It performs no I/O; saving and finding
//! are the business of a storage backend.
//!
//! Contents cannot be replaced once a file exists:
//!
//! ```compile_fail
//! use filebucket_core::{AlgorithmList, BucketFile, ChecksumComputer, DigestAlgorithm};
//!
//! let computer = ChecksumComputer::with_algorithms(AlgorithmList::single(DigestAlgorithm::Md5));
//! let mut file = BucketFile::new("first", computer);
//! file.contents = "new".into();
//! ```

use std::fmt;
use std::sync::OnceLock;

use bytes::Bytes;
use serde_json::Value;

use crate::address::StoragePath;
use crate::algorithm::{Checksum, DigestAlgorithm};
use crate::checksum::ChecksumComputer;
use crate::error::{DigestError, ValidationError};

/// Name of the only recognized construction option.
pub const OVERRIDE_CHECKSUM: &str = "override_checksum";

/// Construction options for a [`BucketFile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOptions {
    override_checksum: Option<Checksum>,
}

impl FileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the file by `checksum` instead of its computed checksum.
    ///
    /// The contents are still hashed independently when the file is saved.
    pub fn override_checksum(mut self, checksum: Checksum) -> Self {
        self.override_checksum = Some(checksum);
        self
    }

    /// Build options from loosely-typed key/value pairs.
    ///
    /// Every unrecognized key is reported in a single error.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, ValidationError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut override_checksum = None;
        let mut unknown = Vec::new();

        for (key, value) in pairs {
            match key.as_ref() {
                OVERRIDE_CHECKSUM => override_checksum = Some(value.as_ref().to_string()),
                other => unknown.push(other.to_string()),
            }
        }

        // Unknown keys are reported before any value is parsed.
        if !unknown.is_empty() {
            return Err(ValidationError::UnknownOptions(unknown));
        }
        Ok(Self {
            override_checksum: override_checksum.as_deref().map(Checksum::parse).transpose()?,
        })
    }
}

/// An immutable, content-addressed file.
#[derive(Clone)]
pub struct BucketFile {
    contents: Bytes,
    computer: ChecksumComputer,
    override_checksum: Option<Checksum>,
    checksum: OnceLock<Checksum>,
}

impl BucketFile {
    /// Create a file whose checksum will be computed from `contents`.
    pub fn new(contents: impl Into<Bytes>, computer: ChecksumComputer) -> Self {
        Self::with_options(contents, computer, FileOptions::default())
    }

    pub fn with_options(
        contents: impl Into<Bytes>,
        computer: ChecksumComputer,
        options: FileOptions,
    ) -> Self {
        Self {
            contents: contents.into(),
            computer,
            override_checksum: options.override_checksum,
            checksum: OnceLock::new(),
        }
    }

    /// Create a file from a dynamically-typed value, which must be a string.
    pub fn from_value(
        value: &Value,
        computer: ChecksumComputer,
        options: FileOptions,
    ) -> Result<Self, ValidationError> {
        match value {
            Value::String(s) => Ok(Self::with_options(s.clone(), computer, options)),
            other => Err(ValidationError::InvalidContents {
                got: json_type_name(other),
            }),
        }
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// The contents as a cheaply-cloneable buffer.
    pub fn bytes(&self) -> &Bytes {
        &self.contents
    }

    /// The contents as text, if they are valid UTF-8.
    pub fn contents_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }

    pub fn computer(&self) -> &ChecksumComputer {
        &self.computer
    }

    /// Whether the checksum was supplied by the caller.
    pub fn is_overridden(&self) -> bool {
        self.override_checksum.is_some()
    }

    /// The file's checksum, `{algorithm}digest`.
    ///
    /// Computed with the primary algorithm on first call and cached.
    /// Concurrent first calls may both compute; one value wins and every
    /// caller sees it.
    pub fn checksum(&self) -> Result<&Checksum, DigestError> {
        if let Some(checksum) = &self.override_checksum {
            return Ok(checksum);
        }
        if let Some(checksum) = self.checksum.get() {
            return Ok(checksum);
        }
        let computed = self.computer.compute(&self.contents)?;
        Ok(self.checksum.get_or_init(|| computed))
    }

    /// The checksum algorithm. Defaults to the primary configured algorithm.
    pub fn checksum_type(&self) -> DigestAlgorithm {
        match &self.override_checksum {
            Some(checksum) => checksum.algorithm(),
            None => self.computer.primary(),
        }
    }

    /// The hex digest portion of the checksum.
    pub fn checksum_data(&self) -> Result<&str, DigestError> {
        Ok(self.checksum()?.digest())
    }

    /// The url-safe `algorithm/digest` name used for lookups.
    pub fn name(&self) -> Result<String, DigestError> {
        Ok(self.checksum()?.to_name())
    }

    /// Where this file lives relative to a bucket root.
    pub fn storage_path(&self) -> Result<StoragePath, DigestError> {
        Ok(StoragePath::for_checksum(self.checksum()?))
    }
}

impl PartialEq for BucketFile {
    fn eq(&self, other: &Self) -> bool {
        self.contents == other.contents && self.override_checksum == other.override_checksum
    }
}

impl Eq for BucketFile {}

impl fmt::Debug for BucketFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketFile")
            .field("len", &self.contents.len())
            .field("checksum", &self.override_checksum.as_ref().or(self.checksum.get()))
            .finish()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
