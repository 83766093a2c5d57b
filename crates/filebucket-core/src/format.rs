//! Wire formats for bucket files.
//!
//! Two formats are supported, selected by [`Format`]:
//!
//! - **Compact** (default): a small CBOR map `{0: version, 1: contents}`.
//!   Opaque; the only promise is that decoding returns the same contents.
//! - **Structured**: JSON `{"contents": "<text>"}` with exactly one key.
//!   Deprecated in both directions. Every encode and decode reports a notice
//!   to a [`DeprecationObserver`] and then does the work anyway.
//!
//! Neither format carries a checksum. The receiving side always recomputes
//! it from the contents.

use std::fmt;
use std::str::FromStr;

use ciborium::value::Value as Cbor;
use serde::Serialize;
use serde_json::Value as Json;
use tracing::warn;

use crate::checksum::ChecksumComputer;
use crate::error::{CoreError, Result, ValidationError};
use crate::file::{BucketFile, FileOptions};

/// Notice reported when encoding to the structured format.
pub const STRUCTURED_ENCODE_DEPRECATION: &str =
    "Serializing bucket files to the structured format is deprecated.";

/// Notice reported when decoding from the structured format.
pub const STRUCTURED_DECODE_DEPRECATION: &str =
    "Deserializing bucket files from the structured format is deprecated. Upgrade to a newer version.";

/// The single key of the structured format.
pub const CONTENTS_KEY: &str = "contents";

/// Receives deprecation notices.
pub trait DeprecationObserver: Send + Sync {
    fn deprecated(&self, message: &str);
}

/// Reports deprecations as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDeprecations;

impl DeprecationObserver for TracingDeprecations {
    fn deprecated(&self, message: &str) {
        warn!(target: "filebucket::deprecation", "{}", message);
    }
}

/// Supported wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    #[default]
    Compact,
    Structured,
}

impl Format {
    /// Every supported format, default first.
    pub const fn supported() -> [Format; 2] {
        [Format::Compact, Format::Structured]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Format::Compact => "compact",
            Format::Structured => "structured",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Format::supported()
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| CoreError::Decoding(format!("unsupported format: {}", s)))
    }
}

/// Encode `file` in the given format.
pub fn render(file: &BucketFile, format: Format, observer: &dyn DeprecationObserver) -> Result<Vec<u8>> {
    match format {
        Format::Compact => compact::encode(file),
        Format::Structured => structured::encode(file, observer).map(String::into_bytes),
    }
}

/// Decode a file from `data` in the given format.
pub fn convert_from(
    format: Format,
    data: &[u8],
    computer: ChecksumComputer,
    observer: &dyn DeprecationObserver,
) -> Result<BucketFile> {
    match format {
        Format::Compact => compact::decode(data, computer),
        Format::Structured => structured::decode(data, computer, observer),
    }
}

/// The CBOR encoding.
pub mod compact {
    use super::*;

    const VERSION: u64 = 1;

    mod keys {
        pub const VERSION: u64 = 0;
        pub const CONTENTS: u64 = 1;
    }

    pub fn encode(file: &BucketFile) -> Result<Vec<u8>> {
        let value = Cbor::Map(vec![
            (Cbor::Integer(keys::VERSION.into()), Cbor::Integer(VERSION.into())),
            (
                Cbor::Integer(keys::CONTENTS.into()),
                Cbor::Bytes(file.contents().to_vec()),
            ),
        ]);

        let mut buf = Vec::with_capacity(file.contents().len() + 8);
        ciborium::ser::into_writer(&value, &mut buf)
            .map_err(|e| CoreError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    pub fn decode(data: &[u8], computer: ChecksumComputer) -> Result<BucketFile> {
        let value: Cbor =
            ciborium::de::from_reader(data).map_err(|e| CoreError::Decoding(e.to_string()))?;

        let Cbor::Map(entries) = value else {
            return Err(CoreError::Decoding("expected a map".into()));
        };

        let mut version = None;
        let mut contents = None;
        for (key, value) in entries {
            let key = match key {
                Cbor::Integer(i) => i128::from(i),
                _ => return Err(CoreError::Decoding("non-integer key".into())),
            };
            match (key, value) {
                (k, Cbor::Integer(v)) if k == keys::VERSION as i128 => version = Some(i128::from(v)),
                (k, Cbor::Bytes(b)) if k == keys::CONTENTS as i128 => contents = Some(b),
                (k, _) => return Err(CoreError::Decoding(format!("unexpected field {}", k))),
            }
        }

        match version {
            Some(v) if v == VERSION as i128 => {}
            Some(v) => return Err(CoreError::Decoding(format!("unsupported version {}", v))),
            None => return Err(CoreError::Decoding("missing version".into())),
        }
        let contents = contents.ok_or_else(|| CoreError::Decoding("missing contents".into()))?;

        Ok(BucketFile::new(contents, computer))
    }
}

/// The deprecated JSON encoding.
pub mod structured {
    use super::*;

    #[derive(Serialize)]
    struct Structured<'a> {
        contents: &'a str,
    }

    /// Encode as `{"contents":"..."}`. The contents must be UTF-8.
    pub fn encode(file: &BucketFile, observer: &dyn DeprecationObserver) -> Result<String> {
        observer.deprecated(STRUCTURED_ENCODE_DEPRECATION);

        let contents = file
            .contents_str()
            .ok_or_else(|| CoreError::Encoding("contents are not valid UTF-8".into()))?;
        serde_json::to_string(&Structured { contents }).map_err(|e| CoreError::Encoding(e.to_string()))
    }

    pub fn decode(
        data: &[u8],
        computer: ChecksumComputer,
        observer: &dyn DeprecationObserver,
    ) -> Result<BucketFile> {
        let value: Json = match serde_json::from_slice(data) {
            Ok(value) => value,
            Err(e) => {
                observer.deprecated(STRUCTURED_DECODE_DEPRECATION);
                return Err(CoreError::Decoding(e.to_string()));
            }
        };
        decode_value(&value, computer, observer)
    }

    /// Decode from an already-parsed JSON value.
    pub fn decode_value(
        value: &Json,
        computer: ChecksumComputer,
        observer: &dyn DeprecationObserver,
    ) -> Result<BucketFile> {
        observer.deprecated(STRUCTURED_DECODE_DEPRECATION);

        let Json::Object(map) = value else {
            return Err(CoreError::Decoding("expected an object".into()));
        };

        let unknown: Vec<String> = map.keys().filter(|k| *k != CONTENTS_KEY).cloned().collect();
        if !unknown.is_empty() {
            return Err(ValidationError::UnknownKeys(unknown).into());
        }

        let contents = map
            .get(CONTENTS_KEY)
            .ok_or(ValidationError::MissingKey(CONTENTS_KEY))?;
        Ok(BucketFile::from_value(contents, computer, FileOptions::default())?)
    }
}
