//! Content loader: reads a file, fingerprints it and decodes it to text
//!
//! The checksum is taken over the raw bytes before any decoding, so it only
//! changes when the file content changes. Decoding tries the preferred
//! encoding, then BOM-aware UTF-8, then Latin-1, which accepts every byte.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::ConfigError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Name reported for ISO-8859-1 decoding
const LATIN1: &str = "latin-1";

/// Errors that can occur while loading a source file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Decoded file content plus its checksum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub text: String,
    /// SHA-256 of the raw bytes, lowercase hex
    pub checksum: String,
    /// Name of the decoding step that succeeded
    pub decoded_with: &'static str,
}

/// First encoding a [`Decoder`] tries
#[derive(Debug, Clone, Copy)]
enum Preferred {
    Whatwg(&'static Encoding),
    /// True ISO-8859-1; the WHATWG `latin1` label means windows-1252
    Latin1,
}

/// Labels decoded as ISO-8859-1 rather than through the WHATWG table
const LATIN1_LABELS: &[&str] = &[
    "latin-1",
    "latin_1",
    "latin1",
    "l1",
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso-8859_1",
    "cp819",
];

/// Ordered decoding fallback chain
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    preferred: Preferred,
}

impl Decoder {
    /// Create a decoder whose first attempt is the encoding named by `label`
    ///
    /// Labels follow the WHATWG encoding names (`utf-8`, `shift_jis`,
    /// `windows-1252`, ...), plus `utf-8-sig`. The `latin-1` and
    /// `iso-8859-1` families decode every byte to the code point of the
    /// same value.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownEncoding`] for an unrecognized label.
    pub fn for_label(label: &str) -> Result<Self, ConfigError> {
        let normalized = label.trim().to_lowercase();
        if LATIN1_LABELS.contains(&normalized.as_str()) {
            return Ok(Self {
                preferred: Preferred::Latin1,
            });
        }
        let lookup = match normalized.as_str() {
            "utf-8-sig" | "utf_8_sig" | "utf8" | "utf_8" => "utf-8",
            other => other,
        };
        Encoding::for_label(lookup.as_bytes())
            .map(|encoding| Self {
                preferred: Preferred::Whatwg(encoding),
            })
            .ok_or_else(|| ConfigError::UnknownEncoding(label.to_string()))
    }

    /// Name of the preferred encoding
    #[must_use]
    pub fn preferred_name(&self) -> &'static str {
        match self.preferred {
            Preferred::Whatwg(encoding) => encoding.name(),
            Preferred::Latin1 => LATIN1,
        }
    }

    /// Decode bytes; never fails
    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> (String, &'static str) {
        let encoding = match self.preferred {
            Preferred::Latin1 => return (decode_latin1(bytes).into_owned(), LATIN1),
            Preferred::Whatwg(encoding) => encoding,
        };
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            return (text.into_owned(), encoding.name());
        }
        if let Ok(text) = std::str::from_utf8(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)) {
            return (text.to_string(), "utf-8-sig");
        }
        (decode_latin1(bytes).into_owned(), LATIN1)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            preferred: Preferred::Whatwg(encoding_rs::UTF_8),
        }
    }
}

/// ISO-8859-1: every byte maps to the code point of the same value
fn decode_latin1(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) if text.is_ascii() => Cow::Borrowed(text),
        _ => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Compute the SHA-256 hex digest of raw bytes
#[must_use]
pub fn compute_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Read `path`, checksum the raw bytes and decode them
///
/// # Errors
/// Returns [`LoadError::Io`] if the file cannot be read.
pub fn load_source(path: &Path, decoder: &Decoder) -> Result<SourceText, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let checksum = compute_checksum(&bytes);
    let (text, decoded_with) = decoder.decode(&bytes);
    Ok(SourceText {
        text,
        checksum,
        decoded_with,
    })
}
