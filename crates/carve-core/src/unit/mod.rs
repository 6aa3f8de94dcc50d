//! Unit model: extracted units and their provenance
//!
//! An [`ExtractedUnit`] is the only thing this crate hands to downstream
//! record builders. Its `raw_text` is the exact original lines of the span
//! joined by `\n`; whitespace normalization happens downstream.

mod adapter;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::scanner::Language;

pub use adapter::{UnitContext, build_unit, slice_lines};

/// Granularity of an extracted unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    File,
    Class,
    Function,
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::File => "file",
            Self::Class => "class",
            Self::Function => "function",
        };
        write!(f, "{s}")
    }
}

impl FromStr for UnitKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "class" => Ok(Self::Class),
            "function" => Ok(Self::Function),
            _ => Err(ConfigError::UnknownUnitKind(s.to_string())),
        }
    }
}

/// Authority tag supplied by the caller and copied onto every unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    Normative,
    ApprovedInterpretation,
    #[default]
    Informative,
    Unverified,
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Normative => "normative",
            Self::ApprovedInterpretation => "approved_interpretation",
            Self::Informative => "informative",
            Self::Unverified => "unverified",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Authority {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normative" => Ok(Self::Normative),
            "approved_interpretation" => Ok(Self::ApprovedInterpretation),
            "informative" => Ok(Self::Informative),
            "unverified" => Ok(Self::Unverified),
            _ => Err(ConfigError::UnknownAuthority(s.to_string())),
        }
    }
}

/// Kind of source a unit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Code,
}

/// Where a unit came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Root-relative path of the file
    pub path: String,
    pub language: Language,
    #[serde(rename = "unit")]
    pub unit_kind: UnitKind,
    /// Symbol name; the file name for file units
    pub symbol: String,
    /// First line (1-indexed, inclusive)
    pub line_start: usize,
    /// Last line (1-indexed, inclusive)
    pub line_end: usize,
    /// SHA-256 of the file's raw bytes
    #[serde(rename = "sha256_of_file")]
    pub file_checksum: String,
}

/// A located unit wrapped with its text and provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedUnit {
    #[serde(rename = "text_raw")]
    pub raw_text: String,
    #[serde(rename = "source_type")]
    pub source_kind: SourceKind,
    pub source_path: String,
    pub authority: Authority,
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests;
