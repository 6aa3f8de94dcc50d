//! Language detection utilities

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Python,
}

/// Structural family a language belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Blocks delimited by `{` and `}`
    Brace,
    /// Blocks delimited by indentation
    Indent,
}

impl Language {
    /// Detect language from file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "c" | "h" => Some(Self::C),
            "cc" | "cpp" | "cxx" | "hpp" | "hh" => Some(Self::Cpp),
            "py" => Some(Self::Python),
            _ => None,
        }
    }

    /// Detect language from file path
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get the file extensions for this language
    #[must_use]
    pub const fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::C => &["c", "h"],
            Self::Cpp => &["cc", "cpp", "cxx", "hpp", "hh"],
            Self::Python => &["py"],
        }
    }

    /// Get the structural family of this language
    #[must_use]
    pub const fn family(&self) -> Family {
        match self {
            Self::C | Self::Cpp => Family::Brace,
            Self::Python => Family::Indent,
        }
    }

    /// Default include globs for this language
    #[must_use]
    pub const fn default_includes(&self) -> &'static [&'static str] {
        match self {
            Self::C => &["**/*.c", "**/*.h"],
            Self::Cpp => &["**/*.cc", "**/*.cpp", "**/*.cxx", "**/*.hpp", "**/*.hh"],
            Self::Python => &["**/*.py"],
        }
    }
}

/// Whether a path names a C/C++ header file
#[must_use]
pub fn is_header_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "h" | "hpp" | "hh"))
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::C => write!(f, "c"),
            Self::Cpp => write!(f, "cpp"),
            Self::Python => write!(f, "python"),
        }
    }
}

/// Restricts a scan to one language or lets all through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageFilter {
    #[default]
    All,
    Only(Language),
}

impl LanguageFilter {
    /// Whether files of `language` pass this filter
    #[must_use]
    pub fn accepts(&self, language: Language) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == language,
        }
    }

    /// Default include globs for this filter
    #[must_use]
    pub fn default_includes(&self) -> Vec<&'static str> {
        match self {
            Self::All => [Language::C, Language::Cpp, Language::Python]
                .iter()
                .flat_map(|lang| lang.default_includes().iter().copied())
                .collect(),
            Self::Only(lang) => lang.default_includes().to_vec(),
        }
    }
}

impl FromStr for LanguageFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "c" => Ok(Self::Only(Language::C)),
            "cpp" => Ok(Self::Only(Language::Cpp)),
            "python" => Ok(Self::Only(Language::Python)),
            _ => Err(ConfigError::UnknownLanguage(s.to_string())),
        }
    }
}

impl std::fmt::Display for LanguageFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(lang) => write!(f, "{lang}"),
        }
    }
}
