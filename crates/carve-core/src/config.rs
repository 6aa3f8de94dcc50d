//! Extraction options and configuration validation
//!
//! Everything in here is checked before any file is touched: an unknown unit
//! kind, language filter, encoding label, authority or glob pattern is a
//! caller error and rejects the whole request.

use std::path::PathBuf;

use thiserror::Error;

use crate::scanner::LanguageFilter;
use crate::unit::{Authority, UnitKind};

/// Default byte-size ceiling for scanned files
pub const DEFAULT_MAX_BYTES: u64 = 1_000_000;

/// Default preferred encoding label
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Exclude globs applied when the caller supplies none
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/.venv/**",
    "**/venv/**",
    "**/__pycache__/**",
    "**/build/**",
    "**/dist/**",
    "**/node_modules/**",
    "**/.mypy_cache/**",
    "**/.pytest_cache/**",
    "**/.ruff_cache/**",
    "**/.tox/**",
    "**/outputs/**",
];

/// Invalid configuration supplied by the caller
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported unit kind: {0} (expected file, class or function)")]
    UnknownUnitKind(String),

    #[error("Unsupported language filter: {0} (expected c, cpp, python or all)")]
    UnknownLanguage(String),

    #[error("Unsupported encoding: {0}")]
    UnknownEncoding(String),

    #[error("Unsupported authority: {0}")]
    UnknownAuthority(String),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),
}

/// Options for one extraction request
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Directory to scan
    pub root: PathBuf,
    /// Include globs; empty means the defaults for `language`
    pub includes: Vec<String>,
    /// Exclude globs; empty means [`DEFAULT_EXCLUDES`]
    pub excludes: Vec<String>,
    /// Files larger than this are skipped
    pub max_bytes: u64,
    /// Preferred encoding label
    pub encoding: String,
    /// Language filter
    pub language: LanguageFilter,
    /// Requested granularity
    pub unit: UnitKind,
    /// Authority tag stamped on every unit
    pub authority: Authority,
}

impl ExtractOptions {
    /// Create options with defaults for the given root
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
            max_bytes: DEFAULT_MAX_BYTES,
            encoding: DEFAULT_ENCODING.to_string(),
            language: LanguageFilter::All,
            unit: UnitKind::Function,
            authority: Authority::Informative,
        }
    }

    /// Set the include globs
    #[must_use]
    pub fn with_includes(mut self, includes: Vec<String>) -> Self {
        self.includes = includes;
        self
    }

    /// Set the exclude globs
    #[must_use]
    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    /// Set the byte-size ceiling
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Set the preferred encoding label
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Set the language filter
    #[must_use]
    pub fn with_language(mut self, language: LanguageFilter) -> Self {
        self.language = language;
        self
    }

    /// Set the requested unit kind
    #[must_use]
    pub fn with_unit(mut self, unit: UnitKind) -> Self {
        self.unit = unit;
        self
    }

    /// Set the authority tag
    #[must_use]
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = authority;
        self
    }

    /// Include globs to use, falling back to the language defaults
    #[must_use]
    pub fn effective_includes(&self) -> Vec<String> {
        if self.includes.is_empty() {
            self.language
                .default_includes()
                .iter()
                .map(|s| (*s).to_string())
                .collect()
        } else {
            self.includes.clone()
        }
    }

    /// Exclude globs to use, falling back to [`DEFAULT_EXCLUDES`]
    #[must_use]
    pub fn effective_excludes(&self) -> Vec<String> {
        if self.excludes.is_empty() {
            DEFAULT_EXCLUDES.iter().map(|s| (*s).to_string()).collect()
        } else {
            self.excludes.clone()
        }
    }
}

/// Compile glob patterns, rejecting the first invalid one
///
/// # Errors
/// Returns [`ConfigError::InvalidPattern`] if any pattern fails to compile.
pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<glob::Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p.as_ref()).map_err(|source| ConfigError::InvalidPattern {
                pattern: p.as_ref().to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Language;

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::new("/repo");
        assert_eq!(options.max_bytes, DEFAULT_MAX_BYTES);
        assert_eq!(options.encoding, "utf-8");
        assert_eq!(options.unit, UnitKind::Function);
        assert_eq!(options.language, LanguageFilter::All);
        assert_eq!(options.authority, Authority::Informative);
    }

    #[test]
    fn test_effective_includes_follow_language() {
        let options =
            ExtractOptions::new("/repo").with_language(LanguageFilter::Only(Language::Python));
        assert_eq!(options.effective_includes(), vec!["**/*.py".to_string()]);

        let explicit = options.with_includes(vec!["src/*.py".to_string()]);
        assert_eq!(explicit.effective_includes(), vec!["src/*.py".to_string()]);
    }

    #[test]
    fn test_effective_excludes_default() {
        let options = ExtractOptions::new("/repo");
        assert_eq!(options.effective_excludes().len(), DEFAULT_EXCLUDES.len());
        assert!(options
            .effective_excludes()
            .contains(&"**/.git/**".to_string()));
    }

    #[test]
    fn test_compile_patterns_rejects_invalid() {
        let result = compile_patterns(&["**/*.c", "src/[.c"]);
        match result {
            Err(ConfigError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "src/[.c"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }
}
