//! File walker: Discovers candidate source files under a root directory

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::language::is_header_path;
use super::{Language, LanguageFilter};
use crate::config::{ConfigError, DEFAULT_EXCLUDES, DEFAULT_MAX_BYTES, ExtractOptions, compile_patterns};

/// Includes behave like a recursive shell glob: `*` stays inside one path
/// component and hidden entries need an explicit leading dot.
const INCLUDE_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Excludes behave like `fnmatch`: `*` may cross `/`.
const EXCLUDE_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A candidate source file found by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Absolute path
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated
    pub relative_path: String,
    pub language: Language,
    pub is_header: bool,
}

impl ScannedFile {
    /// Final component of the relative path
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }
}

/// Counters describing what a scan matched and dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Regular files matching at least one include glob
    pub total_files_matched: usize,
    pub skipped_excluded: usize,
    pub skipped_too_large: usize,
    /// Files without a recognized source extension
    pub skipped_unrecognized: usize,
    /// Files rejected by the language filter
    pub skipped_language: usize,
}

#[derive(Debug)]
struct IncludePattern {
    pattern: Pattern,
    absolute: bool,
}

/// Scanner for discovering source files in a directory
#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    includes: Vec<IncludePattern>,
    excludes: Vec<Pattern>,
    max_bytes: u64,
    language: LanguageFilter,
}

impl Scanner {
    /// Create a new scanner for the given root directory
    ///
    /// Starts with the default includes for all languages, the default
    /// excludes and the default size ceiling.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let includes = LanguageFilter::All
            .default_includes()
            .into_iter()
            .filter_map(|p| Pattern::new(p).ok())
            .map(|pattern| IncludePattern {
                pattern,
                absolute: false,
            })
            .collect();
        let excludes = DEFAULT_EXCLUDES
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect();
        Self {
            root: root.into(),
            includes,
            excludes,
            max_bytes: DEFAULT_MAX_BYTES,
            language: LanguageFilter::All,
        }
    }

    /// Build a scanner from validated extraction options
    ///
    /// # Errors
    /// Returns an error if any include or exclude glob is invalid.
    pub fn from_options(options: &ExtractOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(&options.root)
            .with_includes(&options.effective_includes())?
            .with_excludes(&options.effective_excludes())?
            .with_max_bytes(options.max_bytes)
            .with_language(options.language))
    }

    /// Replace the include globs
    ///
    /// # Errors
    /// Returns an error if any glob is invalid.
    pub fn with_includes<S: AsRef<str>>(mut self, includes: &[S]) -> Result<Self, ConfigError> {
        let compiled = compile_patterns(includes)?;
        self.includes = compiled
            .into_iter()
            .map(|pattern| {
                let absolute = Path::new(pattern.as_str()).is_absolute();
                IncludePattern { pattern, absolute }
            })
            .collect();
        Ok(self)
    }

    /// Replace the exclude globs
    ///
    /// # Errors
    /// Returns an error if any glob is invalid.
    pub fn with_excludes<S: AsRef<str>>(mut self, excludes: &[S]) -> Result<Self, ConfigError> {
        self.excludes = compile_patterns(excludes)?;
        Ok(self)
    }

    /// Skip files larger than `max_bytes`
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Filter to only one language
    #[must_use]
    pub fn with_language(mut self, language: LanguageFilter) -> Self {
        self.language = language;
        self
    }

    /// Get the root directory being scanned
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the directory and return matching files sorted by relative path
    ///
    /// Symlinks are not followed, so link loops never recurse.
    ///
    /// # Errors
    /// Returns an error if the root directory does not exist.
    pub fn scan(&self) -> Result<(Vec<ScannedFile>, ScanSummary), ConfigError> {
        let root = self
            .root
            .canonicalize()
            .map_err(|_| ConfigError::RootNotFound(self.root.clone()))?;

        let mut summary = ScanSummary::default();
        let mut scanned = Vec::new();

        let walker = WalkBuilder::new(&root)
            .standard_filters(false)
            .follow_links(false)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            let Some(relative_path) = relative_posix(&root, path) else {
                continue;
            };
            if !self.is_included(&relative_path, path) {
                continue;
            }
            summary.total_files_matched += 1;

            if self.is_excluded(&relative_path) {
                summary.skipped_excluded += 1;
                continue;
            }
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    debug!("Skipping {}: {}", relative_path, e);
                    continue;
                }
            };
            if size > self.max_bytes {
                summary.skipped_too_large += 1;
                continue;
            }
            let Some(language) = Language::from_path(path) else {
                summary.skipped_unrecognized += 1;
                continue;
            };
            if !self.language.accepts(language) {
                summary.skipped_language += 1;
                continue;
            }

            scanned.push(ScannedFile {
                path: path.to_path_buf(),
                is_header: is_header_path(path),
                relative_path,
                language,
            });
        }

        scanned.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok((scanned, summary))
    }

    fn is_included(&self, relative_path: &str, absolute: &Path) -> bool {
        self.includes.iter().any(|include| {
            if include.absolute {
                include
                    .pattern
                    .matches_path_with(absolute, INCLUDE_MATCH)
            } else {
                include.pattern.matches_with(relative_path, INCLUDE_MATCH)
            }
        })
    }

    /// Excludes are tried against the relative path and its `/`-anchored form
    fn is_excluded(&self, relative_path: &str) -> bool {
        let anchored = format!("/{relative_path}");
        self.excludes.iter().any(|pattern| {
            pattern.matches_with(relative_path, EXCLUDE_MATCH)
                || pattern.matches_with(&anchored, EXCLUDE_MATCH)
        })
    }
}

fn relative_posix(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
