//! Errors raised while extracting units from a file

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::loader::LoadError;

/// Errors that can occur during extraction
///
/// Only `InvalidConfiguration` aborts a whole run. The others are recorded
/// per file (or per candidate) and the run continues.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The indent-family syntax parse failed
    #[error("Unparseable syntax at line {line}")]
    UnparseableSyntax { line: usize },

    /// A brace candidate never reached depth zero
    #[error("Unterminated block starting at line {line_start}")]
    UnterminatedBlock { line_start: usize },

    #[error("Unreadable file {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),

    /// The syntax grammar could not be loaded
    #[error("Grammar error: {0}")]
    Grammar(String),
}
