//! carve-core: Core library for heuristic source-code unit extraction
//!
//! Locates files, classes/structs and functions/methods in source files
//! without a compiler front end, and turns each one into an
//! [`ExtractedUnit`] carrying its exact line span and provenance.
//!
//! # Supported languages
//!
//! - **C** - `.c`, `.h` (brace-delimited, heuristic scanning)
//! - **C++** - `.cc`, `.cpp`, `.cxx`, `.hpp`, `.hh` (brace-delimited, heuristic scanning)
//! - **Python** - `.py` (indentation-delimited, tree-sitter)

pub mod config;
pub mod error;
pub mod lexical;
pub mod loader;
pub mod locate;
pub mod pipeline;
pub mod run;
pub mod scanner;
pub mod unit;

// Re-export commonly used types
pub use config::{ConfigError, ExtractOptions};
pub use error::ExtractError;
pub use loader::{Decoder, LoadError, SourceText, load_source};
pub use locate::{LocatedUnit, locate_units};
pub use pipeline::{ExtractionReport, ExtractionSummary, Extractor};
pub use run::ExtractionRun;
pub use scanner::{Language, LanguageFilter, ScanSummary, ScannedFile, Scanner};
pub use unit::{Authority, ExtractedUnit, Provenance, SourceKind, UnitKind};
