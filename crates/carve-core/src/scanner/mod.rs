//! Scanner module: File discovery and language detection
//!
//! Responsible for walking directories, applying include/exclude globs
//! and the size ceiling, and classifying each file by language.

mod language;
mod walker;

pub use language::{Family, Language, LanguageFilter, is_header_path};
pub use walker::{ScanSummary, ScannedFile, Scanner};
