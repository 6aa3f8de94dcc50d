//! Extraction pipeline: drives the loader, locators and adapter over
//! scanned files
//!
//! Files are processed independently in parallel. Recoverable failures
//! (unreadable or unparseable files, unterminated candidates) are counted in
//! the [`ExtractionSummary`] and never abort the run. Units come back ordered
//! by path and span, so identical inputs give identical reports.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ConfigError, ExtractOptions};
use crate::error::ExtractError;
use crate::loader::{Decoder, SourceText, load_source};
use crate::locate::locate_units;
use crate::scanner::ScannedFile;
use crate::unit::{Authority, ExtractedUnit, UnitContext, UnitKind, build_unit};

/// Units extracted from a single file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileExtraction {
    pub units: Vec<ExtractedUnit>,
    /// Brace candidates skipped because their block never balanced
    pub unterminated: usize,
}

/// Counters for one extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub files_processed: usize,
    pub files_skipped_unreadable: usize,
    pub files_skipped_unparseable: usize,
    pub candidates_unterminated: usize,
    pub units_extracted: usize,
}

/// Why a file produced no units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Unreadable,
    Unparseable,
}

/// A file skipped during extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Root-relative path
    pub path: String,
    pub reason: SkipReason,
    pub message: String,
}

/// Result of extracting a batch of files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Units ordered by (path, line_start, line_end)
    pub units: Vec<ExtractedUnit>,
    pub summary: ExtractionSummary,
    pub skipped: Vec<SkippedFile>,
}

/// Turns scanned files into extracted units
#[derive(Debug, Clone)]
pub struct Extractor {
    unit: UnitKind,
    authority: Authority,
    decoder: Decoder,
}

impl Extractor {
    /// Create an extractor that decodes as UTF-8 first
    #[must_use]
    pub fn new(unit: UnitKind, authority: Authority) -> Self {
        Self {
            unit,
            authority,
            decoder: Decoder::default(),
        }
    }

    /// Set the decoder
    #[must_use]
    pub fn with_decoder(mut self, decoder: Decoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Create an extractor from validated options
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownEncoding`] if the encoding label is unknown.
    pub fn from_options(options: &ExtractOptions) -> Result<Self, ConfigError> {
        let decoder = Decoder::for_label(&options.encoding)?;
        Ok(Self::new(options.unit, options.authority).with_decoder(decoder))
    }

    /// Requested unit kind
    #[must_use]
    pub fn unit(&self) -> UnitKind {
        self.unit
    }

    /// Extract units from already-loaded content
    ///
    /// # Errors
    /// Returns [`ExtractError::UnparseableSyntax`] if an indent-family file
    /// does not parse.
    pub fn extract_text(
        &self,
        file: &ScannedFile,
        source: &SourceText,
    ) -> Result<FileExtraction, ExtractError> {
        let located = locate_units(
            &source.text,
            file.file_name(),
            file.language,
            file.is_header,
            self.unit,
        )?;

        let lines: Vec<&str> = source.text.lines().collect();
        let ctx = UnitContext {
            source_path: &file.relative_path,
            language: file.language,
            checksum: &source.checksum,
            authority: self.authority,
            lines: &lines,
        };

        Ok(FileExtraction {
            units: located.units.iter().map(|l| build_unit(l, &ctx)).collect(),
            unterminated: located.unterminated,
        })
    }

    /// Load a file and extract its units
    ///
    /// # Errors
    /// Returns [`ExtractError::UnreadableFile`] if the file cannot be read, or
    /// any error from [`Extractor::extract_text`].
    pub fn extract_file(&self, file: &ScannedFile) -> Result<FileExtraction, ExtractError> {
        let source =
            load_source(&file.path, &self.decoder).map_err(|source| ExtractError::UnreadableFile {
                path: file.path.clone(),
                source,
            })?;
        debug!("Decoded {} as {}", file.relative_path, source.decoded_with);
        self.extract_text(file, &source)
    }

    /// Extract units from every file, in parallel
    #[must_use]
    pub fn extract_all(&self, files: &[ScannedFile]) -> ExtractionReport {
        let outcomes: Vec<_> = files.par_iter().map(|file| self.extract_file(file)).collect();

        let mut report = ExtractionReport::default();
        for (file, outcome) in files.iter().zip(outcomes) {
            handle_file_result(outcome, file, &mut report);
        }

        report.units.sort_by(|a, b| {
            (&a.source_path, a.provenance.line_start, a.provenance.line_end).cmp(&(
                &b.source_path,
                b.provenance.line_start,
                b.provenance.line_end,
            ))
        });
        report.summary.units_extracted = report.units.len();

        log_skipped(&report.summary);
        report
    }
}

/// Fold the outcome of one file into the report
fn handle_file_result(
    outcome: Result<FileExtraction, ExtractError>,
    file: &ScannedFile,
    report: &mut ExtractionReport,
) {
    match outcome {
        Ok(extraction) => {
            debug!(
                "  {} → {} units",
                file.relative_path,
                extraction.units.len()
            );
            report.summary.files_processed += 1;
            report.summary.candidates_unterminated += extraction.unterminated;
            report.units.extend(extraction.units);
        }
        Err(e @ ExtractError::UnreadableFile { .. }) => {
            warn!("Skipping unreadable file {}: {}", file.relative_path, e);
            report.summary.files_skipped_unreadable += 1;
            report.skipped.push(SkippedFile {
                path: file.relative_path.clone(),
                reason: SkipReason::Unreadable,
                message: e.to_string(),
            });
        }
        Err(e) => {
            warn!("Skipping unparseable file {}: {}", file.relative_path, e);
            report.summary.files_skipped_unparseable += 1;
            report.skipped.push(SkippedFile {
                path: file.relative_path.clone(),
                reason: SkipReason::Unparseable,
                message: e.to_string(),
            });
        }
    }
}

fn log_skipped(summary: &ExtractionSummary) {
    let skipped = summary.files_skipped_unreadable + summary.files_skipped_unparseable;
    if skipped > 0 {
        warn!("{} files skipped during extraction", skipped);
    }
    if summary.candidates_unterminated > 0 {
        debug!(
            "{} unterminated candidates skipped",
            summary.candidates_unterminated
        );
    }
}
