//! Adapter from located spans to [`ExtractedUnit`] values

use super::{Authority, ExtractedUnit, Provenance, SourceKind};
use crate::locate::LocatedUnit;
use crate::scanner::Language;

/// Per-file values shared by every unit built from that file
#[derive(Debug, Clone, Copy)]
pub struct UnitContext<'a> {
    /// Root-relative path
    pub source_path: &'a str,
    pub language: Language,
    pub checksum: &'a str,
    pub authority: Authority,
    /// The file's lines, without terminators
    pub lines: &'a [&'a str],
}

/// Join lines `line_start..=line_end` (1-indexed) with `\n`, clamped to the file
#[must_use]
pub fn slice_lines(lines: &[&str], line_start: usize, line_end: usize) -> String {
    let start = line_start.saturating_sub(1);
    let end = line_end.min(lines.len());
    if start >= end {
        return String::new();
    }
    lines[start..end].join("\n")
}

/// Wrap a located unit with its raw text and provenance
#[must_use]
pub fn build_unit(located: &LocatedUnit, ctx: &UnitContext<'_>) -> ExtractedUnit {
    ExtractedUnit {
        raw_text: slice_lines(ctx.lines, located.line_start, located.line_end),
        source_kind: SourceKind::Code,
        source_path: ctx.source_path.to_string(),
        authority: ctx.authority,
        provenance: Provenance {
            path: ctx.source_path.to_string(),
            language: ctx.language,
            unit_kind: located.kind,
            symbol: located.symbol.clone(),
            line_start: located.line_start,
            line_end: located.line_end,
            file_checksum: ctx.checksum.to_string(),
        },
    }
}
