//! Unit locators: find file, class and function spans in decoded source
//!
//! Brace-family languages use a line-oriented heuristic over lexically
//! masked text ([`brace`]). Indent-family languages are parsed with
//! tree-sitter ([`indent`]). Both report 1-indexed inclusive line spans.

mod brace;
mod indent;

use crate::error::ExtractError;
use crate::scanner::{Family, Language};
use crate::unit::UnitKind;

pub use indent::resolve_span;

/// A unit span found by a locator, before text and provenance are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedUnit {
    pub kind: UnitKind,
    pub symbol: String,
    pub line_start: usize,
    pub line_end: usize,
}

/// Units found in one file, plus the candidates that never closed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Located {
    pub units: Vec<LocatedUnit>,
    /// Brace candidates skipped because their block never balanced
    pub unterminated: usize,
}

/// Locate every unit of `kind` in `text`
///
/// `file_name` is the symbol given to file units. An empty text yields no
/// units. A header with no function bodies yields a single file unit when
/// functions are requested.
///
/// # Errors
/// Returns [`ExtractError::UnparseableSyntax`] when an indent-family file
/// does not parse, or [`ExtractError::Grammar`] when the grammar fails to load.
pub fn locate_units(
    text: &str,
    file_name: &str,
    language: Language,
    is_header: bool,
    kind: UnitKind,
) -> Result<Located, ExtractError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Ok(Located::default());
    }

    if kind == UnitKind::File {
        return Ok(Located {
            units: vec![whole_file(file_name, lines.len())],
            unterminated: 0,
        });
    }

    match language.family() {
        Family::Indent => Ok(Located {
            units: indent::locate_definitions(text, &lines, kind)?,
            unterminated: 0,
        }),
        Family::Brace => {
            let mut located = match kind {
                UnitKind::Class => brace::locate_classes(&lines),
                _ => brace::locate_functions(&lines),
            };
            if kind == UnitKind::Function && is_header && located.units.is_empty() {
                located.units.push(whole_file(file_name, lines.len()));
            }
            Ok(located)
        }
    }
}

fn whole_file(file_name: &str, total_lines: usize) -> LocatedUnit {
    LocatedUnit {
        kind: UnitKind::File,
        symbol: file_name.to_string(),
        line_start: 1,
        line_end: total_lines,
    }
}

#[cfg(test)]
mod tests;
