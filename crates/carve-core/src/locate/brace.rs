//! Brace-family locator for C and C++
//!
//! Both passes walk the file line by line, threading a [`LexState`] so that
//! braces, parentheses and semicolons inside comments and literals are never
//! seen. Each block is closed by counting braces from its opening brace with
//! a fresh state.

use std::ops::ControlFlow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{Located, LocatedUnit};
use crate::error::ExtractError;
use crate::lexical::{LexState, mask_line, scan_line};
use crate::unit::UnitKind;

/// Longest signature, in lines, a function candidate may span
const MAX_SIGNATURE_LINES: usize = 25;

const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch"];

#[allow(clippy::expect_used)]
static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(class|struct)\s+([A-Za-z_][A-Za-z0-9_]*)").expect("valid class regex")
});

#[allow(clippy::expect_used)]
static CALL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_:~]*)\s*\(").expect("valid call-name regex")
});

/// Where the forward search for an opening brace ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BraceSearch {
    Found { line: usize, offset: usize },
    /// A code `;` came first
    Declaration,
    Exhausted,
}

/// Find every class and struct definition with a body
pub(super) fn locate_classes(lines: &[&str]) -> Located {
    let mut located = Located::default();
    let mut state = LexState::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];

        if is_directive(state, line) {
            index = directive_end(lines, index) + 1;
            continue;
        }

        let start = index;
        let line_state = state;
        let (after, masked) = mask_line(line_state, line);
        state = after;
        index += 1;

        let Some(caps) = CLASS_RE.captures(&masked) else {
            continue;
        };
        let name = &caps[2];
        let match_end = caps.get(0).map_or(0, |m| m.end());

        match find_opening_brace(lines, start, match_end, line_state) {
            BraceSearch::Found { line, offset } => match find_block_end(lines, line, offset, start) {
                Ok(end) => located.units.push(LocatedUnit {
                    kind: UnitKind::Class,
                    symbol: name.to_string(),
                    line_start: start + 1,
                    line_end: end + 1,
                }),
                Err(e) => {
                    debug!("Skipping class '{}': {}", name, e);
                    located.unterminated += 1;
                }
            },
            BraceSearch::Declaration => {
                debug!(
                    "Skipping forward declaration of '{}' at line {}",
                    name,
                    start + 1
                );
            }
            BraceSearch::Exhausted => {
                debug!("No body found for class '{}' at line {}", name, start + 1);
                located.unterminated += 1;
            }
        }
    }

    located
}

/// Find every function definition with a body
pub(super) fn locate_functions(lines: &[&str]) -> Located {
    let mut located = Located::default();
    let mut state = LexState::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];

        if is_directive(state, line) {
            index = directive_end(lines, index) + 1;
            continue;
        }

        let (after, masked) = mask_line(state, line);
        if !masked.contains('(') {
            state = after;
            index += 1;
            continue;
        }

        let consumed = match collect_signature(lines, index, state) {
            Signature::Definition {
                text,
                brace_line,
                brace_offset,
            } => match definition_name(&text) {
                Some(name) => match find_block_end(lines, brace_line, brace_offset, index) {
                    Ok(end) => {
                        located.units.push(LocatedUnit {
                            kind: UnitKind::Function,
                            symbol: name,
                            line_start: index + 1,
                            line_end: end + 1,
                        });
                        end
                    }
                    Err(e) => {
                        debug!("Skipping function '{}': {}", name, e);
                        located.unterminated += 1;
                        brace_line
                    }
                },
                None => brace_line,
            },
            Signature::Declaration { line } => line,
            Signature::TooLong => {
                debug!(
                    "Signature starting at line {} exceeds {} lines",
                    index + 1,
                    MAX_SIGNATURE_LINES
                );
                index + MAX_SIGNATURE_LINES - 1
            }
            Signature::Exhausted => {
                debug!("Signature starting at line {} runs to end of file", index + 1);
                located.unterminated += 1;
                lines.len() - 1
            }
        };

        state = advance(state, &lines[index..=consumed]);
        index = consumed + 1;
    }

    located
}

/// Outcome of collecting a function signature
#[derive(Debug, Clone, PartialEq, Eq)]
enum Signature {
    Definition {
        /// Masked code text from the candidate line up to the opening brace
        text: String,
        brace_line: usize,
        brace_offset: usize,
    },
    Declaration {
        line: usize,
    },
    TooLong,
    Exhausted,
}

/// Accumulate masked signature text from `start` until the first code `;` or `{`
fn collect_signature(lines: &[&str], start: usize, state: LexState) -> Signature {
    let mut state = state;
    let mut text = String::new();
    let limit = (start + MAX_SIGNATURE_LINES).min(lines.len());

    for (index, line) in lines.iter().enumerate().take(limit).skip(start) {
        let (after, masked) = mask_line(state, line);
        match masked.char_indices().find(|&(_, c)| c == ';' || c == '{') {
            Some((_, ';')) => return Signature::Declaration { line: index },
            Some((offset, _)) => {
                text.push_str(&masked[..offset]);
                return Signature::Definition {
                    text,
                    brace_line: index,
                    brace_offset: offset,
                };
            }
            None => {
                text.push_str(&masked);
                text.push('\n');
                state = after;
            }
        }
    }

    if limit < lines.len() {
        Signature::TooLong
    } else {
        Signature::Exhausted
    }
}

/// Name of the definition whose signature is `text`, unless it is a control statement
fn definition_name(text: &str) -> Option<String> {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let name = CALL_NAME_RE
        .captures_iter(&flattened)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())?;

    if CONTROL_KEYWORDS.contains(&name.as_str()) {
        debug!("Ignoring control statement '{}'", name);
        return None;
    }
    Some(name)
}

/// Search forward from `from` on line `start` for the first code `{` or `;`
fn find_opening_brace(lines: &[&str], start: usize, from: usize, state: LexState) -> BraceSearch {
    let mut state = state;

    for (index, line) in lines.iter().enumerate().skip(start) {
        let skip_before = if index == start { from } else { 0 };
        let (after, flow) = scan_line(state, line, 0, |offset, ch| {
            if offset < skip_before {
                return ControlFlow::Continue(());
            }
            match ch {
                '{' => ControlFlow::Break(BraceSearch::Found {
                    line: index,
                    offset,
                }),
                ';' => ControlFlow::Break(BraceSearch::Declaration),
                _ => ControlFlow::Continue(()),
            }
        });
        if let ControlFlow::Break(found) = flow {
            return found;
        }
        state = after;
    }

    BraceSearch::Exhausted
}

/// Line index of the brace that closes the block opened at (`line`, `offset`)
///
/// `candidate` is the line index the unit starts on, used for reporting.
fn find_block_end(
    lines: &[&str],
    line: usize,
    offset: usize,
    candidate: usize,
) -> Result<usize, ExtractError> {
    let mut state = LexState::new();
    let mut depth: usize = 0;

    for (index, text) in lines.iter().enumerate().skip(line) {
        let from = if index == line { offset } else { 0 };
        let (after, flow) = scan_line(state, text, from, |_, ch| {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return ControlFlow::Break(());
                    }
                }
                _ => {}
            }
            ControlFlow::Continue(())
        });
        if flow.is_break() {
            return Ok(index);
        }
        state = after;
    }

    Err(ExtractError::UnterminatedBlock {
        line_start: candidate + 1,
    })
}

/// Thread `state` through whole lines, leaving directives unlexed
fn advance(state: LexState, lines: &[&str]) -> LexState {
    let mut state = state;
    let mut index = 0;
    while index < lines.len() {
        if is_directive(state, lines[index]) {
            index = directive_end(lines, index) + 1;
        } else {
            state = mask_line(state, lines[index]).0;
            index += 1;
        }
    }
    state
}

/// A preprocessor line: `#` is the first non-blank character outside a block comment
fn is_directive(state: LexState, line: &str) -> bool {
    !state.in_block_comment && !state.in_literal() && line.trim_start().starts_with('#')
}

/// Last line of the directive starting at `start`, following backslash continuations
fn directive_end(lines: &[&str], start: usize) -> usize {
    let mut end = start;
    while end + 1 < lines.len() && lines[end].trim_end().ends_with('\\') {
        end += 1;
    }
    end
}
