//! Indent-family locator for Python, backed by tree-sitter

use tree_sitter::{Node, Parser, Point};

use super::LocatedUnit;
use crate::error::ExtractError;
use crate::unit::UnitKind;

/// Definition that directly encloses the nodes being visited
#[derive(Debug, Clone, Copy)]
enum Enclosing<'a> {
    Module,
    Class(&'a str),
}

/// Module-level classes, or module-level functions and their methods
pub(super) fn locate_definitions(
    text: &str,
    lines: &[&str],
    kind: UnitKind,
) -> Result<Vec<LocatedUnit>, ExtractError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ExtractError::Grammar(e.to_string()))?;

    let tree = parser
        .parse(text, None)
        .ok_or(ExtractError::UnparseableSyntax { line: 1 })?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(ExtractError::UnparseableSyntax {
            line: first_error_line(root).unwrap_or(1),
        });
    }

    let mut units = Vec::new();
    collect(root, text.as_bytes(), lines, kind, Enclosing::Module, &mut units);
    Ok(units)
}

fn collect<'a>(
    node: Node<'_>,
    source: &'a [u8],
    lines: &[&str],
    kind: UnitKind,
    enclosing: Enclosing<'a>,
    units: &mut Vec<LocatedUnit>,
) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "function_definition" => {
                // Bodies are never entered: nested functions are not units
                if kind != UnitKind::Function {
                    continue;
                }
                let Some(name) = definition_name(child, source) else {
                    continue;
                };
                let symbol = match enclosing {
                    Enclosing::Module => name.to_string(),
                    Enclosing::Class(class) => format!("{class}.{name}"),
                };
                units.push(located(child, UnitKind::Function, symbol, lines));
            }
            "class_definition" => {
                if !matches!(enclosing, Enclosing::Module) {
                    continue;
                }
                let Some(name) = definition_name(child, source) else {
                    continue;
                };
                match kind {
                    UnitKind::Class => {
                        units.push(located(child, UnitKind::Class, name.to_string(), lines));
                    }
                    _ => {
                        if let Some(body) = child.child_by_field_name("body") {
                            collect(body, source, lines, kind, Enclosing::Class(name), units);
                        }
                    }
                }
            }
            // Decorators wrap the definition without changing its parent
            "decorated_definition" => collect(child, source, lines, kind, enclosing, units),
            _ => {}
        }
    }
}

fn definition_name<'a>(node: Node<'_>, source: &'a [u8]) -> Option<&'a str> {
    node.child_by_field_name("name")?.utf8_text(source).ok()
}

fn located(node: Node<'_>, kind: UnitKind, symbol: String, lines: &[&str]) -> LocatedUnit {
    let start = node.start_position();
    let end = content_end(node);
    let line_start = start.row + 1;
    // An end at column 0 sits on the line after the last character
    let line_end = if end.column == 0 && end.row > start.row {
        end.row
    } else {
        end.row + 1
    };
    let (line_start, line_end) = resolve_span(line_start, Some(line_end), lines);
    LocatedUnit {
        kind,
        symbol,
        line_start,
        line_end,
    }
}

/// End of the last non-comment token under `node`
///
/// Comments are extras in the grammar, so a block absorbs comment lines that
/// trail its last statement.
fn content_end(node: Node<'_>) -> Point {
    let mut cursor = node.walk();
    let last = node
        .children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .last();
    match last {
        Some(child) => content_end(child),
        None => node.end_position(),
    }
}

/// Clamp a definition span to the file, estimating the end when it is missing
/// or out of range
///
/// The estimate ends on the line before the first later non-blank line
/// indented no deeper than the definition line, or at end of file.
#[must_use]
pub fn resolve_span(line_start: usize, line_end: Option<usize>, lines: &[&str]) -> (usize, usize) {
    let total = lines.len();
    let line_end = line_end
        .filter(|&end| end >= line_start && end <= total)
        .unwrap_or_else(|| indentation_end(line_start, lines));
    (line_start, line_end.min(total).max(line_start))
}

fn indentation_end(line_start: usize, lines: &[&str]) -> usize {
    let Some(header) = lines.get(line_start.saturating_sub(1)) else {
        return lines.len();
    };
    let header_indent = leading_spaces(header);

    lines
        .iter()
        .enumerate()
        .skip(line_start)
        .find(|(_, line)| !line.trim().is_empty() && leading_spaces(line) <= header_indent)
        .map_or(lines.len(), |(index, _)| index)
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn first_error_line(node: Node<'_>) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(line) = first_error_line(child) {
                return Some(line);
            }
        }
    }
    None
}
