//! Tests for the indent-family locator

#![allow(clippy::expect_used)]

use crate::error::ExtractError;
use crate::locate::LocatedUnit;
use crate::locate::indent::locate_definitions;
use crate::locate::resolve_span;
use crate::unit::UnitKind;

fn locate(text: &str, kind: UnitKind) -> Vec<LocatedUnit> {
    let lines: Vec<&str> = text.lines().collect();
    locate_definitions(text, &lines, kind).expect("parse failed")
}

fn spans(units: &[LocatedUnit]) -> Vec<(&str, usize, usize)> {
    units
        .iter()
        .map(|u| (u.symbol.as_str(), u.line_start, u.line_end))
        .collect()
}

#[test]
fn test_function_and_method() {
    let text = "\
def top():
    return 1



class Widget:
    def run(self):
        return 2
";
    let units = locate(text, UnitKind::Function);

    assert_eq!(spans(&units), vec![("top", 1, 2), ("Widget.run", 7, 8)]);
    assert!(units.iter().all(|u| u.kind == UnitKind::Function));
}

#[test]
fn test_same_name_function_and_method() {
    let text = "\
def run():
    pass

class Job:
    def run(self):
        pass
";
    let units = locate(text, UnitKind::Function);

    let symbols: Vec<_> = units.iter().map(|u| u.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["run", "Job.run"]);
}

#[test]
fn test_nested_functions_are_excluded() {
    let text = "\
def outer():
    def inner():
        return 1
    return inner()
";
    let units = locate(text, UnitKind::Function);

    assert_eq!(spans(&units), vec![("outer", 1, 4)]);
}

#[test]
fn test_async_and_decorated_definitions() {
    let text = "\
import functools


@functools.cache
def cached():
    return 1


async def fetch():
    return 2
";
    let units = locate(text, UnitKind::Function);

    assert_eq!(spans(&units), vec![("cached", 5, 6), ("fetch", 9, 10)]);
}

#[test]
fn test_decorated_method() {
    let text = "\
class Config:
    @property
    def name(self):
        return self._name
";
    let units = locate(text, UnitKind::Function);

    assert_eq!(spans(&units), vec![("Config.name", 3, 4)]);
}

#[test]
fn test_nested_class_members_are_excluded() {
    let text = "\
class Outer:
    class Inner:
        def deep(self):
            pass

    def method(self):
        pass
";
    let functions = locate(text, UnitKind::Function);
    assert_eq!(spans(&functions), vec![("Outer.method", 6, 7)]);

    let classes = locate(text, UnitKind::Class);
    assert_eq!(spans(&classes), vec![("Outer", 1, 7)]);
    assert_eq!(classes[0].kind, UnitKind::Class);
}

#[test]
fn test_class_request_ignores_functions() {
    let text = "\
def helper():
    pass

class A:
    pass

class B(A):
    x = 1
";
    let units = locate(text, UnitKind::Class);

    assert_eq!(spans(&units), vec![("A", 4, 5), ("B", 7, 8)]);
}

#[test]
fn test_definitions_under_module_level_conditionals_are_excluded() {
    let text = "\
import sys

if sys.platform == \"win32\":
    def native():
        return 1
else:
    def native():
        return 2
";
    let units = locate(text, UnitKind::Function);

    assert!(units.is_empty());
}

#[test]
fn test_conditional_members_of_a_class_are_excluded() {
    let text = "\
if True:
    def f():
        pass
class A:
    if True:
        def m(self):
            pass
    def kept(self):
        pass
";
    let units = locate(text, UnitKind::Function);

    assert_eq!(spans(&units), vec![("A.kept", 8, 9)]);
}

#[test]
fn test_classes_under_try_are_excluded() {
    let text = "\
try:
    class Fast:
        pass
except ImportError:
    class Fast:
        pass

class Plain:
    pass
";
    let units = locate(text, UnitKind::Class);

    assert_eq!(spans(&units), vec![("Plain", 8, 9)]);
}

#[test]
fn test_trailing_comments_are_not_part_of_the_span() {
    let text = "\
def f():
    return 1
    # trailing note

class A:
    def m(self):
        if self:
            return 2
        # after the if
    # after the method
";
    let functions = locate(text, UnitKind::Function);
    let classes = locate(text, UnitKind::Class);

    assert_eq!(spans(&functions), vec![("f", 1, 2), ("A.m", 6, 8)]);
    assert_eq!(spans(&classes), vec![("A", 5, 8)]);
}

#[test]
fn test_unparseable_source_is_an_error() {
    let text = "def broken(:\n    pass\n";
    let lines: Vec<&str> = text.lines().collect();

    let result = locate_definitions(text, &lines, UnitKind::Function);

    assert!(matches!(result, Err(ExtractError::UnparseableSyntax { .. })));
}

#[test]
fn test_empty_module_has_no_units() {
    assert!(locate("", UnitKind::Function).is_empty());
    assert!(locate("# only a comment\n", UnitKind::Class).is_empty());
}

#[test]
fn test_resolve_span_keeps_valid_end() {
    let lines = ["def f():", "    return 1", "", "x = 2"];
    assert_eq!(resolve_span(1, Some(2), &lines), (1, 2));
}

#[test]
fn test_resolve_span_falls_back_to_indentation() {
    let lines = ["def f():", "    x = 1", "", "    y = 2", "", "z = 3"];

    assert_eq!(resolve_span(1, None, &lines), (1, 5));
    assert_eq!(resolve_span(1, Some(99), &lines), (1, 5));
}

#[test]
fn test_resolve_span_fallback_for_indented_definition() {
    let lines = [
        "class A:",
        "    def f(self):",
        "        return 1",
        "    def g(self):",
        "        return 2",
    ];

    assert_eq!(resolve_span(2, None, &lines), (2, 3));
    assert_eq!(resolve_span(4, None, &lines), (4, 5));
}

#[test]
fn test_resolve_span_fallback_runs_to_end_of_file() {
    let lines = ["class A:", "    pass"];
    assert_eq!(resolve_span(1, None, &lines), (1, 2));
}
