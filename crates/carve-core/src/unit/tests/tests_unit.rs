//! Tests for the unit model and adapter

#![allow(clippy::expect_used)]

use crate::config::ConfigError;
use crate::locate::LocatedUnit;
use crate::scanner::Language;
use crate::unit::{Authority, SourceKind, UnitContext, UnitKind, build_unit, slice_lines};
use rstest::rstest;

const LINES: &[&str] = &["int f(void)", "{", "    return 0;", "}", ""];

fn context<'a>(lines: &'a [&'a str]) -> UnitContext<'a> {
    UnitContext {
        source_path: "src/f.c",
        language: Language::C,
        checksum: "abc123",
        authority: Authority::Normative,
        lines,
    }
}

#[rstest]
#[case("file", UnitKind::File)]
#[case("class", UnitKind::Class)]
#[case("FUNCTION", UnitKind::Function)]
fn test_unit_kind_from_str(#[case] input: &str, #[case] expected: UnitKind) {
    assert_eq!(input.parse::<UnitKind>().expect("parse"), expected);
}

#[test]
fn test_unit_kind_rejects_unknown() {
    assert!(matches!(
        "method".parse::<UnitKind>(),
        Err(ConfigError::UnknownUnitKind(_))
    ));
}

#[rstest]
#[case("normative", Authority::Normative)]
#[case("approved_interpretation", Authority::ApprovedInterpretation)]
#[case("informative", Authority::Informative)]
#[case("unverified", Authority::Unverified)]
fn test_authority_round_trips_display(#[case] input: &str, #[case] expected: Authority) {
    let parsed = input.parse::<Authority>().expect("parse");
    assert_eq!(parsed, expected);
    assert_eq!(parsed.to_string(), input);
}

#[test]
fn test_authority_rejects_unknown() {
    assert!(matches!(
        "gospel".parse::<Authority>(),
        Err(ConfigError::UnknownAuthority(_))
    ));
}

#[test]
fn test_slice_lines_inclusive() {
    assert_eq!(slice_lines(LINES, 1, 4), "int f(void)\n{\n    return 0;\n}");
    assert_eq!(slice_lines(LINES, 3, 3), "    return 0;");
}

#[test]
fn test_slice_lines_clamps_past_end() {
    assert_eq!(slice_lines(LINES, 4, 99), "}\n");
    assert_eq!(slice_lines(LINES, 9, 12), "");
}

#[test]
fn test_build_unit_copies_provenance() {
    let located = LocatedUnit {
        kind: UnitKind::Function,
        symbol: "f".to_string(),
        line_start: 1,
        line_end: 4,
    };

    let unit = build_unit(&located, &context(LINES));

    assert_eq!(unit.raw_text, "int f(void)\n{\n    return 0;\n}");
    assert_eq!(unit.source_kind, SourceKind::Code);
    assert_eq!(unit.source_path, "src/f.c");
    assert_eq!(unit.authority, Authority::Normative);
    assert_eq!(unit.provenance.path, unit.source_path);
    assert_eq!(unit.provenance.symbol, "f");
    assert_eq!(unit.provenance.unit_kind, UnitKind::Function);
    assert_eq!(unit.provenance.line_start, 1);
    assert_eq!(unit.provenance.line_end, 4);
    assert_eq!(unit.provenance.file_checksum, "abc123");
}

#[test]
fn test_unit_serializes_record_keys() {
    let located = LocatedUnit {
        kind: UnitKind::File,
        symbol: "f.c".to_string(),
        line_start: 1,
        line_end: 4,
    };
    let unit = build_unit(&located, &context(LINES));

    let value = serde_json::to_value(&unit).expect("serialize");

    assert_eq!(value["source_type"], "code");
    assert_eq!(value["authority"], "normative");
    assert_eq!(value["text_raw"], unit.raw_text);
    assert_eq!(value["provenance"]["unit"], "file");
    assert_eq!(value["provenance"]["language"], "c");
    assert_eq!(value["provenance"]["sha256_of_file"], "abc123");
    assert_eq!(value["provenance"]["line_end"], 4);
}
