//! Whole-pipeline tests over the sketches in tests/fixtures/.
//!
//! Each fixture is converted with default options; fixtures with a matching
//! `.expected.cpp` file must convert to exactly that text.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use sketchpp::model::{ConvertOptions, LineOrigin, TokenKind};
use sketchpp::ops::convert;
use sketchpp::parse::span::count_lines;
use sketchpp::parse::{BraceFault, ConvertError, LiteralKind, mask};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

const FIXTURES: &[&str] = &[
    "analog_read_serial.ino",
    "blink_helper.ino",
    "declared_helpers.ino",
    "mixed_preamble.ino",
];

// ---------------------------------------------------------------------------
// Expected outputs
// ---------------------------------------------------------------------------

#[test]
fn test_entry_points_only_sketch_is_unchanged() {
    let source = fixture("analog_read_serial.ino");
    let result = convert(&source, &ConvertOptions::default()).unwrap();
    assert_eq!(result.output, source);
    assert!(result.injected.is_empty());
    assert_eq!(result.insertion_line, None);
    for line in 1..=count_lines(&source) {
        assert_eq!(result.line_map.resolve(line), Some(LineOrigin::Input(line)));
    }
}

#[test]
fn test_helpers_defined_after_use_get_prototypes() {
    let source = fixture("blink_helper.ino");
    let result = convert(&source, &ConvertOptions::default()).unwrap();
    assert_eq!(result.output, fixture("blink_helper.expected.cpp"));

    let names: Vec<&str> = result.injected.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["toggle", "wait"]);
    assert_eq!(result.insertion_line, Some(8));
    assert_eq!(result.line_map.resolve(7), Some(LineOrigin::Input(7)));
    assert_eq!(
        result.line_map.resolve(8),
        Some(LineOrigin::Synthetic { after: 7 })
    );
    assert_eq!(
        result.line_map.resolve(9),
        Some(LineOrigin::Synthetic { after: 7 })
    );
    assert_eq!(result.line_map.resolve(10), Some(LineOrigin::Input(8)));
}

#[test]
fn test_existing_prototypes_suppress_injection() {
    let source = fixture("declared_helpers.ino");
    let result = convert(&source, &ConvertOptions::default()).unwrap();
    assert_eq!(result.output, source);
    assert!(result.injected.is_empty());

    let extraction = sketchpp::ops::scan(&source, &ConvertOptions::default()).unwrap();
    let angle_for = extraction
        .definitions
        .iter()
        .find(|s| s.name == "angleFor")
        .unwrap();
    assert!(angle_for.declared);
}

#[test]
fn test_insertion_stays_above_comment_sharing_first_code_line() {
    let source = fixture("mixed_preamble.ino");
    let result = convert(&source, &ConvertOptions::default()).unwrap();
    assert_eq!(result.output, fixture("mixed_preamble.expected.cpp"));
    assert_eq!(result.insertion_line, Some(6));
}

#[test]
fn test_line_directive_follows_prototypes() {
    let source = fixture("blink_helper.ino");
    let options = ConvertOptions {
        line_directive: Some("blink_helper.ino".into()),
        ..ConvertOptions::default()
    };
    let result = convert(&source, &options).unwrap();
    let lines: Vec<&str> = result.output.lines().collect();
    assert_eq!(lines[7], "void toggle(int pin);");
    assert_eq!(lines[8], "static void wait(unsigned long ms);");
    assert_eq!(lines[9], "#line 8 \"blink_helper.ino\"");
    assert_eq!(lines[10], "const unsigned long PERIOD = 500;");
    assert_eq!(result.line_map.synthetic_lines(), 3);
}

#[test]
fn test_known_prototypes_count_as_declared() {
    let source = fixture("blink_helper.ino");
    let options = ConvertOptions {
        known_prototypes: BTreeSet::from(["toggle".to_string()]),
        ..ConvertOptions::default()
    };
    let result = convert(&source, &options).unwrap();
    assert_eq!(result.injected.len(), 1);
    assert_eq!(result.injected[0].prototype(), "static void wait(unsigned long ms);");
}

#[test]
fn test_prototypes_redeclare_without_conflict() {
    let source = "\
void setup() { say(); tick(); }
void loop() {}
void say(int p = 3) { (void)p; }
unsigned long tick() noexcept { return 0; }
";
    let result = convert(source, &ConvertOptions::default()).unwrap();
    let lines: Vec<&str> = result.output.lines().collect();
    assert_eq!(lines[0], "void say(int p);");
    assert_eq!(lines[1], "unsigned long tick() noexcept;");
    assert_eq!(lines[2], "void setup() { say(); tick(); }");
}

// ---------------------------------------------------------------------------
// Properties over every fixture
// ---------------------------------------------------------------------------

#[test]
fn test_output_line_count_matches_map() {
    for name in FIXTURES {
        let source = fixture(name);
        let result = convert(&source, &ConvertOptions::default()).unwrap();
        assert_eq!(result.line_map.input_lines, count_lines(&source), "{}", name);
        assert_eq!(result.line_map.output_lines, count_lines(&result.output), "{}", name);
        assert_eq!(
            result.line_map.synthetic_lines(),
            result.injected.len(),
            "{}",
            name
        );
    }
}

#[test]
fn test_mapped_lines_are_copied_verbatim() {
    for name in FIXTURES {
        let source = fixture(name);
        let result = convert(&source, &ConvertOptions::default()).unwrap();
        let input: Vec<&str> = source.lines().collect();
        for (i, out_line) in result.output.lines().enumerate() {
            match result.line_map.resolve(i + 1) {
                Some(LineOrigin::Input(n)) => assert_eq!(out_line, input[n - 1], "{}", name),
                Some(LineOrigin::Synthetic { .. }) => assert!(out_line.ends_with(");")),
                None => panic!("{}: output line {} unmapped", name, i + 1),
            }
        }
    }
}

#[test]
fn test_code_tokens_never_overlap_masked_text() {
    for name in FIXTURES {
        let source = fixture(name);
        let text = mask(&source).unwrap();
        assert_eq!(text.as_str().len(), source.len());
        for token in text.tokens() {
            if token.kind == TokenKind::CommentBoundary {
                assert!(token.span.is_empty());
                continue;
            }
            if token.kind == TokenKind::Directive {
                continue;
            }
            assert!(
                text.spans().iter().all(|m| !m.span.overlaps(&token.span)),
                "{}: token {:?} at {} overlaps a masked span",
                name,
                token.text,
                token.span
            );
        }
    }
}

#[test]
fn test_conversion_is_idempotent() {
    for name in FIXTURES {
        let source = fixture(name);
        let once = convert(&source, &ConvertOptions::default()).unwrap();
        let twice = convert(&once.output, &ConvertOptions::default()).unwrap();
        assert_eq!(twice.output, once.output, "{}", name);
        assert!(twice.injected.is_empty());
    }
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_unterminated_string_aborts() {
    let source = "void setup() {\n  Serial.print(\"oops);\n}\n";
    let err = convert(source, &ConvertOptions::default()).unwrap_err();
    match err {
        ConvertError::UnterminatedLiteral { kind, span } => {
            assert_eq!(kind, LiteralKind::String);
            assert_eq!((span.line, span.column), (2, 16));
            assert_eq!(span.len(), 1);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_close_brace_reports_opening_brace() {
    let source = "void setup() {\n  if (x) {\n    go();\n}\n";
    let err = convert(source, &ConvertOptions::default()).unwrap_err();
    match err {
        ConvertError::UnbalancedBraces(BraceFault::UnclosedAtEof { open, .. }) => {
            assert_eq!(open.line, 1);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_braces_inside_literals_do_not_count() {
    let source = "void setup() {\n  char c = '}';\n  const char *s = \"{{\";\n}\nvoid loop() {}\n";
    let result = convert(source, &ConvertOptions::default()).unwrap();
    assert_eq!(result.output, source);
}
