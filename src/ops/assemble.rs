//! Prototype assembly
//!
//! Splices prototype lines into the original text at the first substantive
//! top-level line and records how output lines map back to input lines.
//! Original bytes are copied untouched.

use crate::model::conversion::ConversionResult;
use crate::model::line_map::LineMap;
use crate::model::signature::FunctionSignature;
use crate::model::token::TokenKind;
use crate::parse::mask::MaskedText;
use crate::parse::span::count_lines;

/// 1-indexed line prototypes go before: the first line holding code that is
/// not a directive. `None` if the text holds nothing but comments,
/// directives and blank lines.
pub fn insertion_line(text: &MaskedText<'_>) -> Option<usize> {
    let mut leading_comments = 0;
    let first = text.tokens().find(|t| match t.kind {
        TokenKind::CommentBoundary => {
            leading_comments += 1;
            false
        }
        TokenKind::Directive => false,
        _ => true,
    })?;

    // Never insert inside a block comment that ends on the same line as the code
    let index = text.line_index();
    let mut line = first.span.line;
    while let Some(comment) = index.line_start(line).and_then(|start| {
        text.span_at(start)
            .filter(|m| m.kind.is_comment() && m.span.start < start)
    }) {
        line = comment.span.line;
    }

    log::debug!(
        "insertion point at line {} after {} leading comment(s)",
        line,
        leading_comments
    );
    Some(line)
}

/// Line ending used for inserted lines: whatever the first line ends with.
fn line_ending(source: &str) -> &'static str {
    match source.find('\n') {
        Some(i) if i > 0 && source.as_bytes()[i - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

/// Render a `#line` directive pointing back at `line` of `label`.
fn line_directive(line: usize, label: &str) -> String {
    let escaped = label.replace('\\', "\\\\").replace('"', "\\\"");
    format!("#line {} \"{}\"", line, escaped)
}

/// Build the translation unit from `text` and the signatures needing prototypes.
///
/// With no signatures the output is the input, byte for byte.
pub fn assemble(
    text: &MaskedText<'_>,
    signatures: Vec<FunctionSignature>,
    directive_label: Option<&str>,
) -> ConversionResult {
    let source = text.source();
    let input_lines = count_lines(source);

    let line = match insertion_line(text) {
        Some(line) if !signatures.is_empty() => line,
        _ => {
            return ConversionResult {
                output: source.to_string(),
                line_map: LineMap::identity(input_lines),
                injected: Vec::new(),
                insertion_line: None,
            };
        }
    };

    let eol = line_ending(source);
    let at = text
        .line_index()
        .line_start(line)
        .unwrap_or(source.len());

    let mut block = String::new();
    let mut inserted = 0;
    for sig in &signatures {
        block.push_str(&sig.prototype());
        block.push_str(eol);
        inserted += 1;
    }
    if let Some(label) = directive_label {
        block.push_str(&line_directive(line, label));
        block.push_str(eol);
        inserted += 1;
    }

    let mut output = String::with_capacity(source.len() + block.len());
    output.push_str(&source[..at]);
    output.push_str(&block);
    output.push_str(&source[at..]);

    log::debug!(
        "inserted {} line(s) before input line {}",
        inserted,
        line
    );

    ConversionResult {
        output,
        line_map: LineMap::with_insertion(input_lines, line, inserted),
        injected: signatures,
        insertion_line: Some(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::mask::mask;
    use crate::parse::span::SourceSpan;
    use pretty_assertions::assert_eq;

    fn sig(return_type: &str, name: &str, params: &str) -> FunctionSignature {
        FunctionSignature {
            return_type: return_type.into(),
            name: name.into(),
            params: params.into(),
            qualifiers: String::new(),
            span: SourceSpan::new(0, 0, 1, 1),
            declared: false,
        }
    }

    fn line_of(source: &str) -> Option<usize> {
        insertion_line(&mask(source).unwrap())
    }

    #[test]
    fn test_insertion_after_comment_and_directives() {
        let source = "/*\n  Blink\n*/\n\n#include <Servo.h>\n#define PIN \\\n  13\n\n// state\nint level = 0;\n";
        assert_eq!(line_of(source), Some(10));
    }

    #[test]
    fn test_insertion_moves_above_comment_ending_on_code_line() {
        let source = "// head\n/* long\n   note */ int level;\n";
        assert_eq!(line_of(source), Some(2));
    }

    #[test]
    fn test_insertion_line_none_without_code() {
        assert_eq!(line_of("// only\n#include <x.h>\n\n"), None);
        assert_eq!(line_of(""), None);
    }

    #[test]
    fn test_assemble_without_signatures_is_identity() {
        let source = "/* c */\nvoid setup() {}\nvoid loop() {}";
        let text = mask(source).unwrap();
        let result = assemble(&text, Vec::new(), Some("sketch.ino"));
        assert_eq!(result.output, source);
        assert_eq!(result.line_map, LineMap::identity(3));
        assert_eq!(result.insertion_line, None);
    }

    #[test]
    fn test_assemble_inserts_whole_lines() {
        let source = "// Blink\n\n#include <Arduino.h>\nvoid setup() { blink(); }\nvoid loop() {}\nvoid blink() {}\n";
        let text = mask(source).unwrap();
        let result = assemble(&text, vec![sig("void", "blink", "")], None);
        assert_eq!(
            result.output,
            "// Blink\n\n#include <Arduino.h>\nvoid blink();\nvoid setup() { blink(); }\nvoid loop() {}\nvoid blink() {}\n"
        );
        assert_eq!(result.insertion_line, Some(4));
        assert_eq!(result.line_map.output_lines, 7);
        assert_eq!(
            result.line_map.resolve(4),
            Some(crate::model::line_map::LineOrigin::Synthetic { after: 3 })
        );
    }

    #[test]
    fn test_assemble_with_line_directive() {
        let source = "int f() { return g(); }\nint g() { return 1; }\n";
        let text = mask(source).unwrap();
        let result = assemble(&text, vec![sig("int", "g", "")], Some("dir\\my \"sketch\".ino"));
        assert_eq!(
            result.output,
            "int g();\n#line 1 \"dir\\\\my \\\"sketch\\\".ino\"\nint f() { return g(); }\nint g() { return 1; }\n"
        );
        assert_eq!(result.line_map.synthetic_lines(), 2);
    }

    #[test]
    fn test_assemble_keeps_crlf() {
        let source = "// x\r\nvoid a() { b(); }\r\nvoid b() {}\r\n";
        let text = mask(source).unwrap();
        let result = assemble(&text, vec![sig("void", "b", "")], None);
        assert_eq!(
            result.output,
            "// x\r\nvoid b();\r\nvoid a() { b(); }\r\nvoid b() {}\r\n"
        );
    }

    #[test]
    fn test_assemble_without_trailing_newline() {
        let source = "void a() { b(); }\nvoid b() {}";
        let text = mask(source).unwrap();
        let result = assemble(&text, vec![sig("void", "b", "")], None);
        assert_eq!(result.output, "void b();\nvoid a() { b(); }\nvoid b() {}");
        assert_eq!(count_lines(&result.output), 3);
    }
}
