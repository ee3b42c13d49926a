use serde::Serialize;

use crate::model::conversion::ConversionResult;
use crate::model::line_map::LineOrigin;
use crate::model::signature::FunctionSignature;
use crate::parse::error::ConvertError;
use crate::util::unicode::{column_to_display_col, expand_tabs};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SignatureJson {
    pub name: String,
    pub return_type: String,
    pub params: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub qualifiers: String,
    pub prototype: String,
    pub line: usize,
    pub column: usize,
    pub declared: bool,
}

#[derive(Serialize)]
pub struct ConvertJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insertion_line: Option<usize>,
    pub input_lines: usize,
    pub output_lines: usize,
    pub injected: Vec<SignatureJson>,
}

#[derive(Serialize)]
pub struct ResolveJson {
    pub output_line: usize,
    pub origin: LineOrigin,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn signature_to_json(sig: &FunctionSignature) -> SignatureJson {
    SignatureJson {
        name: sig.name.clone(),
        return_type: sig.return_type.clone(),
        params: sig.params.clone(),
        qualifiers: sig.qualifiers.clone(),
        prototype: sig.prototype(),
        line: sig.span.line,
        column: sig.span.column,
        declared: sig.declared,
    }
}

pub fn conversion_to_json(
    result: &ConversionResult,
    output_path: Option<String>,
    include_text: bool,
) -> ConvertJson {
    ConvertJson {
        output_path,
        text: include_text.then(|| result.output.clone()),
        insertion_line: result.insertion_line,
        input_lines: result.line_map.input_lines,
        output_lines: result.line_map.output_lines,
        injected: result.injected.iter().map(signature_to_json).collect(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `12:1  void blink(int pin);` with a `[declared]` marker when no prototype is needed.
pub fn format_signature_line(sig: &FunctionSignature) -> String {
    let location = format!("{}:{}", sig.span.line, sig.span.column);
    let marker = if sig.declared { "  [declared]" } else { "" };
    format!("{:<7} {}{}", location, sig.prototype(), marker)
}

pub fn format_origin(output_line: usize, origin: LineOrigin) -> String {
    match origin {
        LineOrigin::Input(line) => format!("{} -> {}", output_line, line),
        LineOrigin::Synthetic { after: 0 } => {
            format!("{} -> inserted before line 1", output_line)
        }
        LineOrigin::Synthetic { after } => {
            format!("{} -> inserted after line {}", output_line, after)
        }
    }
}

/// Render a conversion error with the offending source line and a caret.
///
/// ```text
/// blink.ino:2:1: unterminated block comment
///   |
/// 2 | /* unterminated
///   | ^
/// ```
pub fn format_convert_error(path: &str, source: &str, err: &ConvertError) -> String {
    let span = err.span();
    let line_text = source.lines().nth(span.line.saturating_sub(1)).unwrap_or("");
    let gutter = " ".repeat(span.line.to_string().len());
    let pad = " ".repeat(column_to_display_col(line_text, span.column));
    format!(
        "{}:{}\n{} |\n{} | {}\n{} | {}^",
        path,
        err,
        gutter,
        span.line,
        expand_tabs(line_text),
        gutter,
        pad
    )
}
