//! Literal masker
//!
//! Blanks out comments and string/character literals so later stages can
//! scan punctuation without caring about what is quoted or commented. The
//! masked buffer has the same byte length and the same newline positions as
//! the source, so every offset and line number carries over unchanged.

use std::ops::Range;

use crate::parse::error::{ConvertError, LiteralKind};
use crate::parse::span::{LineIndex, SourceSpan};

/// Byte written over masked content. Newlines are never replaced.
pub const FILLER: u8 = b' ';

/// What a masked span contained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    LineComment,
    BlockComment,
    StringLiteral,
    CharLiteral,
}

impl MaskKind {
    pub fn is_comment(self) -> bool {
        matches!(self, MaskKind::LineComment | MaskKind::BlockComment)
    }
}

/// A comment or literal span, delimiters included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskedSpan {
    pub kind: MaskKind,
    pub span: SourceSpan,
}

/// Source text paired with its masked rendition
#[derive(Debug, Clone)]
pub struct MaskedText<'a> {
    source: &'a str,
    masked: String,
    spans: Vec<MaskedSpan>,
    lines: LineIndex,
}

#[derive(Clone, Copy)]
enum State {
    Normal,
    LineComment,
    BlockComment,
    StringLiteral,
    CharLiteral,
}

/// Mask every comment and string/character literal in `source`.
///
/// Fails on a block comment, string, or character literal still open at end
/// of input. A line comment may run to end of input.
pub fn mask(source: &str) -> Result<MaskedText<'_>, ConvertError> {
    let bytes = source.as_bytes();
    let lines = LineIndex::new(source);
    let mut spans = Vec::new();
    let mut state = State::Normal;
    let mut open = 0;
    let mut i = 0;
    // Only whitespace since the last newline
    let mut line_start = true;
    // Inside the message of an `#error` or `#warning` line
    let mut diagnostic = false;

    let mut close = |kind: MaskKind, start: usize, end: usize| {
        spans.push(MaskedSpan {
            kind,
            span: lines.span(source, start, end),
        });
    };

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            State::Normal => match (b, next) {
                (b'/', Some(b'/')) => {
                    state = State::LineComment;
                    open = i;
                    i += 2;
                    continue;
                }
                (b'/', Some(b'*')) => {
                    state = State::BlockComment;
                    open = i;
                    i += 2;
                    continue;
                }
                (b'"', _) if !diagnostic => {
                    state = State::StringLiteral;
                    open = i;
                }
                (b'\'', _) if !diagnostic => {
                    state = State::CharLiteral;
                    open = i;
                }
                (b'#', _) if line_start => {
                    diagnostic = is_diagnostic_directive(&bytes[i + 1..]);
                }
                (b'\n', _) => {
                    line_start = true;
                    if !ends_with_splice(&bytes[..i]) {
                        diagnostic = false;
                    }
                    i += 1;
                    continue;
                }
                _ => {}
            },
            State::LineComment => match (b, next) {
                // Backslash-newline splices the next line into the comment
                (b'\\', Some(b'\n')) => {
                    i += 2;
                    continue;
                }
                (b'\\', Some(b'\r')) if bytes.get(i + 2) == Some(&b'\n') => {
                    i += 3;
                    continue;
                }
                (b'\n', _) => {
                    close(MaskKind::LineComment, open, i);
                    state = State::Normal;
                    diagnostic = false;
                    line_start = true;
                    i += 1;
                    continue;
                }
                _ => {}
            },
            State::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    close(MaskKind::BlockComment, open, i + 2);
                    state = State::Normal;
                    i += 2;
                    continue;
                }
            }
            State::StringLiteral | State::CharLiteral => {
                let (quote, kind) = match state {
                    State::StringLiteral => (b'"', MaskKind::StringLiteral),
                    _ => (b'\'', MaskKind::CharLiteral),
                };
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == quote {
                    close(kind, open, i + 1);
                    state = State::Normal;
                }
            }
        }
        if !b.is_ascii_whitespace() {
            line_start = false;
        }
        i += 1;
    }

    let unterminated = match state {
        State::Normal => None,
        State::LineComment => {
            close(MaskKind::LineComment, open, bytes.len());
            None
        }
        State::BlockComment => Some(LiteralKind::BlockComment),
        State::StringLiteral => Some(LiteralKind::String),
        State::CharLiteral => Some(LiteralKind::Char),
    };
    if let Some(kind) = unterminated {
        let width = match kind {
            LiteralKind::BlockComment => 2,
            _ => 1,
        };
        return Err(ConvertError::UnterminatedLiteral {
            kind,
            span: lines.span(source, open, open + width),
        });
    }

    let masked = render_masked(source, &spans);
    log::debug!(
        "masked {} span(s) across {} byte(s)",
        spans.len(),
        source.len()
    );

    Ok(MaskedText {
        source,
        masked,
        spans,
        lines,
    })
}

/// Whether the directive after a line-leading `#` is `error` or `warning`,
/// whose message is free text where a lone quote is not a literal.
fn is_diagnostic_directive(rest: &[u8]) -> bool {
    let start = rest
        .iter()
        .position(|b| *b != b' ' && *b != b'\t')
        .unwrap_or(rest.len());
    let word_len = rest[start..]
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
        .unwrap_or(rest.len() - start);
    matches!(&rest[start..start + word_len], b"error" | b"warning")
}

/// Whether the line ending here is continued by a trailing backslash.
fn ends_with_splice(before: &[u8]) -> bool {
    matches!(before, [.., b'\\', b'\r'] | [.., b'\\'])
}

/// Copy `source`, replacing every non-newline byte inside a span with [`FILLER`].
fn render_masked(source: &str, spans: &[MaskedSpan]) -> String {
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;
    for m in spans {
        out.push_str(&source[pos..m.span.start]);
        for b in source[m.span.range()].bytes() {
            out.push(if b == b'\n' { '\n' } else { FILLER as char });
        }
        pos = m.span.end;
    }
    out.push_str(&source[pos..]);
    out
}

impl<'a> MaskedText<'a> {
    /// The original, unmasked text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn as_str(&self) -> &str {
        &self.masked
    }

    /// Masked spans in source order. Spans never overlap.
    pub fn spans(&self) -> &[MaskedSpan] {
        &self.spans
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// The masked span containing `offset`, if any.
    pub fn span_at(&self, offset: usize) -> Option<&MaskedSpan> {
        let idx = self.spans.partition_point(|m| m.span.end <= offset);
        self.spans.get(idx).filter(|m| m.span.contains(offset))
    }

    pub fn is_masked(&self, offset: usize) -> bool {
        self.span_at(offset).is_some()
    }

    /// Spans overlapping `range`, in source order.
    pub fn spans_in(&self, range: Range<usize>) -> &[MaskedSpan] {
        let first = self.spans.partition_point(|m| m.span.end <= range.start);
        let last = self.spans.partition_point(|m| m.span.start < range.end);
        &self.spans[first..last.max(first)]
    }

    /// Original text of `range` normalised to a single line of code.
    ///
    /// Comments become a single space, string and character literals are kept
    /// verbatim, and whitespace runs elsewhere collapse to one space.
    pub fn code_text(&self, range: Range<usize>) -> String {
        let mut out = String::new();
        let mut pending_space = false;
        let mut pos = range.start;

        for m in self.spans_in(range.clone()) {
            let start = m.span.start.max(range.start);
            let end = m.span.end.min(range.end);
            if pos < start {
                push_collapsed(&mut out, &mut pending_space, &self.source[pos..start]);
            }
            if m.kind.is_comment() {
                pending_space = true;
            } else {
                flush_space(&mut out, &mut pending_space);
                out.push_str(&self.source[start..end]);
            }
            pos = end.max(pos);
        }
        if pos < range.end {
            push_collapsed(&mut out, &mut pending_space, &self.source[pos..range.end]);
        }
        out
    }
}

fn flush_space(out: &mut String, pending_space: &mut bool) {
    if *pending_space && !out.is_empty() {
        out.push(' ');
    }
    *pending_space = false;
}

fn push_collapsed(out: &mut String, pending_space: &mut bool, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            *pending_space = true;
        } else {
            flush_space(out, pending_space);
            out.push(c);
        }
    }
}
