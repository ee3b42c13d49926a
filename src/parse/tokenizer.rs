//! Tokenizer over masked sketch text
//!
//! Masked comments and literals read as whitespace, so the tokenizer only
//! sees code. It never fails: anything without a known shape becomes
//! [`TokenKind::Other`].

use crate::model::token::{Token, TokenKind};
use crate::parse::mask::{MaskedSpan, MaskedText};

/// Lazy token stream. Clone it to restart from the same position.
#[derive(Debug, Clone)]
pub struct Tokens<'t, 'a> {
    text: &'t MaskedText<'a>,
    pos: usize,
    /// Index of the next masked span that could produce a comment boundary
    next_span: usize,
    /// No token has been emitted on the current line yet
    at_line_start: bool,
}

impl<'a> MaskedText<'a> {
    /// A fresh token stream from the start of the text.
    pub fn tokens(&self) -> Tokens<'_, 'a> {
        Tokens {
            text: self,
            pos: 0,
            next_span: 0,
            at_line_start: true,
        }
    }
}

impl<'t, 'a> Tokens<'t, 'a> {
    fn masked(&self) -> &'t str {
        self.text.as_str()
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
        let source = self.text.source();
        Token {
            kind,
            span: self.text.line_index().span(source, start, end),
            text: &source[start..end],
        }
    }

    /// The comment span starting exactly at the current position, if it has
    /// not been reported yet.
    fn pending_comment(&mut self) -> Option<MaskedSpan> {
        let spans = self.text.spans();
        while self.next_span < spans.len() && spans[self.next_span].span.start < self.pos {
            self.next_span += 1;
        }
        let span = spans.get(self.next_span).copied()?;
        if span.span.start == self.pos {
            self.next_span += 1;
            if span.kind.is_comment() {
                return Some(span);
            }
        }
        None
    }

    /// End of a directive starting at `start`: the first newline that is not
    /// escaped by a backslash and not inside a block comment.
    fn directive_end(&self, start: usize) -> usize {
        let bytes = self.masked().as_bytes();
        let mut i = start;
        while i < bytes.len() {
            if bytes[i] == b'\n' && !self.text.is_masked(i) {
                let mut before = i;
                if before > start && bytes[before - 1] == b'\r' {
                    before -= 1;
                }
                if before > start && bytes[before - 1] == b'\\' {
                    i += 1;
                    continue;
                }
                return before;
            }
            i += 1;
        }
        bytes.len()
    }
}

impl<'t, 'a> Iterator for Tokens<'t, 'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let masked = self.masked();

        // Skip whitespace and filler, stopping to report comment starts
        loop {
            if let Some(comment) = self.pending_comment() {
                let start = comment.span.start;
                return Some(self.token(TokenKind::CommentBoundary, start, start));
            }
            match masked[self.pos..].chars().next() {
                Some(c) if c.is_whitespace() => {
                    if c == '\n' {
                        self.at_line_start = true;
                    }
                    self.pos += c.len_utf8();
                }
                Some(_) => break,
                None => return None,
            }
        }

        let start = self.pos;
        let rest = &masked[start..];
        let c = rest.chars().next()?;

        if c == '#' && self.at_line_start {
            let end = self.directive_end(start);
            self.pos = end;
            return Some(self.token(TokenKind::Directive, start, end));
        }
        self.at_line_start = false;

        let (kind, len) = if c == '_' || c.is_alphabetic() {
            let len = rest
                .char_indices()
                .find(|&(_, ch)| !(ch == '_' || ch.is_alphanumeric()))
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            (TokenKind::Identifier, len)
        } else if c.is_ascii_digit() {
            let len = rest
                .char_indices()
                .find(|&(_, ch)| !(ch == '_' || ch == '.' || ch.is_ascii_alphanumeric()))
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            (TokenKind::Other, len)
        } else {
            match c {
                '{' => (TokenKind::OpenBrace, 1),
                '}' => (TokenKind::CloseBrace, 1),
                '(' => (TokenKind::OpenParen, 1),
                ')' => (TokenKind::CloseParen, 1),
                ';' => (TokenKind::Semicolon, 1),
                ':' if rest.starts_with("::") => (TokenKind::Punctuation, 2),
                c if c.is_ascii_punctuation() => (TokenKind::Punctuation, 1),
                c => (TokenKind::Other, c.len_utf8()),
            }
        };

        self.pos = start + len;
        Some(self.token(kind, start, start + len))
    }
}
