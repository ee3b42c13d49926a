use crate::parse::span::SourceSpan;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    /// Any ASCII punctuation other than braces, parens and `;`. `::` is one token.
    Punctuation,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    Semicolon,
    /// Numbers and anything the tokenizer has no shape for
    Other,
    /// A whole preprocessor line, continuations included
    Directive,
    /// Zero-width marker at the start of a comment
    CommentBoundary,
}

/// A classified slice of the sketch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub span: SourceSpan,
    /// The original text covered by `span`
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == text
    }

    /// Tokens that carry no code of their own.
    pub fn is_trivia(&self) -> bool {
        self.kind == TokenKind::CommentBoundary
    }
}
