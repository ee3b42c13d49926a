//! Brace-depth tracking
//!
//! Wraps a token stream and tags every token with the nesting depth in
//! effect before it, which is how the extractor tells top-level statements
//! from function bodies.

use crate::model::token::{Token, TokenKind};
use crate::parse::error::{BraceFault, ConvertError};
use crate::parse::mask::MaskedText;
use crate::parse::span::SourceSpan;

/// A token with the brace depth before it was consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotated<'a> {
    pub token: Token<'a>,
    pub depth: usize,
}

impl<'a> Annotated<'a> {
    pub fn is_top_level(&self) -> bool {
        self.depth == 0
    }
}

/// Iterator adapter yielding [`Annotated`] tokens, or the first brace fault.
#[derive(Debug, Clone)]
pub struct DepthTracker<I> {
    tokens: I,
    /// Spans of the currently open braces, outermost first
    open: Vec<SourceSpan>,
    eof: usize,
    done: bool,
}

impl<I> DepthTracker<I> {
    /// `eof` is the input length, reported when braces are left open.
    pub fn new(tokens: I, eof: usize) -> Self {
        DepthTracker {
            tokens,
            open: Vec::new(),
            eof,
            done: false,
        }
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }
}

impl<'a, I> Iterator for DepthTracker<I>
where
    I: Iterator<Item = Token<'a>>,
{
    type Item = Result<Annotated<'a>, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(token) = self.tokens.next() else {
            self.done = true;
            return self.open.first().map(|&open| {
                Err(ConvertError::UnbalancedBraces(BraceFault::UnclosedAtEof {
                    open,
                    eof: self.eof,
                }))
            });
        };

        let depth = self.depth();
        match token.kind {
            TokenKind::OpenBrace => self.open.push(token.span),
            TokenKind::CloseBrace => {
                if self.open.pop().is_none() {
                    self.done = true;
                    return Some(Err(ConvertError::UnbalancedBraces(
                        BraceFault::UnexpectedClose { span: token.span },
                    )));
                }
            }
            _ => {}
        }
        Some(Ok(Annotated { token, depth }))
    }
}

/// Tokenize `text` and annotate every token with its brace depth.
pub fn annotate<'a>(text: &MaskedText<'a>) -> Result<Vec<Annotated<'a>>, ConvertError> {
    let annotated = DepthTracker::new(text.tokens(), text.source().len())
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("annotated {} token(s)", annotated.len());
    Ok(annotated)
}
