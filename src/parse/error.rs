use std::fmt;

use crate::parse::span::SourceSpan;

/// Kind of span the masker could not close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    BlockComment,
    String,
    Char,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralKind::BlockComment => write!(f, "block comment"),
            LiteralKind::String => write!(f, "string literal"),
            LiteralKind::Char => write!(f, "character literal"),
        }
    }
}

/// Where brace balancing broke down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceFault {
    /// A `}` with no matching `{`
    UnexpectedClose { span: SourceSpan },
    /// End of input reached with `open` still unclosed. `eof` is the input length.
    UnclosedAtEof { open: SourceSpan, eof: usize },
}

impl BraceFault {
    /// The span diagnostics should point at.
    pub fn span(&self) -> SourceSpan {
        match self {
            BraceFault::UnexpectedClose { span } => *span,
            BraceFault::UnclosedAtEof { open, .. } => *open,
        }
    }
}

impl fmt::Display for BraceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BraceFault::UnexpectedClose { span } => {
                write!(f, "{}: unbalanced braces: '}}' has no matching '{{'", span)
            }
            BraceFault::UnclosedAtEof { open, .. } => write!(
                f,
                "{}: unbalanced braces: '{{' is never closed before end of file",
                open
            ),
        }
    }
}

/// Error type for a single sketch conversion. Both kinds abort the conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("{span}: unterminated {kind}")]
    UnterminatedLiteral { kind: LiteralKind, span: SourceSpan },
    #[error("{0}")]
    UnbalancedBraces(BraceFault),
}

impl ConvertError {
    pub fn span(&self) -> SourceSpan {
        match self {
            ConvertError::UnterminatedLiteral { span, .. } => *span,
            ConvertError::UnbalancedBraces(fault) => fault.span(),
        }
    }
}
