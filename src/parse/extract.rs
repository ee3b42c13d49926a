//! Prototype extraction
//!
//! Pattern-matches top-level statements of the shape
//! `<type-spec> <name> ( <params> ) {` without resolving any types. A match
//! ending in `;` instead of `{` is an existing prototype.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::model::signature::FunctionSignature;
use crate::model::token::TokenKind;
use crate::parse::depth::{Annotated, annotate};
use crate::parse::error::ConvertError;
use crate::parse::mask::{MaskedText, mask};

/// Names that take a parenthesized condition but never name a function.
pub const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "return", "sizeof", "catch", "defined",
];

/// Everything the extractor learned about one text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Top-level definitions in file order of first occurrence
    pub definitions: Vec<FunctionSignature>,
    /// Names declared by a prototype somewhere in the text
    pub prototypes: BTreeSet<String>,
}

impl Extraction {
    /// Definitions that still need a prototype, in file order.
    pub fn to_inject(&self) -> Vec<FunctionSignature> {
        self.definitions
            .iter()
            .filter(|sig| !sig.declared)
            .cloned()
            .collect()
    }
}

/// A matched `name ( params )` head and what follows it
enum Head {
    Prototype { name: String },
    Definition(FunctionSignature),
}

struct Extractor<'t, 'a> {
    text: &'t MaskedText<'a>,
    code: Vec<&'t Annotated<'a>>,
}

/// Scan annotated tokens for function definitions and prototypes.
///
/// Names in `predeclared` (entry points, prototypes from shared headers) are
/// treated as already declared, exactly like a prototype in the text.
pub fn extract<'a>(
    text: &MaskedText<'a>,
    tokens: &[Annotated<'a>],
    predeclared: &BTreeSet<String>,
) -> Extraction {
    let extractor = Extractor {
        text,
        code: tokens.iter().filter(|a| !a.token.is_trivia()).collect(),
    };
    let (definitions, prototypes) = extractor.scan();

    let definitions: Vec<FunctionSignature> = definitions
        .into_values()
        .map(|mut sig| {
            sig.declared = prototypes.contains(&sig.name) || predeclared.contains(&sig.name);
            sig
        })
        .collect();

    log::debug!(
        "found {} definition(s), {} prototype(s)",
        definitions.len(),
        prototypes.len()
    );

    Extraction {
        definitions,
        prototypes,
    }
}

/// Names of all functions prototyped in `source`, e.g. a shared header.
pub fn declared_names(source: &str) -> Result<BTreeSet<String>, ConvertError> {
    let text = mask(source)?;
    let tokens = annotate(&text)?;
    Ok(extract(&text, &tokens, &BTreeSet::new()).prototypes)
}

impl<'t, 'a> Extractor<'t, 'a> {
    fn kind(&self, i: usize) -> Option<TokenKind> {
        self.code.get(i).map(|a| a.token.kind)
    }

    fn scan(&self) -> (IndexMap<(String, String), FunctionSignature>, BTreeSet<String>) {
        let mut definitions = IndexMap::new();
        let mut prototypes = BTreeSet::new();
        let mut stmt_start = 0;
        let mut dead = false;
        let mut i = 0;

        while i < self.code.len() {
            let a = self.code[i];
            let kind = a.token.kind;

            // The brace closing a top-level body ends a statement
            if kind == TokenKind::CloseBrace && a.depth == 1 {
                stmt_start = i + 1;
                dead = false;
                i += 1;
                continue;
            }
            if !a.is_top_level() {
                i += 1;
                continue;
            }

            match kind {
                TokenKind::Semicolon | TokenKind::Directive | TokenKind::OpenBrace => {
                    stmt_start = i + 1;
                    dead = false;
                    i += 1;
                }
                TokenKind::OpenParen if !dead => {
                    dead = true;
                    match self.match_head(stmt_start, i) {
                        Some((Head::Prototype { name }, next)) => {
                            prototypes.insert(name);
                            i = next;
                        }
                        Some((Head::Definition(sig), next)) => {
                            definitions
                                .entry((sig.name.clone(), sig.params.clone()))
                                .or_insert(sig);
                            i = next;
                        }
                        None => i += 1,
                    }
                }
                _ => i += 1,
            }
        }
        (definitions, prototypes)
    }

    /// Try to match a function head whose parameter list opens at `open`.
    ///
    /// On success returns the head and the index of its terminating `;` or
    /// `{`, which the caller still has to process as a statement boundary.
    fn match_head(&self, stmt_start: usize, open: usize) -> Option<(Head, usize)> {
        let prefix = &self.code[stmt_start..open];
        let (name_tok, type_spec) = prefix.split_last()?;
        if name_tok.token.kind != TokenKind::Identifier
            || CONTROL_KEYWORDS.contains(&name_tok.token.text)
            || type_spec.is_empty()
            || type_spec.last().is_some_and(|t| t.token.is_punct("::"))
            || !is_type_spec(type_spec)
        {
            return None;
        }

        let close = self.matching_paren(open)?;
        let end = self.skip_qualifiers(close + 1)?;
        let name = name_tok.token.text.to_string();

        match self.kind(end)? {
            TokenKind::Semicolon => Some((Head::Prototype { name }, end)),
            TokenKind::OpenBrace => {
                let first = &self.code[stmt_start].token;
                let brace = &self.code[end].token;
                let return_type = self.text.code_text(first.span.start..name_tok.token.span.start);
                let params = self.params_text(open, close);
                let qualifiers = self
                    .text
                    .code_text(self.code[close].token.span.end..brace.span.start);
                let span = self
                    .text
                    .line_index()
                    .span(self.text.source(), first.span.start, brace.span.end);
                Some((
                    Head::Definition(FunctionSignature {
                        return_type,
                        name,
                        params,
                        qualifiers,
                        span,
                        declared: false,
                    }),
                    end,
                ))
            }
            _ => None,
        }
    }

    /// Index of the `)` balancing the `(` at `open`. Gives up at a top-level
    /// `;` or directive, which cannot appear inside a parameter list.
    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut parens = 0usize;
        for (i, a) in self.code.iter().enumerate().skip(open) {
            match a.token.kind {
                TokenKind::OpenParen => parens += 1,
                TokenKind::CloseParen => {
                    parens -= 1;
                    if parens == 0 {
                        return Some(i);
                    }
                }
                TokenKind::Semicolon | TokenKind::Directive if a.is_top_level() => return None,
                _ => {}
            }
        }
        None
    }

    /// Parameter list between the parens at `open` and `close`, with default
    /// arguments removed. A default may only be given once, so the prototype
    /// must not repeat what the definition already says.
    fn params_text(&self, open: usize, close: usize) -> String {
        let mut out = String::new();
        let mut seg_start = self.code[open].token.span.end;
        let mut nesting = 0usize;
        let mut in_default = false;

        for a in &self.code[open + 1..close] {
            let token = &a.token;
            match token.kind {
                TokenKind::OpenParen | TokenKind::OpenBrace => nesting += 1,
                TokenKind::CloseParen | TokenKind::CloseBrace => {
                    nesting = nesting.saturating_sub(1)
                }
                TokenKind::Punctuation if token.text == "[" => nesting += 1,
                TokenKind::Punctuation if token.text == "]" => {
                    nesting = nesting.saturating_sub(1)
                }
                TokenKind::Punctuation if nesting == 0 && token.text == "=" && !in_default => {
                    out.push_str(&self.text.code_text(seg_start..token.span.start));
                    in_default = true;
                }
                TokenKind::Punctuation if nesting == 0 && token.text == "," && in_default => {
                    seg_start = token.span.start;
                    in_default = false;
                }
                _ => {}
            }
        }
        if !in_default {
            out.push_str(
                &self
                    .text
                    .code_text(seg_start..self.code[close].token.span.start),
            );
        }
        out
    }

    /// Skip trailing qualifiers such as `const`, `noexcept(false)` or
    /// `__attribute__((weak))` after a parameter list.
    fn skip_qualifiers(&self, mut i: usize) -> Option<usize> {
        while self.kind(i) == Some(TokenKind::Identifier) {
            i += 1;
            if self.kind(i) == Some(TokenKind::OpenParen) {
                i = self.matching_paren(i)? + 1;
            }
        }
        Some(i)
    }
}

/// Whether `tokens` can form the return-type part of a function head.
fn is_type_spec(tokens: &[&Annotated<'_>]) -> bool {
    let mut angle = 0usize;
    for a in tokens {
        let token = &a.token;
        let ok = match token.kind {
            TokenKind::Identifier => true,
            TokenKind::Punctuation => match token.text {
                "*" | "&" | "::" => true,
                "<" => {
                    angle += 1;
                    true
                }
                ">" => match angle.checked_sub(1) {
                    Some(rest) => {
                        angle = rest;
                        true
                    }
                    None => false,
                },
                "," => angle > 0,
                _ => false,
            },
            TokenKind::Other => angle > 0,
            _ => false,
        };
        if !ok {
            return false;
        }
    }
    angle == 0
}
