//! Token composition
//!
//!     Assembles the multi-part constructs of the compact syntax from the single-unit
//!     tokens of [base_tokenization](super::base_tokenization):
//!
//!         default namespace <rest of line>    DEFAULT_NS "<rest>"
//!         namespace <rest of line>            NS "<rest>"
//!         datatypes PREFIX = <rest of line>   DATATYPES "<rest>"
//!         include "path"                      INCLUDE "path"
//!         "a" ~ "b" ~ ...                     LITERAL "a b ..."
//!         { pattern = "value" }               PATTERN "value"
//!         xsd:TYPE                            DATATAG "TYPE"
//!         NAME =                              DEFINE "NAME"
//!
//!     Everything else is classified one to one. A composed token spans from the start of
//!     its first part to the end of its last part. Declarations take the rest of their
//!     source line, so every raw token starting before the line end is consumed by them.

use crate::rnc::lexing::base_tokenization::RawToken;
use crate::rnc::token::{Token, TokenKind, TokenStream};
use std::ops::Range;
use tracing::trace;

type RawStream = [(RawToken, Range<usize>)];

/// Compose raw tokens of a (preprocessed) `source` into the token stream.
pub fn compose_tokens(raw: &RawStream, source: &str) -> TokenStream {
    let mut tokens = TokenStream::with_capacity(raw.len());
    let mut idx = 0;

    while idx < raw.len() {
        let (token, consumed) = compose_at(raw, idx, source);
        match token {
            Some(token) => tokens.push(token),
            None => trace!(offset = raw[idx].1.start, "dropping connector"),
        }
        idx += consumed.max(1);
    }

    tokens
}

/// Compose the token starting at `idx`, returning it and the number of raw tokens used.
fn compose_at(raw: &RawStream, idx: usize, source: &str) -> (Option<(Token, Range<usize>)>, usize) {
    let (first, range) = &raw[idx];
    let ident_at = |offset: usize| raw.get(idx + offset).and_then(|(token, _)| token.ident());
    let is_at = |offset: usize, expected: &RawToken| {
        matches!(raw.get(idx + offset), Some((token, _)) if same_kind(token, expected))
    };

    match first {
        RawToken::Ident(ident) => match ident.as_str() {
            "default" if ident_at(1) == Some("namespace") => {
                let after = raw[idx + 1].1.end;
                declaration(raw, idx, TokenKind::DefaultNamespace, range.start, after, source)
            }
            "namespace" if !rest_of_line(source, range.end).0.is_empty() => {
                declaration(raw, idx, TokenKind::Namespace, range.start, range.end, source)
            }
            "datatypes" if ident_at(1).is_some() && is_at(2, &RawToken::Equal) => {
                let after = raw[idx + 2].1.end;
                declaration(raw, idx, TokenKind::Datatypes, range.start, after, source)
            }
            "include" => match raw.get(idx + 1) {
                Some((RawToken::Literal(path), end)) => (
                    Some((
                        Token::new(TokenKind::Include, path.clone()),
                        range.start..end.end,
                    )),
                    2,
                ),
                _ => single(first, range),
            },
            "xsd" if is_at(1, &RawToken::Colon)
                && is_adjacent(raw, idx)
                && is_adjacent(raw, idx + 1) =>
            {
                match raw.get(idx + 2) {
                    Some((RawToken::Ident(tag), end)) => (
                        Some((Token::new(TokenKind::DataTag, tag.clone()), range.start..end.end)),
                        3,
                    ),
                    _ => single(first, range),
                }
            }
            name if is_at(1, &RawToken::Equal) => define(name, range.start, &raw[idx + 1].1),
            _ => single(first, range),
        },
        RawToken::EscapedName(name) if is_at(1, &RawToken::Equal) => {
            define(name, range.start, &raw[idx + 1].1)
        }
        RawToken::Literal(_) => concatenate(raw, idx),
        RawToken::BeginBody => match pattern_parameter(raw, idx) {
            Some(composed) => composed,
            None => single(first, range),
        },
        _ => single(first, range),
    }
}

fn single(raw: &RawToken, range: &Range<usize>) -> (Option<(Token, Range<usize>)>, usize) {
    (raw.clone().into_token().map(|token| (token, range.clone())), 1)
}

fn define(name: &str, start: usize, equal: &Range<usize>) -> (Option<(Token, Range<usize>)>, usize) {
    (
        Some((Token::new(TokenKind::Define, name), start..equal.end)),
        2,
    )
}

fn same_kind(token: &RawToken, expected: &RawToken) -> bool {
    std::mem::discriminant(token) == std::mem::discriminant(expected)
}

/// Whether the raw token after `idx` starts right where the one at `idx` ends.
fn is_adjacent(raw: &RawStream, idx: usize) -> bool {
    match (raw.get(idx), raw.get(idx + 1)) {
        (Some((_, left)), Some((_, right))) => left.end == right.start,
        _ => false,
    }
}

/// Trimmed text from `from` to the end of its line, and the offset of that line end.
fn rest_of_line(source: &str, from: usize) -> (&str, usize) {
    let tail = &source[from..];
    let end = tail.find('\n').map_or(source.len(), |len| from + len);
    (source[from..end].trim(), end)
}

/// A declaration whose value is the rest of the line after `value_from`.
fn declaration(
    raw: &RawStream,
    idx: usize,
    kind: TokenKind,
    start: usize,
    value_from: usize,
    source: &str,
) -> (Option<(Token, Range<usize>)>, usize) {
    let (value, line_end) = rest_of_line(source, value_from);
    let consumed = raw[idx..]
        .iter()
        .take_while(|(_, range)| range.start < line_end)
        .count();
    (Some((Token::new(kind, value), start..line_end)), consumed)
}

/// `"a" ~ "b" ~ ...`: segments trimmed of blanks and newlines, joined by one space.
fn concatenate(raw: &RawStream, idx: usize) -> (Option<(Token, Range<usize>)>, usize) {
    let mut segments = Vec::new();
    let mut end = raw[idx].1.end;
    let mut next = idx;
    loop {
        if let (RawToken::Literal(segment), range) = &raw[next] {
            segments.push(segment.trim_matches(|c| c == ' ' || c == '\n'));
            end = range.end;
        }
        match (raw.get(next + 1), raw.get(next + 2)) {
            (Some((RawToken::Tilde, _)), Some((RawToken::Literal(_), _))) => next += 2,
            _ => break,
        }
    }
    let token = Token::new(TokenKind::Literal, segments.join(" "));
    (Some((token, raw[idx].1.start..end)), next + 1 - idx)
}

/// `{ pattern = "value" }` starting at the `{` at `idx`.
fn pattern_parameter(raw: &RawStream, idx: usize) -> Option<(Option<(Token, Range<usize>)>, usize)> {
    let parts = raw.get(idx..idx + 5)?;
    match parts {
        [(RawToken::BeginBody, start), (RawToken::Ident(key), _), (RawToken::Equal, _), (RawToken::Literal(value), _), (RawToken::EndBody, end)]
            if key == "pattern" =>
        {
            let token = Token::new(TokenKind::Pattern, value.clone());
            Some((Some((token, start.start..end.end)), 5))
        }
        _ => None,
    }
}
