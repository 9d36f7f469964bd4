//! Core tokenization using the logos lexer.
//!
//!     Every rule here matches exactly one lexical unit. Constructs made of several units
//!     (definition heads, `~` concatenation, `{ pattern = "..." }` parameters, `include`
//!     and the line-oriented declarations) are assembled afterwards, see
//!     [transformations](super::transformations).
//!
//!     Identifiers follow the XML NCName production. Keyword classification happens after
//!     matching, through [Keyword::lookup], so the keyword table stays the single source
//!     of truth.

use crate::rnc::token::{Keyword, Token, TokenKind};
use logos::Logos;

/// Raw token as recognized by logos, before keyword classification.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\f]+")]
#[logos(subpattern ncname = r"[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}][-.0-9A-Z_a-z\u{B7}\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{300}-\u{36F}\u{370}-\u{37D}\u{37F}-\u{1FFF}\u{200C}-\u{200D}\u{203F}-\u{2040}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}]*")]
pub enum RawToken {
    #[regex(r"##[^\n]*", annotation_text, priority = 10)]
    Annotation(String),

    #[regex(r"#[^\n]*", comment_text, priority = 9)]
    Comment(String),

    /// One quoted segment, quotes removed
    #[regex(r#""[^"\n]*""#, quoted_text)]
    Literal(String),

    #[regex(r"\\\.?(?&ncname)", escaped_name)]
    EscapedName(String),

    #[regex(r"(?&ncname)", |lex| lex.slice().to_string())]
    Ident(String),

    /// Literal concatenation
    #[token("~")]
    Tilde,
    /// Prefix separator of `xsd:type` and `prefix:name`
    #[token(":")]
    Colon,

    #[token("*")]
    Any,
    #[token("?")]
    Maybe,
    #[token("+")]
    Some,
    #[token("|")]
    Choice,
    #[token("&")]
    Interleave,
    #[token(",")]
    Seq,
    #[token("=")]
    Equal,

    #[token("{")]
    BeginBody,
    #[token("}")]
    EndBody,
    #[token("(")]
    BeginParen,
    #[token(")")]
    EndParen,
    #[token("[")]
    BeginAnno,
    #[token("]")]
    EndAnno,
}

/// Text of a `#`/`##` line: marker and one following blank removed, trailing blanks stripped.
fn line_text(slice: &str, marker: &str) -> String {
    let body = slice.strip_prefix(marker).unwrap_or(slice);
    let body = body
        .strip_prefix(' ')
        .or_else(|| body.strip_prefix('\t'))
        .unwrap_or(body);
    body.trim_end().to_string()
}

fn annotation_text(lex: &mut logos::Lexer<RawToken>) -> String {
    line_text(lex.slice(), "##")
}

fn comment_text(lex: &mut logos::Lexer<RawToken>) -> String {
    line_text(lex.slice(), "#")
}

fn quoted_text(lex: &mut logos::Lexer<RawToken>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

fn escaped_name(lex: &mut logos::Lexer<RawToken>) -> String {
    let name = lex.slice().trim_start_matches('\\');
    name.strip_prefix('.').unwrap_or(name).to_string()
}

impl RawToken {
    /// Classify a standalone raw token. Connectors (`~`, `:`) have no token of their own.
    pub fn into_token(self) -> Option<Token> {
        let token = match self {
            RawToken::Annotation(text) => Token::new(TokenKind::Annotation, text),
            RawToken::Comment(text) => Token::new(TokenKind::Comment, text),
            RawToken::Literal(text) => Token::new(TokenKind::Literal, text),
            RawToken::EscapedName(text) => Token::new(TokenKind::Name, text),
            RawToken::Ident(text) => match Keyword::lookup(&text) {
                Some(keyword) => Token::new(TokenKind::Keyword(keyword), text),
                None => Token::new(TokenKind::Name, text),
            },
            RawToken::Tilde | RawToken::Colon => return None,
            RawToken::Any => Token::new(TokenKind::Any, "*"),
            RawToken::Maybe => Token::new(TokenKind::Maybe, "?"),
            RawToken::Some => Token::new(TokenKind::Some, "+"),
            RawToken::Choice => Token::new(TokenKind::Choice, "|"),
            RawToken::Interleave => Token::new(TokenKind::Interleave, "&"),
            RawToken::Seq => Token::new(TokenKind::Seq, ","),
            RawToken::Equal => Token::new(TokenKind::Equal, "="),
            RawToken::BeginBody => Token::new(TokenKind::BeginBody, "{"),
            RawToken::EndBody => Token::new(TokenKind::EndBody, "}"),
            RawToken::BeginParen => Token::new(TokenKind::BeginParen, "("),
            RawToken::EndParen => Token::new(TokenKind::EndParen, ")"),
            RawToken::BeginAnno => Token::new(TokenKind::BeginAnno, "["),
            RawToken::EndAnno => Token::new(TokenKind::EndAnno, "]"),
        };
        Some(token)
    }

    /// The identifier text, for plain identifiers only.
    pub fn ident(&self) -> Option<&str> {
        match self {
            RawToken::Ident(text) => Some(text),
            _ => None,
        }
    }
}
