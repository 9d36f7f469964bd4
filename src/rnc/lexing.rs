//! Lexer
//!
//!     Turns compact-syntax source text into a flat [TokenStream]. Lexing is done in three
//!     steps:
//!         1. Preprocessing. See [preprocess]. A leading byte order mark is dropped and
//!            all line endings are normalized to `\n`, so every later rule only has to
//!            deal with one newline form.
//!         2. Core tokenization using the logos lexer. See
//!            [base_tokenization](base_tokenization). Every logos rule matches a single
//!            lexical unit.
//!         3. Composition. See [transformations](transformations). Definition heads,
//!            declarations, literal concatenation and datatype parameters are assembled
//!            from the units of step 2.
//!
//!     The lexer is lenient: a character no rule recognizes is skipped without producing
//!     a token or an error. Skipped input is only reported through `trace` logging.
//!
//!     Logos tokens carry the byte range of their source text (relative to the
//!     preprocessed source). Composed tokens span all of their parts, and the pair
//!     matcher uses these ranges to report the position of unbalanced delimiters.

pub mod base_tokenization;
pub mod transformations;

use crate::rnc::token::TokenStream;
use base_tokenization::RawToken;
use logos::Logos;
use std::ops::Range;
use tracing::trace;
use transformations::compose_tokens;

/// Strip a leading BOM and normalize `\r\n` / `\r` line endings to `\n`.
pub fn preprocess(source: &str) -> String {
    let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
    source.replace("\r\n", "\n").replace('\r', "\n")
}

/// One-shot iterator over the raw tokens of a (preprocessed) source.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, RawToken>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: RawToken::lexer(source),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = (RawToken, Range<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let result = self.inner.next()?;
            let span = self.inner.span();
            match result {
                Ok(raw) => return Some((raw, span)),
                Err(()) => {
                    trace!(
                        offset = span.start,
                        text = self.inner.slice(),
                        "skipping unrecognized input"
                    );
                }
            }
        }
    }
}

/// Tokenize an already preprocessed source.
pub fn tokenize(source: &str) -> TokenStream {
    let raw: Vec<(RawToken, Range<usize>)> = Lexer::new(source).collect();
    compose_tokens(&raw, source)
}

/// Preprocess and tokenize raw source text.
pub fn lex(source: &str) -> TokenStream {
    tokenize(&preprocess(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rnc::token::{Keyword, Token, TokenKind};

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|(token, _)| token.kind).collect()
    }

    #[test]
    fn test_preprocess_strips_bom_and_normalizes_newlines() {
        assert_eq!(preprocess("\u{FEFF}a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(preprocess("plain"), "plain");
    }

    #[test]
    fn test_element_pattern() {
        assert_eq!(
            kinds("element foo { text }"),
            vec![
                TokenKind::Keyword(Keyword::Element),
                TokenKind::Name,
                TokenKind::BeginBody,
                TokenKind::Keyword(Keyword::Text),
                TokenKind::EndBody,
            ]
        );
    }

    #[test]
    fn test_definition_with_quantifiers() {
        assert_eq!(
            kinds("start = ( a | b* ), c+ & d?"),
            vec![
                TokenKind::Define,
                TokenKind::BeginParen,
                TokenKind::Name,
                TokenKind::Choice,
                TokenKind::Name,
                TokenKind::Any,
                TokenKind::EndParen,
                TokenKind::Seq,
                TokenKind::Name,
                TokenKind::Some,
                TokenKind::Interleave,
                TokenKind::Name,
                TokenKind::Maybe,
            ]
        );
    }

    #[test]
    fn test_blank_separated_names_are_all_kept() {
        assert_eq!(
            lex("a b"),
            vec![
                (Token::new(TokenKind::Name, "a"), 0..1),
                (Token::new(TokenKind::Name, "b"), 2..3),
            ]
        );
        assert_eq!(
            kinds("foo = element a { text } | element b { text }\n").len(),
            12
        );
    }

    #[test]
    fn test_unrecognized_characters_are_skipped() {
        let tokens = lex("a ; b");
        assert_eq!(
            tokens,
            vec![
                (Token::new(TokenKind::Name, "a"), 0..1),
                (Token::new(TokenKind::Name, "b"), 4..5),
            ]
        );
    }

    #[test]
    fn test_ranges_point_into_normalized_source() {
        let source = preprocess("foo =\r\n  element bar { empty }");
        for (token, range) in tokenize(&source) {
            assert!(range.start < range.end);
            assert!(range.end <= source.len());
            if token.kind == TokenKind::Name {
                assert_eq!(&source[range], "bar");
            }
        }
    }

    #[test]
    fn test_crlf_comment_has_no_carriage_return() {
        let tokens = lex("# note\r\nfoo = text\r\n");
        assert_eq!(tokens[0].0, Token::new(TokenKind::Comment, "note"));
    }
}
