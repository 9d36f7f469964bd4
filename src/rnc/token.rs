//! Token types shared by the lexer, the pair matcher and the debug tooling.
//!
//!     Tokens are produced once by the lexer and never mutated afterwards. Each token
//!     carries its classified kind and the text the later passes need: for most kinds
//!     this is the matched source text, for the line-oriented declarations (namespace,
//!     datatypes, ...) it is the part of the line after the keyword, and for literals it
//!     is the unquoted, concatenated value.
//!
//!     Like the lexer output of the rest of the pipeline, tokens travel together with the
//!     byte range they were read from, see [TokenStream].

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Flat token stream with byte ranges into the normalized source.
pub type TokenStream = Vec<(Token, Range<usize>)>;

/// Reserved words of the compact syntax.
///
/// Any identifier spelled like one of these is classified as the keyword unless it is
/// escaped with a backslash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Attribute,
    Default,
    Datatypes,
    Div,
    Element,
    Empty,
    External,
    Grammar,
    Include,
    Inherit,
    List,
    Mixed,
    Namespace,
    NotAllowed,
    Parent,
    Start,
    String,
    Text,
    Token,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("attribute", Keyword::Attribute),
    ("default", Keyword::Default),
    ("datatypes", Keyword::Datatypes),
    ("div", Keyword::Div),
    ("element", Keyword::Element),
    ("empty", Keyword::Empty),
    ("external", Keyword::External),
    ("grammar", Keyword::Grammar),
    ("include", Keyword::Include),
    ("inherit", Keyword::Inherit),
    ("list", Keyword::List),
    ("mixed", Keyword::Mixed),
    ("namespace", Keyword::Namespace),
    ("notAllowed", Keyword::NotAllowed),
    ("parent", Keyword::Parent),
    ("start", Keyword::Start),
    ("string", Keyword::String),
    ("text", Keyword::Text),
    ("token", Keyword::Token),
];

impl Keyword {
    /// Look an identifier up in the keyword table.
    pub fn lookup(ident: &str) -> Option<Keyword> {
        KEYWORDS
            .iter()
            .find(|(spelling, _)| *spelling == ident)
            .map(|(_, keyword)| *keyword)
    }

    /// The source spelling of the keyword.
    pub fn as_str(&self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, keyword)| keyword == self)
            .map(|(spelling, _)| *spelling)
            .unwrap_or("?")
    }
}

/// Classification of a lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// `## documentation` line
    Annotation,
    /// `# comment` line
    Comment,
    /// `datatypes xsd = ...` declaration
    Datatypes,
    /// `xsd:type` datatype reference
    DataTag,
    /// `default namespace ...` declaration
    DefaultNamespace,
    /// `include "file"`
    Include,
    /// Quoted (possibly `~` concatenated) literal
    Literal,
    /// Plain or escaped identifier
    Name,
    /// `namespace prefix = ...` declaration
    Namespace,
    /// `{ pattern = "..." }` datatype parameter
    Pattern,
    /// `name =` definition head
    Define,
    /// `*`
    Any,
    /// `?`
    Maybe,
    /// `+`
    Some,
    /// `|`
    Choice,
    /// `&`
    Interleave,
    /// `,`
    Seq,
    /// `=`
    Equal,
    BeginBody,
    EndBody,
    BeginParen,
    EndParen,
    BeginAnno,
    EndAnno,
    Keyword(Keyword),
}

impl TokenKind {
    pub fn is_quantifier(&self) -> bool {
        matches!(self, TokenKind::Any | TokenKind::Maybe | TokenKind::Some)
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenKind::Keyword(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TokenKind::Annotation => "ANNOTATION",
            TokenKind::Comment => "COMMENT",
            TokenKind::Datatypes => "DATATYPES",
            TokenKind::DataTag => "DATATAG",
            TokenKind::DefaultNamespace => "DEFAULT_NS",
            TokenKind::Include => "INCLUDE",
            TokenKind::Literal => "LITERAL",
            TokenKind::Name => "NAME",
            TokenKind::Namespace => "NS",
            TokenKind::Pattern => "PATTERN",
            TokenKind::Define => "DEFINE",
            TokenKind::Any => "ANY",
            TokenKind::Maybe => "MAYBE",
            TokenKind::Some => "SOME",
            TokenKind::Choice => "CHOICE",
            TokenKind::Interleave => "INTERLEAVE",
            TokenKind::Seq => "SEQ",
            TokenKind::Equal => "EQUAL",
            TokenKind::BeginBody => "BEG_BODY",
            TokenKind::EndBody => "END_BODY",
            TokenKind::BeginParen => "BEG_PAREN",
            TokenKind::EndParen => "END_PAREN",
            TokenKind::BeginAnno => "BEG_ANNO",
            TokenKind::EndAnno => "END_ANNO",
            TokenKind::Keyword(keyword) => {
                return write!(f, "{}", keyword.as_str().to_ascii_uppercase())
            }
        };
        write!(f, "{}", label)
    }
}

/// A classified lexical unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.text)
    }
}
