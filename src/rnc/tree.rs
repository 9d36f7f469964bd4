//! Schema tree
//!
//!     The single node representation shared by every pass. Nodes start out as 1:1
//!     wrappers around tokens and are progressively folded into composite nodes: each pass
//!     consumes the node sequence it is given and returns a newly built one.
//!
//!     A node's payload is either an ordered list of children or a terminal string, never
//!     both. Passes match on [Payload] instead of probing the node shape at runtime.

use crate::rnc::token::{Keyword, Token, TokenKind};
use std::fmt;

/// Role of a node in the schema tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Synthetic root handed to the serializer
    Root,
    /// `{ ... }` contents
    Body,
    /// `( ... )` contents, or the implicit group of a definition body
    Group,
    /// `[ ... ]` annotation block
    NsAnnotation,
    /// Keyword not (yet) folded into a typed node
    Keyword(Keyword),
    Element,
    Attribute,
    Mixed,
    List,
    /// Reference to a named pattern (`<ref>`)
    Name,
    /// Name used literally inside a name class (`<name>`)
    DirectName,
    Literal,
    Comment,
    /// `##` documentation
    Annotation,
    Define,
    Start,
    Include,
    DefaultNamespace,
    Namespace,
    Datatypes,
    Empty,
    Text,
    NotAllowed,
    /// Raw `xsd:` tag before typification
    DataTag,
    /// Typed datatype reference, optionally carrying a pattern parameter
    Data,
    Pattern,
    Choice,
    Interleave,
    Sequence,
    Equal,
}

impl NodeKind {
    /// Node kind wrapping a token 1:1, `None` for tokens that never become nodes.
    pub fn from_token(kind: TokenKind) -> Option<NodeKind> {
        let node_kind = match kind {
            TokenKind::Annotation => NodeKind::Annotation,
            TokenKind::Comment => NodeKind::Comment,
            TokenKind::Datatypes => NodeKind::Datatypes,
            TokenKind::DataTag => NodeKind::DataTag,
            TokenKind::DefaultNamespace => NodeKind::DefaultNamespace,
            TokenKind::Include => NodeKind::Include,
            TokenKind::Literal => NodeKind::Literal,
            TokenKind::Name => NodeKind::Name,
            TokenKind::Namespace => NodeKind::Namespace,
            TokenKind::Pattern => NodeKind::Pattern,
            TokenKind::Define => NodeKind::Define,
            TokenKind::Choice => NodeKind::Choice,
            TokenKind::Interleave => NodeKind::Interleave,
            TokenKind::Seq => NodeKind::Sequence,
            TokenKind::Equal => NodeKind::Equal,
            TokenKind::Keyword(keyword) => NodeKind::Keyword(keyword),
            TokenKind::Any
            | TokenKind::Maybe
            | TokenKind::Some
            | TokenKind::BeginBody
            | TokenKind::EndBody
            | TokenKind::BeginParen
            | TokenKind::EndParen
            | TokenKind::BeginAnno
            | TokenKind::EndAnno => return None,
        };
        Some(node_kind)
    }

    /// Binary operators separating the operands of a group.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            NodeKind::Choice | NodeKind::Interleave | NodeKind::Sequence
        )
    }

    /// Kinds that collect pending comments and annotations from their surroundings.
    pub fn is_annotation_consumer(&self) -> bool {
        matches!(self, NodeKind::Element | NodeKind::Attribute)
    }

    /// Documentation and comments, which carry no pattern meaning.
    pub fn is_note(&self) -> bool {
        matches!(self, NodeKind::Comment | NodeKind::Annotation)
    }

    pub fn label(&self) -> String {
        match self {
            NodeKind::Keyword(keyword) => keyword.as_str().to_ascii_uppercase(),
            other => format!("{:?}", other).to_ascii_uppercase(),
        }
    }
}

/// Cardinality marker on a pattern node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quantifier {
    #[default]
    One,
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl Quantifier {
    pub fn from_token(kind: TokenKind) -> Option<Quantifier> {
        match kind {
            TokenKind::Maybe => Some(Quantifier::Optional),
            TokenKind::Any => Some(Quantifier::ZeroOrMore),
            TokenKind::Some => Some(Quantifier::OneOrMore),
            _ => None,
        }
    }

    /// Wrapper element used by the XML output, `None` for exactly-one.
    pub fn xml_tag(&self) -> Option<&'static str> {
        match self {
            Quantifier::One => None,
            Quantifier::Optional => Some("optional"),
            Quantifier::ZeroOrMore => Some("zeroOrMore"),
            Quantifier::OneOrMore => Some("oneOrMore"),
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Quantifier::One => "",
            Quantifier::Optional => "?",
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
        };
        write!(f, "{}", symbol)
    }
}

/// Either child nodes or a terminal string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Children(Vec<Node>),
    Terminal(String),
}

/// A node of the schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub payload: Payload,
    pub name: Option<String>,
    pub quantifier: Quantifier,
}

impl Node {
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            payload: Payload::Terminal(text.into()),
            name: None,
            quantifier: Quantifier::One,
        }
    }

    pub fn composite(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            payload: Payload::Children(children),
            name: None,
            quantifier: Quantifier::One,
        }
    }

    /// Wrap a token, `None` for delimiters and quantifiers.
    pub fn from_token(token: &Token) -> Option<Self> {
        NodeKind::from_token(token.kind).map(|kind| Node::leaf(kind, token.text.clone()))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_quantifier(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = quantifier;
        self
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.payload, Payload::Terminal(_))
    }

    /// An operator token (as opposed to an operator node that already holds operands).
    pub fn is_operator_token(&self) -> bool {
        self.kind.is_operator() && self.is_leaf()
    }

    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Terminal(text) => Some(text),
            Payload::Children(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match &self.payload {
            Payload::Children(children) => children,
            Payload::Terminal(_) => &[],
        }
    }

    /// Take the children out, leaving an empty list behind. Terminals yield nothing.
    pub fn take_children(&mut self) -> Vec<Node> {
        match &mut self.payload {
            Payload::Children(children) => std::mem::take(children),
            Payload::Terminal(_) => Vec::new(),
        }
    }

    /// Maximum nesting depth of composite nodes below (and including) this one.
    pub fn depth(&self) -> usize {
        match &self.payload {
            Payload::Terminal(_) => 0,
            Payload::Children(children) => {
                1 + children.iter().map(Node::depth).max().unwrap_or(0)
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.label())?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        write!(f, "{}", self.quantifier)?;
        match &self.payload {
            Payload::Terminal(text) => write!(f, " {:?}", text),
            Payload::Children(children) => write!(f, " [{}]", children.len()),
        }
    }
}
