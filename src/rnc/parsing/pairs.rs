//! Pair matching
//!
//!     Folds every delimiter pair of the flat token stream into one composite node and
//!     recurses into its contents. Along the way it merges runs of comment or
//!     documentation lines and attaches quantifiers to the node they follow.

use crate::rnc::error::CompileError;
use crate::rnc::token::{Keyword, Token, TokenKind};
use crate::rnc::tree::{Node, NodeKind, Payload, Quantifier};
use std::ops::Range;
use tracing::trace;

/// The three delimiter pairs of the compact syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pair {
    Body,
    Paren,
    Anno,
}

impl Pair {
    fn opened_by(kind: TokenKind) -> Option<Pair> {
        match kind {
            TokenKind::BeginBody => Some(Pair::Body),
            TokenKind::BeginParen => Some(Pair::Paren),
            TokenKind::BeginAnno => Some(Pair::Anno),
            _ => None,
        }
    }

    fn closed_by(kind: TokenKind) -> Option<Pair> {
        match kind {
            TokenKind::EndBody => Some(Pair::Body),
            TokenKind::EndParen => Some(Pair::Paren),
            TokenKind::EndAnno => Some(Pair::Anno),
            _ => None,
        }
    }

    fn open_char(&self) -> char {
        match self {
            Pair::Body => '{',
            Pair::Paren => '(',
            Pair::Anno => '[',
        }
    }

    fn close_char(&self) -> char {
        match self {
            Pair::Body => '}',
            Pair::Paren => ')',
            Pair::Anno => ']',
        }
    }

    fn node_kind(&self) -> NodeKind {
        match self {
            Pair::Body => NodeKind::Body,
            Pair::Paren => NodeKind::Group,
            Pair::Anno => NodeKind::NsAnnotation,
        }
    }
}

/// Fold delimiter pairs of a token stream into composite nodes.
pub fn match_pairs(tokens: &[(Token, Range<usize>)]) -> Result<Vec<Node>, CompileError> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut idx = 0;

    while idx < tokens.len() {
        let (token, range) = &tokens[idx];

        if let Some(pair) = Pair::opened_by(token.kind) {
            if pair == Pair::Body {
                reclassify_element_name(&mut nodes);
            }
            let close = find_match(tokens, idx, pair)?;
            let children = match_pairs(&tokens[idx + 1..close])?;
            nodes.push(Node::composite(pair.node_kind(), children));
            idx = close + 1;
            continue;
        }

        if let Some(pair) = Pair::closed_by(token.kind) {
            return Err(CompileError::UnbalancedDelimiter {
                delimiter: pair.close_char(),
                offset: range.start,
            });
        }

        if let Some(quantifier) = Quantifier::from_token(token.kind) {
            match nodes.last_mut() {
                Some(last) => last.quantifier = quantifier,
                None => trace!(offset = range.start, "dropping leading quantifier"),
            }
            idx += 1;
            continue;
        }

        if let Some(node) = Node::from_token(token) {
            match nodes.last_mut() {
                Some(last) if node.kind.is_note() && last.kind == node.kind => {
                    merge_text(last, node);
                }
                _ => nodes.push(node),
            }
        }
        idx += 1;
    }

    Ok(nodes)
}

/// Index of the token closing the pair opened at `open`.
fn find_match(
    tokens: &[(Token, Range<usize>)],
    open: usize,
    pair: Pair,
) -> Result<usize, CompileError> {
    let mut level = 1usize;
    for (idx, (token, _)) in tokens.iter().enumerate().skip(open + 1) {
        if Pair::opened_by(token.kind) == Some(pair) {
            level += 1;
        } else if Pair::closed_by(token.kind) == Some(pair) {
            level -= 1;
            if level == 0 {
                return Ok(idx);
            }
        }
    }
    Err(CompileError::UnbalancedDelimiter {
        delimiter: pair.open_char(),
        offset: tokens[open].1.start,
    })
}

/// `element text { ... }`: a keyword right before a body, named by `element` or
/// `attribute`, is an ordinary name.
fn reclassify_element_name(nodes: &mut [Node]) {
    let len = nodes.len();
    if len < 2 {
        return;
    }
    let named_by = nodes[len - 2].kind;
    if !matches!(
        named_by,
        NodeKind::Keyword(Keyword::Element) | NodeKind::Keyword(Keyword::Attribute)
    ) {
        return;
    }
    let last = &mut nodes[len - 1];
    if matches!(last.kind, NodeKind::Keyword(_)) && last.is_leaf() {
        last.kind = NodeKind::Name;
    }
}

fn merge_text(into: &mut Node, from: Node) {
    if let (Payload::Terminal(text), Payload::Terminal(more)) = (&mut into.payload, from.payload) {
        text.push('\n');
        text.push_str(&more);
    }
}
