//! Body typification
//!
//!     Recognizes the fixed shapes that pair matching leaves behind and folds each into
//!     one typed node:
//!
//!         element NAME BODY                  element named NAME
//!         element NAME (| NAME)+ BODY        element with a name-class choice
//!         attribute NAME BODY                attribute named NAME
//!         xsd:TAG { pattern = "..." }        data with a pattern parameter
//!         xsd:TAG                            data without parameters
//!         mixed BODY / list BODY             mixed / list
//!         empty / text / notAllowed          the matching pattern
//!
//!     Groups are typified in place and stay groups; everything else passes through.

use crate::rnc::error::CompileError;
use crate::rnc::token::Keyword;
use crate::rnc::tree::{Node, NodeKind, Payload, Quantifier};
use std::collections::VecDeque;

pub fn type_bodies(nodes: Vec<Node>) -> Result<Vec<Node>, CompileError> {
    let mut queue: VecDeque<Node> = nodes.into();
    let mut typed = Vec::with_capacity(queue.len());

    while let Some(mut node) = queue.pop_front() {
        let node = match node.kind {
            NodeKind::Keyword(Keyword::Element) | NodeKind::Keyword(Keyword::Attribute)
                if is_leaf_of(queue.front(), NodeKind::Name) =>
            {
                let kind = if node.kind == NodeKind::Keyword(Keyword::Element) {
                    NodeKind::Element
                } else {
                    NodeKind::Attribute
                };
                match queue.get(1).map(|next| next.kind) {
                    Some(NodeKind::Body) => named_pattern(kind, &mut queue)?,
                    Some(NodeKind::Choice) => name_class_pattern(kind, &mut queue)?,
                    _ => node,
                }
            }
            NodeKind::DataTag => {
                let tag = node.text().unwrap_or_default().to_string();
                let mut quantifier = node.quantifier;
                let payload = if is_leaf_of(queue.front(), NodeKind::Pattern) {
                    // A quantifier after the parameter block was attached to it
                    let pattern = pop_front(&mut queue)?;
                    if pattern.quantifier != Quantifier::One {
                        quantifier = pattern.quantifier;
                    }
                    pattern.payload
                } else {
                    Payload::Children(Vec::new())
                };
                Node {
                    kind: NodeKind::Data,
                    payload,
                    name: Some(tag),
                    quantifier,
                }
            }
            NodeKind::Keyword(Keyword::Mixed) | NodeKind::Keyword(Keyword::List)
                if queue.front().map(|next| next.kind) == Some(NodeKind::Body) =>
            {
                let kind = if node.kind == NodeKind::Keyword(Keyword::Mixed) {
                    NodeKind::Mixed
                } else {
                    NodeKind::List
                };
                let mut body = pop_front(&mut queue)?;
                Node::composite(kind, type_bodies(body.take_children())?)
                    .with_quantifier(body.quantifier)
            }
            NodeKind::Keyword(Keyword::Empty) => retype(node, NodeKind::Empty),
            NodeKind::Keyword(Keyword::Text) => retype(node, NodeKind::Text),
            NodeKind::Keyword(Keyword::NotAllowed) => retype(node, NodeKind::NotAllowed),
            NodeKind::Group => {
                let children = type_bodies(node.take_children())?;
                node.payload = Payload::Children(children);
                node
            }
            _ => node,
        };
        typed.push(node);
    }

    Ok(typed)
}

/// `element NAME BODY` with the keyword already consumed.
fn named_pattern(kind: NodeKind, queue: &mut VecDeque<Node>) -> Result<Node, CompileError> {
    let name = pop_text(queue);
    if name.is_empty() {
        return Err(CompileError::InternalInvariant(format!(
            "{} without a name",
            kind.label()
        )));
    }
    let mut body = pop_front(queue)?;
    let children = type_bodies(body.take_children())?;
    Ok(Node::composite(kind, children)
        .with_name(name)
        .with_quantifier(body.quantifier))
}

/// `element NAME (| NAME)+ BODY` with the keyword already consumed.
fn name_class_pattern(kind: NodeKind, queue: &mut VecDeque<Node>) -> Result<Node, CompileError> {
    if kind == NodeKind::Attribute {
        return Err(CompileError::InternalInvariant(
            "name-class choice on an attribute".to_string(),
        ));
    }

    let mut names = vec![Node::leaf(NodeKind::DirectName, pop_text(queue))];
    while is_leaf_of(queue.front(), NodeKind::Choice) && is_leaf_of(queue.get(1), NodeKind::Name)
    {
        queue.pop_front();
        names.push(Node::leaf(NodeKind::DirectName, pop_text(queue)));
    }

    match queue.front() {
        Some(next) if next.kind == NodeKind::Body => {}
        _ => {
            return Err(CompileError::InternalInvariant(
                "name-class choice without a body".to_string(),
            ))
        }
    }
    let mut body = pop_front(queue)?;

    let mut children = vec![Node::composite(NodeKind::Choice, names)];
    children.extend(type_bodies(body.take_children())?);
    Ok(Node::composite(kind, children).with_quantifier(body.quantifier))
}

fn is_leaf_of(node: Option<&Node>, kind: NodeKind) -> bool {
    node.map_or(false, |node| node.kind == kind && node.is_leaf())
}

fn pop_front(queue: &mut VecDeque<Node>) -> Result<Node, CompileError> {
    queue
        .pop_front()
        .ok_or_else(|| CompileError::InternalInvariant("unexpected end of nodes".to_string()))
}

fn pop_text(queue: &mut VecDeque<Node>) -> String {
    match queue.pop_front().map(|node| node.payload) {
        Some(Payload::Terminal(text)) => text,
        _ => String::new(),
    }
}

fn retype(mut node: Node, kind: NodeKind) -> Node {
    node.kind = kind;
    node
}
