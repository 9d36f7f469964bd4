//! Define nesting
//!
//!     Attaches to every top-level `name =` definition the nodes that make up its body,
//!     moves comments and documentation down onto the element or attribute they
//!     precede, and folds runs of operands joined by one operator into a single
//!     choice, interleave or sequence node. A pattern written outside any definition is
//!     folded the same way, so a top-level `a | b` ends up as one choice.
//!
//!     Notes are nested bottom-up. While walking a node list, comments, documentation
//!     and annotation blocks are set aside as pending; the next element or attribute
//!     takes everything pending in front of its own children. An element's subtree
//!     collects into fresh pending sets, and whatever it leaves unconsumed is spliced in
//!     after the notes it received from outside.

use crate::rnc::error::CompileError;
use crate::rnc::tree::{Node, NodeKind, Payload, Quantifier};
use tracing::trace;

/// Notes waiting for the next element or attribute.
#[derive(Debug, Default)]
struct Pending {
    ns_annotations: Vec<Node>,
    annotations: Vec<Node>,
    comments: Vec<Node>,
}

impl Pending {
    /// Take a note, handing any other node back.
    fn accept(&mut self, node: Node) -> Option<Node> {
        match node.kind {
            NodeKind::NsAnnotation => self.ns_annotations.push(node),
            NodeKind::Annotation => self.annotations.push(node),
            NodeKind::Comment => self.comments.push(node),
            _ => return Some(node),
        }
        None
    }

    fn take_all(&mut self) -> Vec<Node> {
        let mut all = std::mem::take(&mut self.ns_annotations);
        all.append(&mut self.annotations);
        all.append(&mut self.comments);
        all
    }
}

/// Top-level items that end the body of the definition before them.
fn ends_define_body(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Define
            | NodeKind::DefaultNamespace
            | NodeKind::Namespace
            | NodeKind::Datatypes
            | NodeKind::Include
    )
}

pub fn nest_defines(nodes: Vec<Node>) -> Result<Vec<Node>, CompileError> {
    let mut nested = Vec::new();
    // Comments and documentation seen since the last item that was placed
    let mut notes: Vec<Node> = Vec::new();
    let mut iter = nodes.into_iter().peekable();

    while let Some(node) = iter.next() {
        match node.kind {
            NodeKind::Comment | NodeKind::Annotation => notes.push(node),
            NodeKind::Define => {
                let mut body = Vec::new();
                while let Some(next) = iter.next_if(|next| !ends_define_body(next.kind)) {
                    body.push(next);
                }
                let trailing = split_trailing_notes(&mut body);
                let pending = documentation_for_next(&mut notes, &mut nested);
                nested.push(nest_define(node, body, pending)?);
                notes = trailing;
            }
            kind if ends_define_body(kind) => {
                nested.append(&mut notes);
                nested.push(node);
            }
            _ => {
                let mut run = vec![node];
                while let Some(next) = iter.next_if(|next| !ends_define_body(next.kind)) {
                    run.push(next);
                }
                let trailing = split_trailing_notes(&mut run);
                let pending = documentation_for_next(&mut notes, &mut nested);
                nested.extend(nest_top_level_run(run, pending)?);
                notes = trailing;
            }
        }
    }
    nested.append(&mut notes);

    Ok(nested)
}

/// Split off the run of comments and documentation ending `body`.
fn split_trailing_notes(body: &mut Vec<Node>) -> Vec<Node> {
    let keep = body
        .iter()
        .rposition(|node| !node.kind.is_note())
        .map_or(0, |idx| idx + 1);
    body.split_off(keep)
}

/// Documentation in `notes` becomes pending for the next definition; comments are placed.
fn documentation_for_next(notes: &mut Vec<Node>, placed: &mut Vec<Node>) -> Pending {
    let mut pending = Pending::default();
    for note in notes.drain(..) {
        if note.kind == NodeKind::Annotation {
            pending.annotations.push(note);
        } else {
            placed.push(note);
        }
    }
    pending
}

fn nest_define(mut define: Node, body: Vec<Node>, mut pending: Pending) -> Result<Node, CompileError> {
    let name = match std::mem::replace(&mut define.payload, Payload::Children(Vec::new())) {
        Payload::Terminal(name) => name,
        Payload::Children(_) => {
            return Err(CompileError::InternalInvariant(
                "definition without a name".to_string(),
            ))
        }
    };

    let body = nest_annotations(body, &mut pending, true)?;
    let mut group = Node::composite(NodeKind::Group, body);
    collapse_operators(&mut group)?;

    let mut children = pending.take_all();
    if group.kind == NodeKind::Sequence || group.children().len() <= 1 {
        children.extend(group.take_children());
    } else {
        children.push(group);
    }

    trace!(name = %name, children = children.len(), "nested definition");
    define.name = Some(name);
    define.payload = Payload::Children(children);
    Ok(define)
}

/// A pattern outside any definition, folded like a definition body.
fn nest_top_level_run(run: Vec<Node>, mut pending: Pending) -> Result<Vec<Node>, CompileError> {
    let run = nest_annotations(run, &mut pending, true)?;
    let mut group = Node::composite(NodeKind::Group, run);
    collapse_operators(&mut group)?;

    let mut items = pending.take_all();
    if group.children().len() <= 1 {
        items.extend(group.take_children());
    } else {
        trace!(kind = %group.kind.label(), "top-level pattern run");
        items.push(group);
    }
    Ok(items)
}

/// Move pending notes onto the elements and attributes that follow them.
fn nest_annotations(
    nodes: Vec<Node>,
    pending: &mut Pending,
    top: bool,
) -> Result<Vec<Node>, CompileError> {
    let count = nodes.len();
    let mut kept = Vec::with_capacity(count);

    for (idx, mut node) in nodes.into_iter().enumerate() {
        match node.payload {
            Payload::Children(_) if node.kind.is_annotation_consumer() => {
                let mut own = Pending::default();
                let children = nest_annotations(node.take_children(), &mut own, false)?;
                let mut spliced = pending.take_all();
                spliced.append(&mut own.take_all());
                spliced.extend(children);
                node.payload = Payload::Children(spliced);
            }
            Payload::Children(_) if node.kind != NodeKind::NsAnnotation => {
                let children = nest_annotations(node.take_children(), pending, false)?;
                node.payload = Payload::Children(children);
            }
            Payload::Terminal(_) if !top && idx + 1 == count && node.kind == NodeKind::Comment => {
                kept.push(node);
                continue;
            }
            _ => {}
        }
        if let Some(node) = pending.accept(node) {
            kept.push(node);
        }
    }

    Ok(kept)
}

/// Fold operands joined by `|`, `&` or `,` into one operator node, recursively.
fn collapse_operators(node: &mut Node) -> Result<(), CompileError> {
    if matches!(
        node.kind,
        NodeKind::Group | NodeKind::Element | NodeKind::Attribute | NodeKind::Mixed | NodeKind::List
    ) {
        fold_operator_run(node)?;
    }
    if let Payload::Children(children) = &mut node.payload {
        for child in children.iter_mut() {
            collapse_operators(child)?;
        }
    }
    Ok(())
}

fn fold_operator_run(node: &mut Node) -> Result<(), CompileError> {
    let mut operators: Vec<NodeKind> = Vec::new();
    for child in node.children() {
        if child.is_operator_token() && !operators.contains(&child.kind) {
            operators.push(child.kind);
        }
    }
    let operator = match operators.as_slice() {
        [] => return Ok(()),
        [operator] => *operator,
        _ => {
            return Err(CompileError::AmbiguousSequencing {
                node: node.to_string(),
            })
        }
    };

    let label = node.to_string();
    let mut simplify = node.kind == NodeKind::Group;
    let mut outer: Vec<Node> = Vec::new();
    let mut internode: Option<usize> = None;
    let mut after_operator = false;

    for child in node.take_children() {
        if child.is_operator_token() {
            if internode.is_none() {
                let operand = outer.pop().ok_or_else(|| CompileError::DanglingOperator {
                    operator: child.text().unwrap_or_default().to_string(),
                    node: label.clone(),
                })?;
                outer.push(Node::composite(operator, vec![operand]));
                internode = Some(outer.len() - 1);
            }
            after_operator = true;
            continue;
        }

        match internode {
            Some(idx) if after_operator => {
                if let Payload::Children(operands) = &mut outer[idx].payload {
                    operands.push(child);
                }
                after_operator = false;
            }
            _ => {
                if child.kind.is_note() {
                    outer.push(child);
                    continue;
                }
                if !matches!(child.quantifier, Quantifier::One | Quantifier::Optional) {
                    simplify = false;
                }
                outer.push(child);
                after_operator = false;
            }
        }
    }

    if simplify && outer.len() == 1 && internode == Some(0) {
        if let Some(mut folded) = outer.pop() {
            node.kind = folded.kind;
            node.payload = Payload::Children(folded.take_children());
        }
    } else {
        node.payload = Payload::Children(outer);
    }
    Ok(())
}
