//! Namespace scanning
//!
//!     One pass over the top-level items that records the global declarations in a
//!     [CompilerState] and promotes the first `start` definition.

use crate::rnc::error::CompileError;
use crate::rnc::schema::{CompilerState, Schema, ANNOTATIONS_PREFIX, ANNOTATIONS_URI};
use crate::rnc::tree::{Node, NodeKind};

pub fn scan_namespaces(mut nodes: Vec<Node>) -> Result<Schema, CompileError> {
    let mut state = CompilerState::default();

    for node in nodes.iter_mut() {
        match node.kind {
            NodeKind::DefaultNamespace => {
                let (prefix, uri) = split_declaration("default namespace", node)?;
                if !prefix.is_empty() {
                    state.namespaces.insert(prefix, uri.clone());
                }
                state.default_namespace = Some(uri);
            }
            NodeKind::Namespace => {
                let (prefix, uri) = split_declaration("namespace", node)?;
                state.namespaces.insert(prefix, uri);
            }
            NodeKind::Annotation => {
                state
                    .namespaces
                    .entry(ANNOTATIONS_PREFIX.to_string())
                    .or_insert_with(|| ANNOTATIONS_URI.to_string());
            }
            NodeKind::Datatypes => {
                let uri = unquote(node.text().unwrap_or_default());
                if uri.is_empty() {
                    return Err(CompileError::MalformedDeclaration {
                        kind: "datatypes",
                        text: node.text().unwrap_or_default().to_string(),
                    });
                }
                state.datatype_library = uri;
                state.datatypes_declared = true;
            }
            NodeKind::Define if !state.context_free && node.name.as_deref() == Some("start") => {
                node.kind = NodeKind::Start;
                node.name = None;
                state.context_free = true;
            }
            _ => {}
        }
    }

    Ok(Schema::new(nodes, state))
}

/// `prefix = "uri"` into its parts; the prefix may be empty.
fn split_declaration(kind: &'static str, node: &Node) -> Result<(String, String), CompileError> {
    let text = node.text().unwrap_or_default();
    match text.split_once('=') {
        Some((prefix, uri)) => Ok((prefix.trim().to_string(), unquote(uri))),
        None => Err(CompileError::MalformedDeclaration {
            kind,
            text: text.to_string(),
        }),
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}
