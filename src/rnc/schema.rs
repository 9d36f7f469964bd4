//! Compiled schema
//!
//!     The result of the tree passes: the root node plus the global declarations
//!     collected by the namespace scanner. A [CompilerState] belongs to exactly one
//!     compilation and is never shared, so concurrent compilations cannot observe each
//!     other's namespaces.

use crate::rnc::tree::{Node, NodeKind};
use std::collections::BTreeMap;

/// Datatype library assumed for `xsd:` datatypes.
pub const XSD_DATATYPES_URI: &str = "http://www.w3.org/2001/XMLSchema-datatypes";

/// Namespace of the `a:documentation` compatibility annotations.
pub const ANNOTATIONS_URI: &str = "http://relaxng.org/ns/compatibility/annotations/1.0";

/// Namespace of the RELAX NG XML syntax itself.
pub const STRUCTURE_URI: &str = "http://relaxng.org/ns/structure/1.0";

/// Alias conventionally bound to [ANNOTATIONS_URI].
pub const ANNOTATIONS_PREFIX: &str = "a";

/// Global declarations of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerState {
    pub default_namespace: Option<String>,
    /// Prefix to URI, sorted so that output is deterministic
    pub namespaces: BTreeMap<String, String>,
    pub datatype_library: String,
    /// A `datatypes` declaration was seen
    pub datatypes_declared: bool,
    /// A `start` rule was found, the output is a `<grammar>`
    pub context_free: bool,
}

impl Default for CompilerState {
    fn default() -> Self {
        Self {
            default_namespace: None,
            namespaces: BTreeMap::new(),
            datatype_library: XSD_DATATYPES_URI.to_string(),
            datatypes_declared: false,
            context_free: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub root: Node,
    pub state: CompilerState,
}

impl Schema {
    pub fn new(items: Vec<Node>, state: CompilerState) -> Self {
        Self {
            root: Node::composite(NodeKind::Root, items),
            state,
        }
    }

    /// Top-level items of the schema.
    pub fn items(&self) -> &[Node] {
        self.root.children()
    }
}
