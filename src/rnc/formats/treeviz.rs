//! Treeviz formatter for schema trees
//!
//! One line per node, with the nesting encoded as indentation (2 spaces per level):
//!
//!     <indentation>KIND[ name][quantifier][ "terminal text"]
//!
//! Terminal text is truncated to 30 characters and newlines are shown escaped, so every
//! node stays on one line. Meant for inspecting the tree between passes.

use crate::rnc::tree::{Node, Payload};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn format_node(node: &Node, depth: usize, output: &mut String) {
    output.push_str(&"  ".repeat(depth));
    output.push_str(&node.kind.label());
    if let Some(name) = &node.name {
        output.push(' ');
        output.push_str(name);
    }
    output.push_str(&node.quantifier.to_string());

    match &node.payload {
        Payload::Terminal(text) => {
            output.push_str(&format!(" {:?}", truncate(text, 30)));
            output.push('\n');
        }
        Payload::Children(children) => {
            output.push('\n');
            for child in children {
                format_node(child, depth + 1, output);
            }
        }
    }
}

/// Render a node list as treeviz text.
pub fn to_treeviz_str(nodes: &[Node]) -> String {
    let mut output = String::new();
    for node in nodes {
        format_node(node, 0, &mut output);
    }
    output
}
