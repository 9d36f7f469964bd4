//! RELAX NG XML serializer
//!
//!     Renders a compiled [Schema] as RELAX NG XML. Output is collected as a list of
//!     entries, one per emitted tag, and joined with newlines at the end. An entry may
//!     span several lines (multi-line documentation, namespace attributes), which keeps
//!     the root-level post-passes working on whole tags instead of raw lines.
//!
//!     The post-passes run once the tree has been rendered:
//!         1. Documentation in front of the first real element is moved inside it, since
//!            annotations are not allowed before the root element.
//!         2. The namespace attributes (`xmlns`, `ns`, `datatypeLibrary`, `xmlns:*`) are
//!            injected into the first real element tag.
//!
//!     Whether the datatype library is in use, and whether documentation was emitted, is
//!     only known after rendering; both are tracked by the writer and never stored back
//!     into the [CompilerState].

use crate::rnc::error::CompileError;
use crate::rnc::schema::{
    CompilerState, Schema, ANNOTATIONS_PREFIX, ANNOTATIONS_URI, STRUCTURE_URI,
};
use crate::rnc::token::Keyword;
use crate::rnc::tree::{Node, NodeKind, Payload, Quantifier};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::trace;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// An entry opening a real element, as opposed to a comment or processing instruction.
static ELEMENT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*<[^!?/]").unwrap());

/// Layout knobs of the XML output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Spaces per nesting level
    pub indent: usize,
    /// Spaces in front of attributes continued on their own line
    pub attribute_indent: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            attribute_indent: 4,
        }
    }
}

/// Serialize a schema with the default layout.
pub fn to_xml(schema: &Schema) -> Result<String, CompileError> {
    to_xml_with(schema, &SerializeOptions::default())
}

pub fn to_xml_with(schema: &Schema, options: &SerializeOptions) -> Result<String, CompileError> {
    let mut writer = XmlWriter::new(options);
    writer.entries.push(XML_DECLARATION.to_string());

    let roots = schema
        .items()
        .iter()
        .filter(|item| renders_root(item.kind))
        .count();
    if schema.state.context_free || roots > 1 {
        trace!(roots, "wrapping items in a grammar");
        writer.entries.push("<grammar>".to_string());
        writer.write_nodes(schema.items(), 1)?;
        writer.entries.push("</grammar>".to_string());
    } else {
        writer.write_nodes(schema.items(), 0)?;
    }

    writer.finish(&schema.state)
}

struct XmlWriter<'a> {
    options: &'a SerializeOptions,
    entries: Vec<String>,
    datatypes_in_use: bool,
    documentation_used: bool,
}

impl<'a> XmlWriter<'a> {
    fn new(options: &'a SerializeOptions) -> Self {
        Self {
            options,
            entries: Vec::new(),
            datatypes_in_use: false,
            documentation_used: false,
        }
    }

    fn pad(&self, depth: usize) -> String {
        " ".repeat(depth * self.options.indent)
    }

    fn attribute_pad(&self, depth: usize) -> String {
        format!("{}{}", self.pad(depth), " ".repeat(self.options.attribute_indent))
    }

    fn push(&mut self, depth: usize, text: impl AsRef<str>) {
        let entry = format!("{}{}", self.pad(depth), text.as_ref());
        self.entries.push(entry);
    }

    fn write_nodes(&mut self, nodes: &[Node], depth: usize) -> Result<(), CompileError> {
        for node in nodes {
            self.write_node(node, depth)?;
        }
        Ok(())
    }

    fn write_node(&mut self, node: &Node, depth: usize) -> Result<(), CompileError> {
        match node.quantifier.xml_tag() {
            Some(tag) if is_pattern(node.kind) => {
                self.push(depth, format!("<{}>", tag));
                self.write_pattern(node, depth + 1)?;
                self.push(depth, format!("</{}>", tag));
                Ok(())
            }
            _ => self.write_pattern(node, depth),
        }
    }

    fn write_pattern(&mut self, node: &Node, depth: usize) -> Result<(), CompileError> {
        match node.kind {
            NodeKind::Start => self.write_container("start", "", node.children(), depth),
            NodeKind::Define => {
                let attributes = format!(" name=\"{}\"", escape_attribute(name_of(node)));
                self.write_container("define", &attributes, node.children(), depth)
            }
            NodeKind::Comment => {
                self.write_comment(node.text().unwrap_or_default(), depth);
                Ok(())
            }
            NodeKind::Annotation => {
                self.documentation_used = true;
                let text = escape_text(node.text().unwrap_or_default());
                self.push(depth, format!("<a:documentation>{}</a:documentation>", text));
                Ok(())
            }
            NodeKind::Choice if !node.is_leaf() => {
                self.write_container("choice", "", node.children(), depth)
            }
            NodeKind::Interleave if !node.is_leaf() => {
                self.write_container("interleave", "", node.children(), depth)
            }
            NodeKind::Sequence | NodeKind::Group if !node.is_leaf() => {
                self.write_container("group", "", node.children(), depth)
            }
            NodeKind::Mixed => self.write_container("mixed", "", node.children(), depth),
            NodeKind::List => self.write_container("list", "", node.children(), depth),
            NodeKind::Literal => {
                let value = escape_text(node.text().unwrap_or_default());
                self.push(depth, format!("<value>{}</value>", value));
                Ok(())
            }
            NodeKind::Text => {
                self.push(depth, "<text/>");
                Ok(())
            }
            NodeKind::Empty => {
                self.push(depth, "<empty/>");
                Ok(())
            }
            NodeKind::NotAllowed => {
                self.push(depth, "<notAllowed/>");
                Ok(())
            }
            NodeKind::Data => {
                self.datatypes_in_use = true;
                let tag = format!("<data type=\"{}\"", escape_attribute(name_of(node)));
                match &node.payload {
                    Payload::Terminal(pattern) => {
                        self.push(depth, format!("{}>", tag));
                        self.push(
                            depth + 1,
                            format!("<param name=\"pattern\">{}</param>", escape_text(pattern)),
                        );
                        self.push(depth, "</data>");
                    }
                    Payload::Children(_) => self.push(depth, format!("{}/>", tag)),
                }
                Ok(())
            }
            NodeKind::Keyword(keyword @ (Keyword::String | Keyword::Token)) => {
                self.push(
                    depth,
                    format!("<data type=\"{}\" datatypeLibrary=\"\"/>", keyword.as_str()),
                );
                Ok(())
            }
            NodeKind::Include => {
                let href = escape_attribute(node.text().unwrap_or_default());
                self.push(depth, format!("<include href=\"{}\"/>", href));
                Ok(())
            }
            NodeKind::DirectName => {
                let name = escape_text(node.text().unwrap_or_default());
                self.push(depth, format!("<name>{}</name>", name));
                Ok(())
            }
            NodeKind::Name => {
                let name = escape_attribute(node.text().unwrap_or_default());
                self.push(depth, format!("<ref name=\"{}\"/>", name));
                Ok(())
            }
            NodeKind::Element | NodeKind::Attribute => self.write_named_pattern(node, depth),
            other => {
                trace!(kind = %other.label(), "not rendered");
                Ok(())
            }
        }
    }

    fn write_container(
        &mut self,
        tag: &str,
        attributes: &str,
        children: &[Node],
        depth: usize,
    ) -> Result<(), CompileError> {
        if children.iter().all(|child| child.kind == NodeKind::NsAnnotation) {
            self.push(depth, format!("<{}{}/>", tag, attributes));
            return Ok(());
        }
        self.push(depth, format!("<{}{}>", tag, attributes));
        self.write_nodes(children, depth + 1)?;
        self.push(depth, format!("</{}>", tag));
        Ok(())
    }

    fn write_named_pattern(&mut self, node: &Node, depth: usize) -> Result<(), CompileError> {
        let tag = if node.kind == NodeKind::Element {
            "element"
        } else {
            "attribute"
        };

        let mut attributes = Vec::new();
        if let Some(name) = &node.name {
            attributes.push(format!("name=\"{}\"", escape_attribute(name)));
        }
        for (name, value) in harvest_annotations(node)? {
            attributes.push(format!("{}=\"{}\"", name, escape_attribute(&value)));
        }
        let separator = format!("\n{}", self.attribute_pad(depth));
        let attributes = if attributes.is_empty() {
            String::new()
        } else {
            format!(" {}", attributes.join(&separator))
        };

        let content: Vec<&Node> = node
            .children()
            .iter()
            .filter(|child| child.kind != NodeKind::NsAnnotation)
            .collect();
        let text_only = matches!(
            content.as_slice(),
            [only] if only.kind == NodeKind::Text && only.quantifier == Quantifier::One
        );
        if node.kind == NodeKind::Attribute && text_only {
            self.push(depth, format!("<{}{}/>", tag, attributes));
            return Ok(());
        }
        self.write_container(tag, &attributes, node.children(), depth)
    }

    fn write_comment(&mut self, text: &str, depth: usize) {
        let text = defuse_comment(text);
        let lines: Vec<&str> = text.split('\n').collect();
        if let [line] = lines.as_slice() {
            self.push(depth, format!("<!-- {} -->", line));
            return;
        }
        let inner = self.pad(depth + 1);
        let mut comment = String::from("<!--");
        for line in lines {
            comment.push('\n');
            comment.push_str(&inner);
            comment.push_str(line);
        }
        comment.push('\n');
        comment.push_str(&self.pad(depth));
        comment.push_str("-->");
        self.push(depth, comment);
    }

    /// Run the root-level post-passes and join the entries.
    fn finish(mut self, state: &CompilerState) -> Result<String, CompileError> {
        if let Some(root) = self.nest_top_documentation() {
            let namespaces = self.namespace_attributes(state);
            let entry = &mut self.entries[root];
            let tag_end = entry.find('>').ok_or_else(|| {
                CompileError::InternalInvariant(format!("unterminated tag '{}'", entry))
            })?;
            let insert_at = if entry[..tag_end].ends_with('/') {
                tag_end - 1
            } else {
                tag_end
            };
            entry.insert_str(insert_at, &namespaces);
        }
        Ok(self.entries.join("\n"))
    }

    /// Move documentation entries in front of the first real element inside it.
    /// Returns the index of that element's opening entry.
    fn nest_top_documentation(&mut self) -> Option<usize> {
        let root = self
            .entries
            .iter()
            .position(|entry| ELEMENT_TAG.is_match(entry) && !is_documentation(entry))?;
        if self.entries[root].trim_end().ends_with("/>") {
            return Some(root);
        }

        let (documentation, kept): (Vec<String>, Vec<String>) = self
            .entries
            .drain(..root)
            .partition(|entry| is_documentation(entry));
        let inner = self.pad(1);
        let nested = documentation
            .into_iter()
            .map(|entry| format!("{}{}", inner, entry.trim_start()));
        self.entries.splice(1..1, nested);

        let root = kept.len();
        self.entries.splice(0..0, kept);
        Some(root)
    }

    fn namespace_attributes(&self, state: &CompilerState) -> String {
        let pad = self.attribute_pad(0);
        let mut attributes = format!(" xmlns=\"{}\"", STRUCTURE_URI);
        if let Some(ns) = &state.default_namespace {
            attributes.push_str(&format!("\n{}ns=\"{}\"", pad, escape_attribute(ns)));
        }
        if state.datatypes_declared || self.datatypes_in_use {
            attributes.push_str(&format!(
                "\n{}datatypeLibrary=\"{}\"",
                pad,
                escape_attribute(&state.datatype_library)
            ));
        }
        let mut namespaces = state.namespaces.clone();
        if self.documentation_used {
            namespaces
                .entry(ANNOTATIONS_PREFIX.to_string())
                .or_insert_with(|| ANNOTATIONS_URI.to_string());
        }
        for (prefix, uri) in &namespaces {
            attributes.push_str(&format!(
                "\n{}xmlns:{}=\"{}\"",
                pad,
                prefix,
                escape_attribute(uri)
            ));
        }
        attributes
    }
}

/// Node kinds that may be wrapped in a cardinality element.
fn is_pattern(kind: NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::Root
            | NodeKind::Start
            | NodeKind::Define
            | NodeKind::Comment
            | NodeKind::Annotation
            | NodeKind::NsAnnotation
            | NodeKind::DefaultNamespace
            | NodeKind::Namespace
            | NodeKind::Datatypes
            | NodeKind::Include
            | NodeKind::DirectName
    )
}

/// Top-level kinds that are written as a tag of their own.
fn renders_root(kind: NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::Comment
            | NodeKind::Annotation
            | NodeKind::NsAnnotation
            | NodeKind::DefaultNamespace
            | NodeKind::Namespace
            | NodeKind::Datatypes
    )
}

fn is_documentation(entry: &str) -> bool {
    entry.trim_start().starts_with("<a:")
}

fn name_of(node: &Node) -> &str {
    node.name.as_deref().unwrap_or_default()
}

/// Read the `prefix? name = "value"` items of the leading annotation blocks of a node.
///
/// Within one block a name may appear only once; a later block overrides the values of
/// an earlier one.
fn harvest_annotations(node: &Node) -> Result<Vec<(String, String)>, CompileError> {
    let mut harvested: Vec<(String, String)> = Vec::new();

    for block in node
        .children()
        .iter()
        .take_while(|child| child.kind == NodeKind::NsAnnotation)
    {
        let mut seen = HashSet::new();
        let items = block.children();
        let mut idx = 0;
        while idx < items.len() {
            let mut name = String::new();
            if items[idx].kind == NodeKind::Name {
                name.push_str(items[idx].text().unwrap_or_default());
                name.push(':');
                idx += 1;
            }
            match items.get(idx) {
                Some(local) if local.kind == NodeKind::Define => {
                    name.push_str(local.text().unwrap_or_default());
                }
                _ => return Err(malformed(block)),
            }
            let value = match items.get(idx + 1) {
                Some(value) if value.kind == NodeKind::Literal => {
                    value.text().unwrap_or_default().to_string()
                }
                _ => return Err(malformed(block)),
            };
            idx += 2;

            if !seen.insert(name.clone()) {
                return Err(CompileError::DuplicateAnnotation { name });
            }
            match harvested.iter_mut().find(|(existing, _)| *existing == name) {
                Some(entry) => entry.1 = value,
                None => harvested.push((name, value)),
            }
        }
    }

    Ok(harvested)
}

fn malformed(block: &Node) -> CompileError {
    let shape: Vec<String> = block
        .children()
        .iter()
        .map(|item| item.kind.label())
        .collect();
    CompileError::MalformedAnnotation(format!("[ {} ]", shape.join(" ")))
}

/// Keep `--` out of comment text.
fn defuse_comment(text: &str) -> String {
    let mut text = text.to_string();
    while text.contains("--") {
        text = text.replace("--", "- -");
    }
    if text.ends_with('-') {
        text.push(' ');
    }
    text
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(items: Vec<Node>, state: CompilerState) -> Schema {
        Schema::new(items, state)
    }

    fn element(name: &str, children: Vec<Node>) -> Node {
        Node::composite(NodeKind::Element, children).with_name(name)
    }

    #[test]
    fn test_single_element() {
        let xml = to_xml(&schema(
            vec![element("foo", vec![Node::leaf(NodeKind::Text, "text")])],
            CompilerState::default(),
        ))
        .unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <element name=\"foo\" xmlns=\"http://relaxng.org/ns/structure/1.0\">\n  \
             <text/>\n\
             </element>"
        );
    }

    #[test]
    fn test_quantified_reference() {
        let xml = to_xml(&schema(
            vec![element(
                "list",
                vec![Node::leaf(NodeKind::Name, "item").with_quantifier(Quantifier::OneOrMore)],
            )],
            CompilerState::default(),
        ))
        .unwrap();
        assert!(xml.contains("  <oneOrMore>\n    <ref name=\"item\"/>\n  </oneOrMore>"));
    }

    #[test]
    fn test_text_attribute_is_self_closing() {
        let attribute = Node::composite(
            NodeKind::Attribute,
            vec![Node::leaf(NodeKind::Text, "text")],
        )
        .with_name("id");
        let xml = to_xml(&schema(
            vec![element("foo", vec![attribute])],
            CompilerState::default(),
        ))
        .unwrap();
        assert!(xml.contains("  <attribute name=\"id\"/>"));
    }

    #[test]
    fn test_data_marks_library_in_use() {
        let data = Node {
            kind: NodeKind::Data,
            payload: Payload::Terminal("[0-9]+".to_string()),
            name: Some("string".to_string()),
            quantifier: Quantifier::One,
        };
        let xml = to_xml(&schema(
            vec![element("code", vec![data])],
            CompilerState::default(),
        ))
        .unwrap();
        assert!(xml.contains(
            "xmlns=\"http://relaxng.org/ns/structure/1.0\"\n    \
             datatypeLibrary=\"http://www.w3.org/2001/XMLSchema-datatypes\">"
        ));
        assert!(xml.contains("    <param name=\"pattern\">[0-9]+</param>"));
    }

    #[test]
    fn test_harvested_annotations_become_attributes() {
        let block = |items: Vec<Node>| Node::composite(NodeKind::NsAnnotation, items);
        let node = element(
            "foo",
            vec![
                block(vec![
                    Node::leaf(NodeKind::Name, "x"),
                    Node::leaf(NodeKind::Define, "a"),
                    Node::leaf(NodeKind::Literal, "1"),
                    Node::leaf(NodeKind::Define, "b"),
                    Node::leaf(NodeKind::Literal, "2"),
                ]),
                block(vec![
                    Node::leaf(NodeKind::Name, "x"),
                    Node::leaf(NodeKind::Define, "a"),
                    Node::leaf(NodeKind::Literal, "3"),
                ]),
                Node::leaf(NodeKind::Empty, "empty"),
            ],
        );
        assert_eq!(
            harvest_annotations(&node).unwrap(),
            vec![
                ("x:a".to_string(), "3".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicate_annotation_in_one_block() {
        let node = element(
            "foo",
            vec![Node::composite(
                NodeKind::NsAnnotation,
                vec![
                    Node::leaf(NodeKind::Define, "a"),
                    Node::leaf(NodeKind::Literal, "1"),
                    Node::leaf(NodeKind::Define, "a"),
                    Node::leaf(NodeKind::Literal, "2"),
                ],
            )],
        );
        assert_eq!(
            harvest_annotations(&node).unwrap_err(),
            CompileError::DuplicateAnnotation {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_annotation_block() {
        let node = element(
            "foo",
            vec![Node::composite(
                NodeKind::NsAnnotation,
                vec![Node::leaf(NodeKind::Literal, "1")],
            )],
        );
        assert!(matches!(
            harvest_annotations(&node),
            Err(CompileError::MalformedAnnotation(_))
        ));
    }

    #[test]
    fn test_multi_line_comment() {
        let xml = to_xml(&schema(
            vec![Node::leaf(NodeKind::Comment, "one\ntwo -- three")],
            CompilerState::default(),
        ))
        .unwrap();
        assert!(xml.ends_with("<!--\n  one\n  two - - three\n-->"));
    }

    #[test]
    fn test_several_definitions_share_one_grammar_root() {
        let define = |name: &str| {
            Node::composite(NodeKind::Define, vec![Node::leaf(NodeKind::Empty, "empty")])
                .with_name(name)
        };
        let xml = to_xml(&schema(
            vec![
                Node::leaf(NodeKind::Comment, "two"),
                define("a"),
                define("b"),
            ],
            CompilerState::default(),
        ))
        .unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <grammar xmlns=\"http://relaxng.org/ns/structure/1.0\">\n  \
             <!-- two -->\n  \
             <define name=\"a\">\n    \
             <empty/>\n  \
             </define>\n  \
             <define name=\"b\">\n    \
             <empty/>\n  \
             </define>\n\
             </grammar>"
        );
    }

    #[test]
    fn test_lone_definition_stays_bare() {
        let define =
            Node::composite(NodeKind::Define, vec![Node::leaf(NodeKind::Text, "text")])
                .with_name("a");
        let xml = to_xml(&schema(
            vec![Node::leaf(NodeKind::Comment, "only"), define],
            CompilerState::default(),
        ))
        .unwrap();
        assert!(!xml.contains("<grammar"));
        assert!(xml.contains("<define name=\"a\" xmlns="));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attribute("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(defuse_comment("a---b-"), "a- - -b- ");
    }

    #[test]
    fn test_custom_indent() {
        let options = SerializeOptions {
            indent: 4,
            attribute_indent: 2,
        };
        let state = CompilerState {
            default_namespace: Some("urn:x".to_string()),
            ..CompilerState::default()
        };
        let xml = to_xml_with(
            &schema(vec![element("foo", vec![Node::leaf(NodeKind::Empty, "empty")])], state),
            &options,
        )
        .unwrap();
        assert!(xml.contains("1.0\"\n  ns=\"urn:x\">\n    <empty/>"));
    }
}
