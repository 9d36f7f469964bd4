//! Standard transform definitions
//!
//! Pre-built pipelines for the common entry points, defined as static references using
//! `once_cell::sync::Lazy`. Each pipeline extends the previous one by a single stage, so
//! the tree can be inspected after any pass.

use crate::rnc::error::CompileError;
use crate::rnc::formats::xml::SerializeOptions;
use crate::rnc::schema::Schema;
use crate::rnc::token::TokenStream;
use crate::rnc::transforms::stages::{
    CoreTokenization, MatchPairs, NestDefines, ScanNamespaces, SerializeXml, TypeBodies,
};
use crate::rnc::transforms::Transform;
use crate::rnc::tree::Node;
use once_cell::sync::Lazy;

pub type LexingTransform = Transform<String, TokenStream>;
pub type TreeTransform = Transform<String, Vec<Node>>;
pub type SchemaTransform = Transform<String, Schema>;
pub type XmlTransform = Transform<String, String>;

/// Source text → token stream.
pub static CORE_TOKENIZATION: Lazy<LexingTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(CoreTokenization::new()));

/// Source text → tree after pair matching.
pub static TO_PAIRS: Lazy<TreeTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then_transform(&*CORE_TOKENIZATION)
        .then(MatchPairs::new())
});

/// Source text → tree after body typification.
pub static TO_BODIES: Lazy<TreeTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then_transform(&*TO_PAIRS)
        .then(TypeBodies::new())
});

/// Source text → tree after define nesting.
pub static TO_DEFINES: Lazy<TreeTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then_transform(&*TO_BODIES)
        .then(NestDefines::new())
});

/// Source text → compiled schema (tree plus compiler state).
pub static TO_SCHEMA: Lazy<SchemaTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then_transform(&*TO_DEFINES)
        .then(ScanNamespaces::new())
});

/// Source text → RELAX NG XML with the default layout.
pub static STRING_TO_XML: Lazy<XmlTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then_transform(&*TO_SCHEMA)
        .then(SerializeXml::new())
});

/// Compile compact syntax to RELAX NG XML.
pub fn compile(source: &str) -> Result<String, CompileError> {
    STRING_TO_XML.run(source.to_string())
}

/// Compile with a custom output layout.
pub fn compile_with(source: &str, options: &SerializeOptions) -> Result<String, CompileError> {
    Transform::from_fn(Ok)
        .then_transform(&*TO_SCHEMA)
        .then(SerializeXml::with_options(options.clone()))
        .run(source.to_string())
}
