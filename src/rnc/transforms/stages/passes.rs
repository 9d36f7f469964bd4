//! Tree construction stages
//!
//! One stage per tree pass. Each stage takes ownership of the previous pass's output and
//! returns a newly built sequence.

use crate::rnc::error::CompileError;
use crate::rnc::parsing::{match_pairs, nest_defines, scan_namespaces, type_bodies};
use crate::rnc::schema::Schema;
use crate::rnc::token::TokenStream;
use crate::rnc::transforms::Runnable;
use crate::rnc::tree::Node;
use tracing::debug;

/// Pass 1: `TokenStream` → `Vec<Node>` with delimiter pairs folded.
pub struct MatchPairs;

impl MatchPairs {
    pub fn new() -> Self {
        MatchPairs
    }
}

impl Default for MatchPairs {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<TokenStream, Vec<Node>> for MatchPairs {
    fn run(&self, input: TokenStream) -> Result<Vec<Node>, CompileError> {
        let nodes = match_pairs(&input)?;
        debug!(nodes = nodes.len(), "matched pairs");
        Ok(nodes)
    }
}

/// Pass 2: typed element, attribute, data, mixed and list nodes.
pub struct TypeBodies;

impl TypeBodies {
    pub fn new() -> Self {
        TypeBodies
    }
}

impl Default for TypeBodies {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for TypeBodies {
    fn run(&self, input: Vec<Node>) -> Result<Vec<Node>, CompileError> {
        let nodes = type_bodies(input)?;
        debug!(nodes = nodes.len(), "typed bodies");
        Ok(nodes)
    }
}

/// Pass 3: definitions with their bodies, nested notes and folded operators.
pub struct NestDefines;

impl NestDefines {
    pub fn new() -> Self {
        NestDefines
    }
}

impl Default for NestDefines {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for NestDefines {
    fn run(&self, input: Vec<Node>) -> Result<Vec<Node>, CompileError> {
        let nodes = nest_defines(input)?;
        debug!(nodes = nodes.len(), "nested defines");
        Ok(nodes)
    }
}

/// Pass 4: `Vec<Node>` → [Schema] with the global declarations collected.
pub struct ScanNamespaces;

impl ScanNamespaces {
    pub fn new() -> Self {
        ScanNamespaces
    }
}

impl Default for ScanNamespaces {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Schema> for ScanNamespaces {
    fn run(&self, input: Vec<Node>) -> Result<Schema, CompileError> {
        let schema = scan_namespaces(input)?;
        debug!(
            namespaces = schema.state.namespaces.len(),
            context_free = schema.state.context_free,
            "scanned namespaces"
        );
        Ok(schema)
    }
}
