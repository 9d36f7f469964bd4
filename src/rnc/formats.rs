//! Output format implementations
//!
//! This module contains the serializers for:
//! - Compiled schemas to RELAX NG XML (xml)
//! - Schema trees to an indented one-node-per-line dump (treeviz)
//! - Token streams to plain or JSON listings (tokens)

pub mod tokens;
pub mod treeviz;
pub mod xml;

pub use tokens::{to_json_str as tokens_to_json, to_simple_str as tokens_to_simple};
pub use treeviz::to_treeviz_str;
pub use xml::{to_xml, to_xml_with, SerializeOptions};
