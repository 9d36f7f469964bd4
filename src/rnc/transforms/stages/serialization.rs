//! XML serialization stage

use crate::rnc::error::CompileError;
use crate::rnc::formats::xml::{to_xml_with, SerializeOptions};
use crate::rnc::schema::Schema;
use crate::rnc::transforms::Runnable;
use tracing::debug;

/// [Schema] → RELAX NG XML text.
#[derive(Default)]
pub struct SerializeXml {
    options: SerializeOptions,
}

impl SerializeXml {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SerializeOptions) -> Self {
        Self { options }
    }
}

impl Runnable<Schema, String> for SerializeXml {
    fn run(&self, input: Schema) -> Result<String, CompileError> {
        let xml = to_xml_with(&input, &self.options)?;
        debug!(bytes = xml.len(), "serialized");
        Ok(xml)
    }
}
