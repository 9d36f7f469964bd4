//! Configuration loader for the rnc2rng command line tool.
//!
//! `defaults/rnc2rng.default.toml` is embedded into the binary so that documentation and
//! runtime behavior stay in sync. User files are layered on top of those defaults via
//! [Loader] before deserializing into [Rnc2RngConfig]. The compiler itself never reads
//! configuration; callers turn it into [SerializeOptions].

use crate::rnc::formats::xml::SerializeOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/rnc2rng.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Rnc2RngConfig {
    pub output: OutputConfig,
    pub inspect: InspectConfig,
}

/// Layout of the XML output.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub indent: usize,
    pub attribute_indent: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub emit: Emit,
    pub show_spans: bool,
}

/// What the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Emit {
    Xml,
    Tokens,
    TokenJson,
    Tree,
}

impl Emit {
    pub fn parse(value: &str) -> Option<Emit> {
        match value {
            "xml" => Some(Emit::Xml),
            "tokens" => Some(Emit::Tokens),
            "token-json" => Some(Emit::TokenJson),
            "tree" => Some(Emit::Tree),
            _ => None,
        }
    }
}

impl From<&OutputConfig> for SerializeOptions {
    fn from(output: &OutputConfig) -> Self {
        SerializeOptions {
            indent: output.indent,
            attribute_indent: output.attribute_indent,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Rnc2RngConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Rnc2RngConfig, ConfigError> {
    Loader::new().build()
}
