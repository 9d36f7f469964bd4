//! RELAX NG compact syntax compiler
//!
//! Module layout, leaves first:
//! - [token] and [lexing]: compact-syntax text to a flat token stream
//! - [tree]: the node type shared by all passes
//! - [parsing]: the four tree passes
//! - [schema]: the compiled tree plus its compiler state
//! - [formats]: XML serializer and debug listings
//! - [transforms]: the passes wired into typed pipelines
//! - [config]: layered configuration for the command line tool
//! - [error]: compilation errors

pub mod config;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod schema;
pub mod token;
pub mod transforms;
pub mod tree;

pub use error::{CompileError, ErrorCategory};
pub use transforms::standard::{compile, compile_with};
