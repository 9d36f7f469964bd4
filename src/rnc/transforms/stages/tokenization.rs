//! Core tokenization stage
//!
//! Converts source text into a flat stream of tokens using the logos lexer.

use crate::rnc::error::CompileError;
use crate::rnc::lexing::lex;
use crate::rnc::token::TokenStream;
use crate::rnc::transforms::Runnable;
use tracing::debug;

/// Core tokenization stage
///
/// # Input
/// - `String` - raw source text; the BOM is stripped and line endings are normalized
///
/// # Output
/// - `TokenStream` - flat token stream with byte ranges into the normalized text
pub struct CoreTokenization;

impl CoreTokenization {
    pub fn new() -> Self {
        CoreTokenization
    }
}

impl Default for CoreTokenization {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<String, TokenStream> for CoreTokenization {
    fn run(&self, input: String) -> Result<TokenStream, CompileError> {
        let tokens = lex(&input);
        debug!(tokens = tokens.len(), "tokenized");
        Ok(tokens)
    }
}

impl Runnable<&str, TokenStream> for CoreTokenization {
    fn run(&self, input: &str) -> Result<TokenStream, CompileError> {
        Ok(lex(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_tokenization_simple() {
        let stage = CoreTokenization::new();
        let result = stage.run("element foo { text }".to_string()).unwrap();
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_core_tokenization_empty() {
        let stage = CoreTokenization::new();
        let result = stage.run("").unwrap();
        assert!(result.is_empty());
    }
}
