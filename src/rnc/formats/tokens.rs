//! Token listings
//!
//! Debug views of a token stream: the plain `KIND "value"` listing, one token per line,
//! and a JSON array for tooling.

use crate::rnc::token::{Token, TokenStream};
use serde::Serialize;
use std::ops::Range;

/// One token of the JSON listing.
#[derive(Debug, Serialize)]
struct TokenEntry<'a> {
    #[serde(flatten)]
    token: &'a Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<Range<usize>>,
}

/// `KIND "value"` per line, optionally followed by the byte range.
pub fn to_simple_str(tokens: &TokenStream, show_spans: bool) -> String {
    let mut output = String::new();
    for (token, range) in tokens {
        output.push_str(&token.to_string());
        if show_spans {
            output.push_str(&format!(" @{}..{}", range.start, range.end));
        }
        output.push('\n');
    }
    output
}

pub fn to_json_str(tokens: &TokenStream, show_spans: bool) -> Result<String, serde_json::Error> {
    let entries: Vec<TokenEntry> = tokens
        .iter()
        .map(|(token, range)| TokenEntry {
            token,
            span: show_spans.then(|| range.clone()),
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}
