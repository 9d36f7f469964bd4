//! Error types for compilation

use thiserror::Error;

/// Broad class of a [CompileError].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input document is malformed
    Syntax,
    /// The compiler reached a state it should never be in
    Internal,
}

/// Errors that abort a compilation. Nothing is emitted when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A delimiter without its counterpart.
    #[error("Unbalanced delimiter '{delimiter}' at byte {offset}")]
    UnbalancedDelimiter { delimiter: char, offset: usize },

    /// More than one kind of operator joins the items of one group.
    #[error("Ambiguity in sequencing: {node}")]
    AmbiguousSequencing { node: String },

    /// An operator with nothing on its left.
    #[error("Operator '{operator}' has no left operand in {node}")]
    DanglingOperator { operator: String, node: String },

    /// The same annotation attribute appears twice in one annotation block.
    #[error("Redefinition of annotation attribute '{name}'")]
    DuplicateAnnotation { name: String },

    /// An annotation block that is not a list of `prefix? name = "value"` items.
    #[error("Malformed annotation block: {0}")]
    MalformedAnnotation(String),

    /// A namespace or datatypes declaration without a value.
    #[error("Malformed {kind} declaration: '{text}'")]
    MalformedDeclaration { kind: &'static str, text: String },

    #[error("Internal compiler error: {0}")]
    InternalInvariant(String),
}

impl CompileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompileError::InternalInvariant(_) => ErrorCategory::Internal,
            _ => ErrorCategory::Syntax,
        }
    }

    /// Byte offset into the normalized source, when the error is tied to one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            CompileError::UnbalancedDelimiter { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Format source code context around a byte offset
///
/// Shows 2 lines before the offending line, the line itself with a `>>` marker, and 2
/// lines after. Lines are numbered from 1.
pub fn format_source_context(source: &str, offset: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let offset = offset.min(source.len());
    let error_line = source
        .bytes()
        .take(offset)
        .filter(|byte| *byte == b'\n')
        .count();

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, line) in lines
        .iter()
        .enumerate()
        .take(end_line)
        .skip(start_line)
    {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let syntax = CompileError::UnbalancedDelimiter {
            delimiter: '{',
            offset: 3,
        };
        assert_eq!(syntax.category(), ErrorCategory::Syntax);
        assert_eq!(syntax.offset(), Some(3));

        let internal = CompileError::InternalInvariant("missing name".to_string());
        assert_eq!(internal.category(), ErrorCategory::Internal);
        assert_eq!(internal.offset(), None);
    }

    #[test]
    fn test_error_display() {
        let err = CompileError::UnbalancedDelimiter {
            delimiter: ')',
            offset: 12,
        };
        assert_eq!(err.to_string(), "Unbalanced delimiter ')' at byte 12");

        let err = CompileError::DuplicateAnnotation {
            name: "ns:x".to_string(),
        };
        assert_eq!(err.to_string(), "Redefinition of annotation attribute 'ns:x'");
    }

    #[test]
    fn test_format_source_context() {
        let source = "line 1\nline 2\nline 3\nerror line\nline 5\nline 6\nline 7";
        let offset = source.find("error").unwrap();

        let context = format_source_context(source, offset);

        assert!(!context.contains("line 1"));
        assert!(context.contains("line 2"));
        assert!(context.contains(">>   4 | error line"));
        assert!(context.contains("line 6"));
        assert!(!context.contains("line 7"));
    }

    #[test]
    fn test_format_source_context_at_start() {
        let context = format_source_context("{ open\nnext", 0);
        assert_eq!(context, ">>   1 | { open\n     2 | next\n");
    }
}
