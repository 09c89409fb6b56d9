//! Error types for parsing, navigation, mutation, and value conversion
//!
//! Four independent families, one per failure policy:
//! - [`SyntaxError`] — malformed input, surfaced from the scanner/parser.
//!   Never recovered; no partial trees are produced.
//! - [`TypeError`] — a throwing accessor was invoked on a node of the wrong
//!   kind, or on a missing property.
//! - [`StateError`] — an operation on a node that is detached from its tree.
//! - [`ConversionError`] — the host value bridge met an ill-formed subtree.

use thiserror::Error;

/// Error produced when the input text is not valid JSONC under the active
/// parse options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct SyntaxError {
    /// What went wrong
    pub kind: SyntaxErrorKind,
    /// Byte offset into the source
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
}

impl SyntaxError {
    pub(crate) fn new(kind: SyntaxErrorKind, offset: usize, source: &str) -> Self {
        let (line, column) = line_column(source, offset);
        Self {
            kind,
            offset,
            line,
            column,
        }
    }
}

/// The specific kind of syntax violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unterminated block comment")]
    UnterminatedBlockComment,
    #[error("Invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("Invalid unicode escape sequence")]
    InvalidUnicodeEscape,
    #[error("Invalid number literal")]
    InvalidNumber,
    #[error("Comments are not allowed")]
    CommentsNotAllowed,
    #[error("Single quoted strings are not allowed")]
    SingleQuotedStringsNotAllowed,
    #[error("Hexadecimal numbers are not allowed")]
    HexadecimalNumbersNotAllowed,
    #[error("Numbers with a leading plus sign are not allowed")]
    UnaryPlusNotAllowed,
    #[error("Trailing commas are not allowed")]
    TrailingCommaNotAllowed,
    #[error("Expected a comma separating values")]
    ExpectedComma,
    #[error("Expected a colon after the property name")]
    ExpectedColon,
    #[error("Expected a property name")]
    ExpectedPropertyName,
    #[error("Property names must be string literals")]
    WordPropertyNameNotAllowed,
    #[error("Expected a value")]
    ExpectedValue,
    #[error("Unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Unexpected content after the root value")]
    UnexpectedTrailingContent,
}

/// Error produced by the `*_or_throw` accessor variants.
///
/// The quiet variants return `Option` instead; hosts choose per call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Expected {expected}, but found {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },
    #[error("Expected property '{0}', but it was not found")]
    MissingProperty(String),
    #[error("Expected property '{name}' to have {expected}, but it was not found or has a different type")]
    PropertyKind {
        name: String,
        expected: &'static str,
    },
    #[error("Expected a value, but found none")]
    MissingValue,
    #[error("Expected a property name, but found none")]
    MissingPropertyName,
    #[error("Expected a parent node, but found none")]
    MissingParent,
    #[error("Expected a root node, but found none")]
    MissingRoot,
    #[error("Failed to decode string: {0}")]
    StringDecode(String),
}

/// Error produced by operations that require the node to still be part of a
/// syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Node is detached from its syntax tree")]
    Detached,
    #[error("The root node cannot be removed")]
    CannotRemoveRoot,
}

/// Error produced by the host value bridge when a subtree cannot be turned
/// into a plain value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Invalid escape sequence in string literal")]
    InvalidEscape,
    #[error("Invalid unicode escape in string literal")]
    InvalidUnicodeEscape,
    #[error("Object property has no name")]
    PropertyWithoutName,
    #[error("Property '{0}' has no value")]
    PropertyWithoutValue(String),
    #[error("{0} cannot be converted to a value")]
    UnsupportedNode(&'static str),
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (index, ch) in source.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column_from_offset() {
        let source = "{\n  \"a\": 1\n}";
        assert_eq!(line_column(source, 0), (1, 1));
        assert_eq!(line_column(source, 2), (2, 1));
        assert_eq!(line_column(source, 7), (2, 6));
    }

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::new(SyntaxErrorKind::UnterminatedString, 7, "{\n  \"a: 1\n}");
        assert_eq!(
            err.to_string(),
            "Unterminated string literal at line 2, column 6"
        );
    }

    #[test]
    fn test_type_error_display() {
        let err = TypeError::MissingProperty("data".to_string());
        assert_eq!(
            err.to_string(),
            "Expected property 'data', but it was not found"
        );
    }
}
