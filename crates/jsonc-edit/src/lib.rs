//! # jsonc-edit
//!
//! Lossless parsing and formatting-preserving editing of JSONC (JSON with
//! comments) text.
//!
//! The parser builds a concrete syntax tree that keeps every byte of the
//! original input: comments, whitespace, trailing commas, quoting style,
//! number formatting. A navigation and mutation API rewrites that tree while
//! keeping human-authored formatting intact, inferring indentation and
//! newline style for anything it synthesizes. Serializing an unmodified
//! tree reproduces the input exactly.
//!
//! ```
//! use jsonc_edit::parse;
//!
//! let source = "{\n  // app settings\n  \"retries\": 3\n}";
//! let root = parse(source).unwrap();
//! assert_eq!(root.to_string(), source);
//!
//! let settings = root.as_object_or_throw().unwrap();
//! settings.get_or_throw("retries").unwrap().set_value(5).unwrap();
//! settings.append("timeout", 30).unwrap();
//!
//! assert_eq!(
//!     root.to_string(),
//!     "{\n  // app settings\n  \"retries\": 5,\n  \"timeout\": 30\n}"
//! );
//! ```
//!
//! For reading configuration without editing it, [`parse_to_value`] converts
//! text straight to a [`serde_json::Value`], skipping tree construction.
//!
//! The permissive entry points accept all JSONC extensions; the `*_strict`
//! variants accept plain JSON only. Both merge partial options over their
//! defaults, see [`ParseOptions`].

pub mod cst;
pub mod error;
pub mod options;
mod value;

pub use cst::{
    CstArray, CstBooleanLit, CstInputValue, CstNode, CstNullKeyword, CstNumberLit, CstObject,
    CstObjectProp, CstRootNode, CstStringLit, CstWordLit, NewlineKind, ObjectPropName, RawText,
    SyntaxKind, SyntaxNode, TrailingCommaMode,
};
pub use error::{ConversionError, StateError, SyntaxError, SyntaxErrorKind, TypeError};
pub use options::ParseOptions;

/// Parse JSONC text with every extension enabled.
pub fn parse(text: &str) -> Result<CstRootNode, SyntaxError> {
    CstRootNode::parse(text, &ParseOptions::permissive())
}

/// Parse with explicit options.
pub fn parse_with_options(
    text: &str,
    options: &ParseOptions,
) -> Result<CstRootNode, SyntaxError> {
    CstRootNode::parse(text, options)
}

/// Parse strict JSON: every extension disabled.
pub fn parse_strict(text: &str) -> Result<CstRootNode, SyntaxError> {
    CstRootNode::parse(text, &ParseOptions::strict())
}

/// Parse straight to a plain value with every extension enabled, skipping
/// CST construction. `None` for an empty document.
pub fn parse_to_value(text: &str) -> Result<Option<serde_json::Value>, SyntaxError> {
    value::parse_to_value(text, &ParseOptions::permissive())
}

/// [`parse_to_value`] with explicit options.
pub fn parse_to_value_with_options(
    text: &str,
    options: &ParseOptions,
) -> Result<Option<serde_json::Value>, SyntaxError> {
    value::parse_to_value(text, options)
}

/// [`parse_to_value`] accepting strict JSON only.
pub fn parse_to_value_strict(text: &str) -> Result<Option<serde_json::Value>, SyntaxError> {
    value::parse_to_value(text, &ParseOptions::strict())
}
