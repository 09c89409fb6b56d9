//! Concrete syntax tree: lossless parsing, navigation, and editing
//!
//! The CST retains every source byte, comments and whitespace included, so
//! serializing an unmodified tree reproduces its input exactly. Mutations
//! synthesize formatting for new nodes from the surrounding context and
//! leave untouched regions byte-for-byte intact.

mod ast;
mod edit;
mod lexer;
mod nodes;
mod parser;
mod syntax_kind;

pub use ast::{
    CstArray, CstBooleanLit, CstNode, CstNullKeyword, CstNumberLit, CstObject, CstObjectProp,
    CstRootNode, CstStringLit, CstWordLit, ObjectPropName,
};
pub use edit::{CstInputValue, NewlineKind, RawText, TrailingCommaMode};
pub use nodes::SyntaxNode;
pub use syntax_kind::SyntaxKind;

pub(crate) use lexer::{decode_string, lex, Token};
