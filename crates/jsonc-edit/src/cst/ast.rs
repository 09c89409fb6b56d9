//! Typed layer over the node graph
//!
//! Each wrapper is a thin newtype over [`SyntaxNode`] with a `cast()` for
//! safe downcasting, plus the accessors and mutators that make sense for its
//! kind. Accessors come in pairs: a quiet variant returning `Option` and an
//! `*_or_throw` variant returning `Result<_, TypeError>`; hosts choose per
//! call site.
//!
//! # Example
//!
//! ```
//! use jsonc_edit::parse;
//!
//! let root = parse("{\n  \"name\": \"demo\"\n}").unwrap();
//! let object = root.as_object_or_throw().unwrap();
//! let prop = object.get_or_throw("name").unwrap();
//! assert_eq!(prop.value().unwrap().as_string().unwrap(), "demo");
//! ```

use crate::cst::edit::{
    self, CstInputValue, NewEntry, NewlineKind, TrailingCommaMode,
};
use crate::cst::lexer::decode_string;
use crate::cst::nodes::SyntaxNode;
use crate::cst::parser::parse_document;
use crate::cst::SyntaxKind;
use crate::error::{ConversionError, StateError, SyntaxError, TypeError};
use crate::options::ParseOptions;
use std::fmt;

/// Casting and shared navigation for every typed CST wrapper.
pub trait CstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    fn parent(&self) -> Option<SyntaxNode> {
        self.syntax().parent()
    }

    fn parent_or_throw(&self) -> Result<SyntaxNode, TypeError> {
        self.parent().ok_or(TypeError::MissingParent)
    }

    /// All ancestors, nearest first.
    fn ancestors(&self) -> Vec<SyntaxNode> {
        self.syntax().ancestors()
    }

    fn child_index(&self) -> usize {
        self.syntax().child_index()
    }

    fn previous_sibling(&self) -> Option<SyntaxNode> {
        self.syntax().previous_sibling()
    }

    fn previous_siblings(&self) -> Vec<SyntaxNode> {
        self.syntax().previous_siblings()
    }

    fn next_sibling(&self) -> Option<SyntaxNode> {
        self.syntax().next_sibling()
    }

    fn next_siblings(&self) -> Vec<SyntaxNode> {
        self.syntax().next_siblings()
    }

    fn children(&self) -> Vec<SyntaxNode> {
        self.syntax().children()
    }

    fn children_exclude_trivia_and_tokens(&self) -> Vec<SyntaxNode> {
        self.syntax().children_exclude_trivia_and_tokens()
    }

    fn child_at_index(&self, index: usize) -> Option<SyntaxNode> {
        self.syntax().child_at_index(index)
    }

    /// The document root, if this node is still attached to one.
    fn root_node(&self) -> Option<CstRootNode> {
        CstRootNode::cast(self.syntax().topmost())
    }

    fn root_node_or_throw(&self) -> Result<CstRootNode, TypeError> {
        self.root_node().ok_or(TypeError::MissingRoot)
    }

    /// The indentation of the line this node starts on.
    fn indent_text(&self) -> Option<String> {
        edit::indent_text_of(self.syntax())
    }

    /// Whether the closest enclosing object or array ends its last child
    /// with a comma.
    fn uses_trailing_commas(&self) -> bool {
        edit::enclosing_comma_container(self.syntax())
            .map(|container| edit::uses_trailing_commas_in(&container))
            .unwrap_or(false)
    }
}

macro_rules! impl_cst_node {
    ($name:ident, $kind:pat) => {
        impl CstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $kind)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }

        impl $name {
            pub(crate) fn new(syntax: SyntaxNode) -> Self {
                debug_assert!(Self::can_cast(syntax.kind()));
                Self { syntax }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.syntax, f)
            }
        }
    };
}

// ============================================================================
// Root
// ============================================================================

/// The root of a parsed document. Serializing it reproduces the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstRootNode {
    syntax: SyntaxNode,
}

impl_cst_node!(CstRootNode, SyntaxKind::Root);

impl CstRootNode {
    /// Parse JSONC text into a lossless CST.
    pub fn parse(text: &str, options: &ParseOptions) -> Result<Self, SyntaxError> {
        parse_document(text, options).map(Self::new)
    }

    /// The single significant value of the document, if any.
    pub fn value(&self) -> Option<SyntaxNode> {
        self.syntax
            .children_exclude_trivia_and_tokens()
            .into_iter()
            .next()
    }

    pub fn value_or_throw(&self) -> Result<SyntaxNode, TypeError> {
        self.value().ok_or(TypeError::MissingValue)
    }

    pub fn as_object(&self) -> Option<CstObject> {
        self.value().and_then(CstObject::cast)
    }

    pub fn as_object_or_throw(&self) -> Result<CstObject, TypeError> {
        self.as_object().ok_or_else(|| TypeError::UnexpectedKind {
            expected: "an object value",
            found: self.found_value_description(),
        })
    }

    /// Returns the object value, creating an empty one when the document is
    /// empty. A value of a different kind yields `None`.
    pub fn as_object_or_create(&self) -> Option<CstObject> {
        if self.value().is_none() {
            edit::root_set_value(&self.syntax, CstInputValue::Object(Vec::new()));
        }
        self.as_object()
    }

    /// Returns the object value, replacing any other value with an empty
    /// object. A handle to the replaced value becomes detached.
    pub fn as_object_or_force(&self) -> CstObject {
        self.force_value(SyntaxKind::Object)
            .and_then(CstObject::cast)
            .unwrap_or_else(|| unreachable!("forcing the root value cannot fail"))
    }

    pub fn as_array(&self) -> Option<CstArray> {
        self.value().and_then(CstArray::cast)
    }

    pub fn as_array_or_throw(&self) -> Result<CstArray, TypeError> {
        self.as_array().ok_or_else(|| TypeError::UnexpectedKind {
            expected: "an array value",
            found: self.found_value_description(),
        })
    }

    /// Returns the array value, creating an empty one when the document is
    /// empty. A value of a different kind yields `None`.
    pub fn as_array_or_create(&self) -> Option<CstArray> {
        if self.value().is_none() {
            edit::root_set_value(&self.syntax, CstInputValue::Array(Vec::new()));
        }
        self.as_array()
    }

    /// Returns the array value, replacing any other value with an empty
    /// array. A handle to the replaced value becomes detached.
    pub fn as_array_or_force(&self) -> CstArray {
        self.force_value(SyntaxKind::Array)
            .and_then(CstArray::cast)
            .unwrap_or_else(|| unreachable!("forcing the root value cannot fail"))
    }

    /// Replace the document value (or fill an empty document).
    pub fn set_value(&self, value: impl Into<CstInputValue>) {
        edit::root_set_value(&self.syntax, value.into());
    }

    /// Remove every child, leaving an empty document.
    pub fn clear_children(&self) {
        self.syntax.clear_raw();
    }

    /// Apply the trailing comma mode to every container in the document.
    pub fn set_trailing_commas(&self, mode: TrailingCommaMode) {
        edit::set_trailing_commas(&self.syntax, mode, true);
    }

    /// The single-level indentation unit used by the document, when any line
    /// is indented.
    pub fn single_indent_text(&self) -> Option<String> {
        edit::detect_single_indent(&self.syntax)
    }

    /// The newline flavor of the document: CRLF when any CRLF appears,
    /// else LF.
    pub fn newline_kind(&self) -> NewlineKind {
        edit::detect_newline_kind(&self.syntax)
    }

    fn force_value(&self, kind: SyntaxKind) -> Option<SyntaxNode> {
        let value = match self.value() {
            Some(value) => value,
            None => {
                let input = if kind == SyntaxKind::Object {
                    CstInputValue::Object(Vec::new())
                } else {
                    CstInputValue::Array(Vec::new())
                };
                edit::root_set_value(&self.syntax, input);
                return self.value();
            }
        };
        edit::force_container(&value, kind).ok()
    }

    fn found_value_description(&self) -> &'static str {
        match self.value() {
            Some(value) => value.kind().description(),
            None => "nothing",
        }
    }
}

// ============================================================================
// Object
// ============================================================================

/// An object node `{ ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstObject {
    syntax: SyntaxNode,
}

impl_cst_node!(CstObject, SyntaxKind::Object);

impl CstObject {
    /// All properties in source order.
    pub fn properties(&self) -> Vec<CstObjectProp> {
        self.syntax
            .children_exclude_trivia_and_tokens()
            .into_iter()
            .filter_map(CstObjectProp::cast)
            .collect()
    }

    /// The first property whose decoded name equals `name`.
    pub fn get(&self, name: &str) -> Option<CstObjectProp> {
        self.properties().into_iter().find(|prop| {
            prop.name()
                .and_then(|prop_name| prop_name.decoded_value().ok())
                .as_deref()
                == Some(name)
        })
    }

    pub fn get_or_throw(&self, name: &str) -> Result<CstObjectProp, TypeError> {
        self.get(name)
            .ok_or_else(|| TypeError::MissingProperty(name.to_string()))
    }

    pub fn get_if_object(&self, name: &str) -> Option<CstObject> {
        self.get(name).and_then(|prop| prop.value_if_object())
    }

    pub fn get_if_object_or_throw(&self, name: &str) -> Result<CstObject, TypeError> {
        self.get_if_object(name).ok_or_else(|| TypeError::PropertyKind {
            name: name.to_string(),
            expected: "an object value",
        })
    }

    /// The property's object value, appending the property with an empty
    /// object when it is missing. An existing value of a different kind
    /// yields `None`.
    pub fn get_if_object_or_create(&self, name: &str) -> Result<Option<CstObject>, StateError> {
        match self.get(name) {
            Some(prop) => Ok(prop.value_if_object()),
            None => {
                let prop = self.append(name, CstInputValue::Object(Vec::new()))?;
                Ok(prop.value_if_object())
            }
        }
    }

    /// The property's object value, creating or force-replacing it with an
    /// empty object as needed.
    pub fn get_if_object_or_force(&self, name: &str) -> Result<CstObject, StateError> {
        match self.get(name) {
            Some(prop) => prop.value_if_object_or_force(),
            None => {
                let prop = self.append(name, CstInputValue::Object(Vec::new()))?;
                prop.value_if_object_or_force()
            }
        }
    }

    pub fn get_if_array(&self, name: &str) -> Option<CstArray> {
        self.get(name).and_then(|prop| prop.value_if_array())
    }

    pub fn get_if_array_or_throw(&self, name: &str) -> Result<CstArray, TypeError> {
        self.get_if_array(name).ok_or_else(|| TypeError::PropertyKind {
            name: name.to_string(),
            expected: "an array value",
        })
    }

    /// The property's array value, appending the property with an empty
    /// array when it is missing. An existing value of a different kind
    /// yields `None`.
    pub fn get_if_array_or_create(&self, name: &str) -> Result<Option<CstArray>, StateError> {
        match self.get(name) {
            Some(prop) => Ok(prop.value_if_array()),
            None => {
                let prop = self.append(name, CstInputValue::Array(Vec::new()))?;
                Ok(prop.value_if_array())
            }
        }
    }

    /// The property's array value, creating or force-replacing it with an
    /// empty array as needed.
    pub fn get_if_array_or_force(&self, name: &str) -> Result<CstArray, StateError> {
        match self.get(name) {
            Some(prop) => prop.value_if_array_or_force(),
            None => {
                let prop = self.append(name, CstInputValue::Array(Vec::new()))?;
                prop.value_if_array_or_force()
            }
        }
    }

    /// Append a property after the current last one.
    pub fn append(
        &self,
        key: &str,
        value: impl Into<CstInputValue>,
    ) -> Result<CstObjectProp, StateError> {
        let count = self.properties().len();
        self.insert(count, key, value)
    }

    /// Insert a property at `index` (an index into [`Self::properties`]).
    pub fn insert(
        &self,
        index: usize,
        key: &str,
        value: impl Into<CstInputValue>,
    ) -> Result<CstObjectProp, StateError> {
        let node = edit::insert_entry(
            &self.syntax,
            index,
            NewEntry::Property(key.to_string(), value.into()),
        )?;
        Ok(CstObjectProp::new(node))
    }

    /// Apply the trailing comma mode to this object only.
    pub fn set_trailing_commas(&self, mode: TrailingCommaMode) -> Result<(), StateError> {
        self.syntax.ensure_attached()?;
        edit::set_trailing_commas(&self.syntax, mode, false);
        Ok(())
    }

    /// Put every property on its own line. Multiline objects are untouched.
    pub fn ensure_multiline(&self) -> Result<(), StateError> {
        edit::ensure_multiline(&self.syntax)
    }

    /// Replace this object with a fresh value, keeping surrounding trivia.
    pub fn replace_with(
        &self,
        value: impl Into<CstInputValue>,
    ) -> Result<SyntaxNode, StateError> {
        edit::replace_node_with(&self.syntax, value.into())
    }

    /// Detach this object from its parent, together with its separator.
    pub fn remove(self) -> Result<(), StateError> {
        edit::remove_from_parent(&self.syntax)
    }
}

// ============================================================================
// Array
// ============================================================================

/// An array node `[ ... ]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstArray {
    syntax: SyntaxNode,
}

impl_cst_node!(CstArray, SyntaxKind::Array);

impl CstArray {
    /// The significant element nodes, commas and trivia skipped.
    pub fn elements(&self) -> Vec<SyntaxNode> {
        self.syntax.children_exclude_trivia_and_tokens()
    }

    /// Append an element after the current last one.
    pub fn append(&self, value: impl Into<CstInputValue>) -> Result<SyntaxNode, StateError> {
        let count = self.elements().len();
        self.insert(count, value)
    }

    /// Insert an element at `index` (an index into [`Self::elements`]).
    pub fn insert(
        &self,
        index: usize,
        value: impl Into<CstInputValue>,
    ) -> Result<SyntaxNode, StateError> {
        edit::insert_entry(&self.syntax, index, NewEntry::Element(value.into()))
    }

    /// Apply the trailing comma mode to this array only.
    pub fn set_trailing_commas(&self, mode: TrailingCommaMode) -> Result<(), StateError> {
        self.syntax.ensure_attached()?;
        edit::set_trailing_commas(&self.syntax, mode, false);
        Ok(())
    }

    /// Put every element on its own line. Multiline arrays are untouched.
    pub fn ensure_multiline(&self) -> Result<(), StateError> {
        edit::ensure_multiline(&self.syntax)
    }

    /// Replace this array with a fresh value, keeping surrounding trivia.
    pub fn replace_with(
        &self,
        value: impl Into<CstInputValue>,
    ) -> Result<SyntaxNode, StateError> {
        edit::replace_node_with(&self.syntax, value.into())
    }

    /// Detach this array from its parent, together with its separator.
    pub fn remove(self) -> Result<(), StateError> {
        edit::remove_from_parent(&self.syntax)
    }
}

// ============================================================================
// Object property
// ============================================================================

/// A `name: value` pair inside an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstObjectProp {
    syntax: SyntaxNode,
}

impl_cst_node!(CstObjectProp, SyntaxKind::ObjectProp);

impl CstObjectProp {
    /// The property name node.
    pub fn name(&self) -> Option<ObjectPropName> {
        let name = self
            .syntax
            .children_exclude_trivia_and_tokens()
            .into_iter()
            .next()?;
        match name.kind() {
            SyntaxKind::StringLit => Some(ObjectPropName::String(CstStringLit::new(name))),
            SyntaxKind::WordLit => Some(ObjectPropName::Word(CstWordLit::new(name))),
            _ => None,
        }
    }

    pub fn name_or_throw(&self) -> Result<ObjectPropName, TypeError> {
        self.name().ok_or(TypeError::MissingPropertyName)
    }

    /// The property value node.
    pub fn value(&self) -> Option<SyntaxNode> {
        self.syntax
            .children_exclude_trivia_and_tokens()
            .into_iter()
            .nth(1)
    }

    pub fn value_or_throw(&self) -> Result<SyntaxNode, TypeError> {
        self.value().ok_or(TypeError::MissingValue)
    }

    pub fn value_if_object(&self) -> Option<CstObject> {
        self.value().and_then(CstObject::cast)
    }

    pub fn value_if_object_or_throw(&self) -> Result<CstObject, TypeError> {
        self.value_if_object()
            .ok_or_else(|| TypeError::UnexpectedKind {
                expected: "an object value",
                found: self.found_value_description(),
            })
    }

    /// The value as an object, force-replacing a value of any other kind
    /// with an empty object. The replaced handle becomes detached.
    pub fn value_if_object_or_force(&self) -> Result<CstObject, StateError> {
        self.force_value(SyntaxKind::Object).map(CstObject::new)
    }

    pub fn value_if_array(&self) -> Option<CstArray> {
        self.value().and_then(CstArray::cast)
    }

    pub fn value_if_array_or_throw(&self) -> Result<CstArray, TypeError> {
        self.value_if_array()
            .ok_or_else(|| TypeError::UnexpectedKind {
                expected: "an array value",
                found: self.found_value_description(),
            })
    }

    /// The value as an array, force-replacing a value of any other kind
    /// with an empty array. The replaced handle becomes detached.
    pub fn value_if_array_or_force(&self) -> Result<CstArray, StateError> {
        self.force_value(SyntaxKind::Array).map(CstArray::new)
    }

    /// Replace the property value with a fresh one.
    pub fn set_value(&self, value: impl Into<CstInputValue>) -> Result<(), StateError> {
        edit::set_prop_value(&self.syntax, value.into())
    }

    /// Replace the whole property, name included.
    pub fn replace_with(
        &self,
        key: &str,
        value: impl Into<CstInputValue>,
    ) -> Result<CstObjectProp, StateError> {
        edit::replace_prop_with(&self.syntax, key, value.into()).map(CstObjectProp::new)
    }

    /// Detach this property from its object, together with its separator
    /// and same-line trivia.
    pub fn remove(self) -> Result<(), StateError> {
        edit::remove_from_parent(&self.syntax)
    }

    /// Position among the sibling properties.
    pub fn property_index(&self) -> usize {
        significant_position(&self.syntax).unwrap_or(0)
    }

    pub fn previous_property(&self) -> Option<CstObjectProp> {
        let object = self.parent().and_then(CstObject::cast)?;
        let index = self.property_index();
        if index == 0 {
            None
        } else {
            object.properties().into_iter().nth(index - 1)
        }
    }

    pub fn next_property(&self) -> Option<CstObjectProp> {
        let object = self.parent().and_then(CstObject::cast)?;
        object.properties().into_iter().nth(self.property_index() + 1)
    }

    fn force_value(&self, kind: SyntaxKind) -> Result<SyntaxNode, StateError> {
        self.syntax.ensure_attached()?;
        match self.value() {
            Some(value) => edit::force_container(&value, kind),
            None => {
                let input = if kind == SyntaxKind::Object {
                    CstInputValue::Object(Vec::new())
                } else {
                    CstInputValue::Array(Vec::new())
                };
                edit::set_prop_value(&self.syntax, input)?;
                self.value().ok_or(StateError::Detached)
            }
        }
    }

    fn found_value_description(&self) -> &'static str {
        match self.value() {
            Some(value) => value.kind().description(),
            None => "nothing",
        }
    }
}

/// The name of an object property: a string literal or, in loose mode, a
/// bare word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectPropName {
    String(CstStringLit),
    Word(CstWordLit),
}

impl ObjectPropName {
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            ObjectPropName::String(name) => name.syntax(),
            ObjectPropName::Word(name) => name.syntax(),
        }
    }

    /// The unescaped key.
    pub fn decoded_value(&self) -> Result<String, ConversionError> {
        match self {
            ObjectPropName::String(name) => name.decoded_value(),
            ObjectPropName::Word(name) => Ok(name.value()),
        }
    }
}

impl fmt::Display for ObjectPropName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.syntax(), f)
    }
}

// ============================================================================
// Value leaves
// ============================================================================

/// A string literal, quotes and escapes preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstStringLit {
    syntax: SyntaxNode,
}

impl_cst_node!(CstStringLit, SyntaxKind::StringLit);

impl CstStringLit {
    /// The unescaped string value.
    pub fn decoded_value(&self) -> Result<String, ConversionError> {
        decode_string(&self.raw_value())
    }

    /// The literal source text, quotes included.
    pub fn raw_value(&self) -> String {
        self.syntax.leaf_text().unwrap_or_default()
    }

    /// Overwrite the literal source text. The caller supplies a complete,
    /// well-formed string literal including its quotes.
    pub fn set_raw_value(&self, value: impl Into<String>) -> Result<(), StateError> {
        self.syntax.ensure_attached()?;
        self.syntax.set_leaf_text(value);
        Ok(())
    }

    pub fn replace_with(
        &self,
        value: impl Into<CstInputValue>,
    ) -> Result<SyntaxNode, StateError> {
        edit::replace_node_with(&self.syntax, value.into())
    }

    pub fn remove(self) -> Result<(), StateError> {
        edit::remove_from_parent(&self.syntax)
    }
}

/// A number literal, kept as its exact source text so precision and
/// formatting survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstNumberLit {
    syntax: SyntaxNode,
}

impl_cst_node!(CstNumberLit, SyntaxKind::NumberLit);

impl CstNumberLit {
    /// The literal source text. Callers decide how to interpret it.
    pub fn value(&self) -> String {
        self.syntax.leaf_text().unwrap_or_default()
    }

    /// Overwrite the literal source text with a well-formed number literal.
    pub fn set_raw_value(&self, value: impl Into<String>) -> Result<(), StateError> {
        self.syntax.ensure_attached()?;
        self.syntax.set_leaf_text(value);
        Ok(())
    }

    pub fn replace_with(
        &self,
        value: impl Into<CstInputValue>,
    ) -> Result<SyntaxNode, StateError> {
        edit::replace_node_with(&self.syntax, value.into())
    }

    pub fn remove(self) -> Result<(), StateError> {
        edit::remove_from_parent(&self.syntax)
    }
}

/// A `true` or `false` literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstBooleanLit {
    syntax: SyntaxNode,
}

impl_cst_node!(CstBooleanLit, SyntaxKind::BooleanLit);

impl CstBooleanLit {
    pub fn value(&self) -> bool {
        self.syntax.leaf_text().as_deref() == Some("true")
    }

    pub fn set_value(&self, value: bool) -> Result<(), StateError> {
        self.syntax.ensure_attached()?;
        self.syntax
            .set_leaf_text(if value { "true" } else { "false" });
        Ok(())
    }

    pub fn replace_with(
        &self,
        value: impl Into<CstInputValue>,
    ) -> Result<SyntaxNode, StateError> {
        edit::replace_node_with(&self.syntax, value.into())
    }

    pub fn remove(self) -> Result<(), StateError> {
        edit::remove_from_parent(&self.syntax)
    }
}

/// The `null` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstNullKeyword {
    syntax: SyntaxNode,
}

impl_cst_node!(CstNullKeyword, SyntaxKind::NullKeyword);

impl CstNullKeyword {
    pub fn replace_with(
        &self,
        value: impl Into<CstInputValue>,
    ) -> Result<SyntaxNode, StateError> {
        edit::replace_node_with(&self.syntax, value.into())
    }

    pub fn remove(self) -> Result<(), StateError> {
        edit::remove_from_parent(&self.syntax)
    }
}

/// A bare identifier used as an object key in loose mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstWordLit {
    syntax: SyntaxNode,
}

impl_cst_node!(CstWordLit, SyntaxKind::WordLit);

impl CstWordLit {
    pub fn value(&self) -> String {
        self.syntax.leaf_text().unwrap_or_default()
    }

    /// Overwrite the word text.
    pub fn set_raw_value(&self, value: impl Into<String>) -> Result<(), StateError> {
        self.syntax.ensure_attached()?;
        self.syntax.set_leaf_text(value);
        Ok(())
    }

    pub fn replace_with(
        &self,
        value: impl Into<CstInputValue>,
    ) -> Result<SyntaxNode, StateError> {
        edit::replace_node_with(&self.syntax, value.into())
    }

    pub fn remove(self) -> Result<(), StateError> {
        edit::remove_from_parent(&self.syntax)
    }
}

// ============================================================================
// Generic node accessors
// ============================================================================

impl SyntaxNode {
    pub fn as_root_node(&self) -> Option<CstRootNode> {
        CstRootNode::cast(self.clone())
    }

    pub fn as_root_node_or_throw(&self) -> Result<CstRootNode, TypeError> {
        self.as_root_node().ok_or_else(|| self.kind_error("a root node"))
    }

    pub fn as_object(&self) -> Option<CstObject> {
        CstObject::cast(self.clone())
    }

    pub fn as_object_or_throw(&self) -> Result<CstObject, TypeError> {
        self.as_object().ok_or_else(|| self.kind_error("an object"))
    }

    pub fn as_array(&self) -> Option<CstArray> {
        CstArray::cast(self.clone())
    }

    pub fn as_array_or_throw(&self) -> Result<CstArray, TypeError> {
        self.as_array().ok_or_else(|| self.kind_error("an array"))
    }

    pub fn as_object_prop(&self) -> Option<CstObjectProp> {
        CstObjectProp::cast(self.clone())
    }

    pub fn as_string_lit(&self) -> Option<CstStringLit> {
        CstStringLit::cast(self.clone())
    }

    pub fn as_string_lit_or_throw(&self) -> Result<CstStringLit, TypeError> {
        self.as_string_lit()
            .ok_or_else(|| self.kind_error("a string literal"))
    }

    pub fn as_number_lit(&self) -> Option<CstNumberLit> {
        CstNumberLit::cast(self.clone())
    }

    pub fn as_number_lit_or_throw(&self) -> Result<CstNumberLit, TypeError> {
        self.as_number_lit()
            .ok_or_else(|| self.kind_error("a number literal"))
    }

    pub fn as_boolean_lit(&self) -> Option<CstBooleanLit> {
        CstBooleanLit::cast(self.clone())
    }

    pub fn as_boolean_lit_or_throw(&self) -> Result<CstBooleanLit, TypeError> {
        self.as_boolean_lit()
            .ok_or_else(|| self.kind_error("a boolean literal"))
    }

    pub fn as_null_keyword(&self) -> Option<CstNullKeyword> {
        CstNullKeyword::cast(self.clone())
    }

    pub fn as_null_keyword_or_throw(&self) -> Result<CstNullKeyword, TypeError> {
        self.as_null_keyword()
            .ok_or_else(|| self.kind_error("a null keyword"))
    }

    pub fn as_word_lit(&self) -> Option<CstWordLit> {
        CstWordLit::cast(self.clone())
    }

    pub fn as_word_lit_or_throw(&self) -> Result<CstWordLit, TypeError> {
        self.as_word_lit()
            .ok_or_else(|| self.kind_error("a word literal"))
    }

    /// The decoded text of a string literal node.
    pub fn as_string(&self) -> Option<String> {
        self.as_string_lit()
            .and_then(|lit| lit.decoded_value().ok())
    }

    pub fn as_string_or_throw(&self) -> Result<String, TypeError> {
        let lit = self.as_string_lit_or_throw()?;
        lit.decoded_value()
            .map_err(|error| TypeError::StringDecode(error.to_string()))
    }

    pub fn as_boolean(&self) -> Option<bool> {
        self.as_boolean_lit().map(|lit| lit.value())
    }

    pub fn as_boolean_or_throw(&self) -> Result<bool, TypeError> {
        self.as_boolean_lit_or_throw().map(|lit| lit.value())
    }

    /// The source text of a number literal; never a binary number, so
    /// precision and formatting are preserved.
    pub fn number_value(&self) -> Option<String> {
        self.as_number_lit().map(|lit| lit.value())
    }

    pub fn number_value_or_throw(&self) -> Result<String, TypeError> {
        self.as_number_lit_or_throw().map(|lit| lit.value())
    }

    pub fn is_null(&self) -> bool {
        self.kind() == SyntaxKind::NullKeyword
    }

    pub fn is_string(&self) -> bool {
        self.kind() == SyntaxKind::StringLit
    }

    pub fn is_number(&self) -> bool {
        self.kind() == SyntaxKind::NumberLit
    }

    pub fn is_boolean(&self) -> bool {
        self.kind() == SyntaxKind::BooleanLit
    }

    /// The document root, if this node is still attached to one.
    pub fn root_node(&self) -> Option<CstRootNode> {
        CstRootNode::cast(self.topmost())
    }

    pub fn root_node_or_throw(&self) -> Result<CstRootNode, TypeError> {
        self.root_node().ok_or(TypeError::MissingRoot)
    }

    /// The indentation of the line this node starts on.
    pub fn indent_text(&self) -> Option<String> {
        edit::indent_text_of(self)
    }

    /// Whether the closest enclosing object or array ends its last child
    /// with a comma.
    pub fn uses_trailing_commas(&self) -> bool {
        edit::enclosing_comma_container(self)
            .map(|container| edit::uses_trailing_commas_in(&container))
            .unwrap_or(false)
    }

    /// Position among an array's significant elements, when this node is an
    /// array element.
    pub fn element_index(&self) -> Option<usize> {
        let parent = self.parent()?;
        if parent.kind() != SyntaxKind::Array {
            return None;
        }
        significant_position(self)
    }

    /// Replace this node with a fresh value, keeping surrounding trivia.
    pub fn replace_with(
        &self,
        value: impl Into<CstInputValue>,
    ) -> Result<SyntaxNode, StateError> {
        edit::replace_node_with(self, value.into())
    }

    /// Detach this node from its parent, together with its separator and
    /// same-line trivia.
    pub fn remove(&self) -> Result<(), StateError> {
        if self.kind() == SyntaxKind::Root {
            return Err(StateError::CannotRemoveRoot);
        }
        edit::remove_from_parent(self)
    }

    /// Force-coerce into an object: an object is returned as-is, anything
    /// else is replaced in place by `{}` and the old handle detaches.
    pub fn as_object_or_force(&self) -> Result<CstObject, StateError> {
        if self.kind() == SyntaxKind::Root {
            return Ok(CstRootNode::new(self.clone()).as_object_or_force());
        }
        self.ensure_attached()?;
        edit::force_container(self, SyntaxKind::Object).map(CstObject::new)
    }

    /// Force-coerce into an array: an array is returned as-is, anything
    /// else is replaced in place by `[]` and the old handle detaches.
    pub fn as_array_or_force(&self) -> Result<CstArray, StateError> {
        if self.kind() == SyntaxKind::Root {
            return Ok(CstRootNode::new(self.clone()).as_array_or_force());
        }
        self.ensure_attached()?;
        edit::force_container(self, SyntaxKind::Array).map(CstArray::new)
    }

    fn kind_error(&self, expected: &'static str) -> TypeError {
        TypeError::UnexpectedKind {
            expected,
            found: self.kind().description(),
        }
    }
}

fn significant_position(node: &SyntaxNode) -> Option<usize> {
    let parent = node.parent()?;
    parent
        .children_exclude_trivia_and_tokens()
        .iter()
        .position(|candidate| candidate == node)
}
