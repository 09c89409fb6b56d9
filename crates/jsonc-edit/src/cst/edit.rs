//! Mutation engine: structural edits that preserve surrounding formatting
//!
//! Everything here operates on the raw node graph. The engine owns three
//! concerns:
//!
//! - **Value synthesis** — turning a [`CstInputValue`] into a fresh subtree
//!   formatted to match its insertion context.
//! - **Format inference** — detecting the document newline kind, the single
//!   indentation unit, a container's child indentation, and whether a
//!   container is laid out across multiple lines.
//! - **Comma and trivia discipline** — keeping exactly one separator between
//!   significant siblings across inserts and removes, deleting same-line
//!   trivia together with a removed node, and leaving earlier lines alone.
//!
//! The typed wrappers in the ast module are thin shells over these functions.

use crate::cst::nodes::SyntaxNode;
use crate::cst::parser::parse_document;
use crate::cst::SyntaxKind;
use crate::error::{StateError, SyntaxError, SyntaxErrorKind};
use crate::options::ParseOptions;

const DEFAULT_INDENT: &str = "  ";

/// The newline flavor of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlineKind {
    /// `\n`
    LineFeed,
    /// `\r\n`
    CarriageReturnLineFeed,
}

impl NewlineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewlineKind::LineFeed => "\n",
            NewlineKind::CarriageReturnLineFeed => "\r\n",
        }
    }
}

/// Trailing comma behavior for [`set_trailing_commas`] operations.
///
/// Trailing comma usage is never stored on the tree; it is re-detected from
/// the text, so toggling `IfMultiline` and back to `Never` restores the
/// original bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingCommaMode {
    /// Remove the comma after the last child.
    Never,
    /// Add a comma after the last child of multiline containers. Single line
    /// containers are left alone.
    IfMultiline,
}

// ============================================================================
// Input values
// ============================================================================

/// Pre-validated raw JSONC source, constructed via [`CstInputValue::raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText(String);

/// A host value accepted by the mutation API.
///
/// Conversion is recursive; sequences become arrays and string-keyed pairs
/// become objects with their order preserved. `From` impls cover the common
/// host types, including `serde_json::Value`.
#[derive(Debug, Clone, PartialEq)]
pub enum CstInputValue {
    Null,
    Bool(bool),
    /// Number source text, e.g. `"1.5e3"`
    Number(String),
    /// Plain text; encoded as a double quoted JSON string on insertion
    String(String),
    Array(Vec<CstInputValue>),
    /// Properties in insertion order
    Object(Vec<(String, CstInputValue)>),
    /// Well-formed JSONC source inserted as a freshly parsed subtree
    RawText(RawText),
}

impl CstInputValue {
    /// Wrap already well-formed JSONC source. The text is parsed here so a
    /// malformed snippet fails at construction, never during a mutation.
    pub fn raw(text: impl Into<String>) -> Result<Self, SyntaxError> {
        let text = text.into();
        let root = parse_document(&text, &ParseOptions::permissive())?;
        if root.children_exclude_trivia_and_tokens().is_empty() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::ExpectedValue,
                text.len(),
                &text,
            ));
        }
        Ok(CstInputValue::RawText(RawText(text)))
    }
}

impl From<bool> for CstInputValue {
    fn from(value: bool) -> Self {
        CstInputValue::Bool(value)
    }
}

impl From<i32> for CstInputValue {
    fn from(value: i32) -> Self {
        CstInputValue::Number(value.to_string())
    }
}

impl From<u32> for CstInputValue {
    fn from(value: u32) -> Self {
        CstInputValue::Number(value.to_string())
    }
}

impl From<i64> for CstInputValue {
    fn from(value: i64) -> Self {
        CstInputValue::Number(value.to_string())
    }
}

impl From<u64> for CstInputValue {
    fn from(value: u64) -> Self {
        CstInputValue::Number(value.to_string())
    }
}

impl From<f64> for CstInputValue {
    /// Non-finite values have no JSON representation and become `null`.
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(number) => CstInputValue::Number(number.to_string()),
            None => CstInputValue::Null,
        }
    }
}

impl From<&str> for CstInputValue {
    fn from(value: &str) -> Self {
        CstInputValue::String(value.to_string())
    }
}

impl From<String> for CstInputValue {
    fn from(value: String) -> Self {
        CstInputValue::String(value)
    }
}

impl From<Vec<CstInputValue>> for CstInputValue {
    fn from(items: Vec<CstInputValue>) -> Self {
        CstInputValue::Array(items)
    }
}

impl From<Vec<(String, CstInputValue)>> for CstInputValue {
    fn from(props: Vec<(String, CstInputValue)>) -> Self {
        CstInputValue::Object(props)
    }
}

impl From<serde_json::Value> for CstInputValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CstInputValue::Null,
            serde_json::Value::Bool(b) => CstInputValue::Bool(b),
            serde_json::Value::Number(n) => CstInputValue::Number(n.to_string()),
            serde_json::Value::String(s) => CstInputValue::String(s),
            serde_json::Value::Array(items) => {
                CstInputValue::Array(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => CstInputValue::Object(
                map.into_iter().map(|(key, v)| (key, v.into())).collect(),
            ),
        }
    }
}

// ============================================================================
// Format inference
// ============================================================================

/// Formatting context for synthesized nodes.
#[derive(Debug, Clone)]
pub(crate) struct SynthStyle {
    pub newline: &'static str,
    /// Indentation of the line the synthesized value starts on
    pub line_indent: String,
    pub single_indent: String,
    /// Whether the insertion context is laid out across multiple lines
    pub multiline: bool,
}

/// `\r\n` if any CRLF newline appears anywhere in the document, else `\n`.
pub(crate) fn detect_newline_kind(root: &SyntaxNode) -> NewlineKind {
    fn has_crlf(node: &SyntaxNode) -> bool {
        node.children().iter().any(|child| {
            if child.is_newline() {
                child
                    .leaf_text()
                    .is_some_and(|text| text.starts_with('\r'))
            } else {
                child.is_container() && has_crlf(child)
            }
        })
    }
    if has_crlf(root) {
        NewlineKind::CarriageReturnLineFeed
    } else {
        NewlineKind::LineFeed
    }
}

/// The single-level indentation unit, derived from the first indented line
/// in the document. `None` when nothing in the document is indented.
pub(crate) fn detect_single_indent(root: &SyntaxNode) -> Option<String> {
    fn search(container: &SyntaxNode) -> Option<String> {
        let children = container.children();
        for index in 0..children.len().saturating_sub(1) {
            if children[index].is_newline() && children[index + 1].is_whitespace() {
                let ws = children[index + 1].leaf_text().unwrap_or_default();
                let base = indent_text_of(container).unwrap_or_default();
                let single = ws
                    .strip_prefix(base.as_str())
                    .filter(|stripped| !stripped.is_empty())
                    .map(str::to_string)
                    .unwrap_or(ws);
                return Some(single);
            }
        }
        children
            .iter()
            .filter(|child| child.is_container())
            .find_map(search)
    }
    search(root)
}

/// The indentation of the line this node starts on.
pub(crate) fn indent_text_of(node: &SyntaxNode) -> Option<String> {
    let parent = match node.parent() {
        Some(parent) => parent,
        None => {
            return if node.kind() == SyntaxKind::Root {
                Some(String::new())
            } else {
                None
            };
        }
    };
    let children = parent.children();
    let index = node.child_index();
    for j in (0..index).rev() {
        if children[j].is_newline() {
            if j + 1 < index && children[j + 1].is_whitespace() {
                return children[j + 1].leaf_text();
            }
            return Some(String::new());
        }
    }
    // No newline earlier in this container: the node starts on the same line
    // as its parent.
    indent_text_of(&parent)
}

/// A container is multiline when any of its direct children is a newline.
pub(crate) fn is_multiline(container: &SyntaxNode) -> bool {
    container.children().iter().any(SyntaxNode::is_newline)
}

/// The separator comma following `after` within `container`, skipping trivia.
pub(crate) fn find_separator_comma_after(
    container: &SyntaxNode,
    after: &SyntaxNode,
) -> Option<SyntaxNode> {
    for child in container
        .children()
        .into_iter()
        .skip(after.child_index() + 1)
    {
        if child.is_comma() {
            return Some(child);
        }
        if !child.is_trivia() {
            return None;
        }
    }
    None
}

/// Whether the container's last significant child is followed by a comma.
pub(crate) fn uses_trailing_commas_in(container: &SyntaxNode) -> bool {
    match container.children_exclude_trivia_and_tokens().last() {
        Some(last) => find_separator_comma_after(container, last).is_some(),
        None => false,
    }
}

/// The nearest object or array enclosing `node` (including `node` itself).
pub(crate) fn enclosing_comma_container(node: &SyntaxNode) -> Option<SyntaxNode> {
    let mut current = Some(node.clone());
    while let Some(candidate) = current {
        if matches!(candidate.kind(), SyntaxKind::Object | SyntaxKind::Array) {
            return Some(candidate);
        }
        current = candidate.parent();
    }
    None
}

/// Indentation for children lines of `container`: reuse the indent of an
/// existing child that starts its own line, else one level deeper than the
/// container itself.
pub(crate) fn child_line_indent(container: &SyntaxNode, single_indent: &str) -> String {
    let children = container.children();
    for (index, child) in children.iter().enumerate() {
        if !child.kind().is_significant() {
            continue;
        }
        if index >= 1 && children[index - 1].is_newline() {
            return String::new();
        }
        if index >= 2 && children[index - 1].is_whitespace() && children[index - 2].is_newline() {
            return children[index - 1].leaf_text().unwrap_or_default();
        }
    }
    let base = indent_text_of(container).unwrap_or_default();
    format!("{base}{single_indent}")
}

/// Assemble the style used to synthesize a node placed where `node` is.
fn style_for_existing(node: &SyntaxNode) -> SynthStyle {
    let root = node.topmost();
    let container = node
        .parent()
        .and_then(|parent| enclosing_comma_container(&parent));
    let multiline = match &container {
        Some(container) => is_multiline(container),
        // Values directly under the root format multiline.
        None => true,
    };
    SynthStyle {
        newline: detect_newline_kind(&root).as_str(),
        line_indent: indent_text_of(node).unwrap_or_default(),
        single_indent: detect_single_indent(&root)
            .unwrap_or_else(|| DEFAULT_INDENT.to_string()),
        multiline,
    }
}

fn style_for_container_children(container: &SyntaxNode) -> SynthStyle {
    let root = container.topmost();
    let single_indent =
        detect_single_indent(&root).unwrap_or_else(|| DEFAULT_INDENT.to_string());
    SynthStyle {
        newline: detect_newline_kind(&root).as_str(),
        line_indent: child_line_indent(container, &single_indent),
        single_indent,
        multiline: is_multiline(container),
    }
}

// ============================================================================
// Value synthesis
// ============================================================================

fn leaf(kind: SyntaxKind, text: impl Into<String>) -> SyntaxNode {
    SyntaxNode::new_leaf(kind, text)
}

fn push_ws(nodes: &mut Vec<SyntaxNode>, text: &str) {
    if !text.is_empty() {
        nodes.push(leaf(SyntaxKind::Whitespace, text));
    }
}

/// Encode a host string as a double quoted JSON literal.
pub(crate) fn encode_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Build a fresh subtree for `input`, formatted per `style`.
///
/// Objects follow the insertion context: a multiline context produces one
/// property per line at one level deeper than `style.line_indent`. Arrays
/// and everything inside them synthesize on a single line.
pub(crate) fn synthesize_value(input: CstInputValue, style: &SynthStyle) -> SyntaxNode {
    match input {
        CstInputValue::Null => leaf(SyntaxKind::NullKeyword, "null"),
        CstInputValue::Bool(value) => {
            leaf(SyntaxKind::BooleanLit, if value { "true" } else { "false" })
        }
        CstInputValue::Number(text) => leaf(SyntaxKind::NumberLit, text),
        CstInputValue::String(text) => leaf(SyntaxKind::StringLit, encode_string(&text)),
        CstInputValue::Array(items) => {
            let array = SyntaxNode::new_container(SyntaxKind::Array);
            array.append_raw(leaf(SyntaxKind::OpenBracket, "["));
            let inline = SynthStyle {
                multiline: false,
                ..style.clone()
            };
            for (index, item) in items.into_iter().enumerate() {
                if index > 0 {
                    array.append_raw(leaf(SyntaxKind::Comma, ","));
                    array.append_raw(leaf(SyntaxKind::Whitespace, " "));
                }
                array.append_raw(synthesize_value(item, &inline));
            }
            array.append_raw(leaf(SyntaxKind::CloseBracket, "]"));
            array
        }
        CstInputValue::Object(props) => synthesize_object(props, style),
        CstInputValue::RawText(raw) => synthesize_raw(&raw.0),
    }
}

fn synthesize_object(props: Vec<(String, CstInputValue)>, style: &SynthStyle) -> SyntaxNode {
    let object = SyntaxNode::new_container(SyntaxKind::Object);
    object.append_raw(leaf(SyntaxKind::OpenBrace, "{"));
    if props.is_empty() {
        object.append_raw(leaf(SyntaxKind::CloseBrace, "}"));
        return object;
    }

    if style.multiline {
        let inner_indent = format!("{}{}", style.line_indent, style.single_indent);
        let deeper = SynthStyle {
            line_indent: inner_indent.clone(),
            ..style.clone()
        };
        let count = props.len();
        for (index, (key, value)) in props.into_iter().enumerate() {
            object.append_raw(leaf(SyntaxKind::Newline, style.newline));
            if !inner_indent.is_empty() {
                object.append_raw(leaf(SyntaxKind::Whitespace, inner_indent.clone()));
            }
            object.append_raw(synthesize_prop(&key, value, &deeper));
            if index + 1 < count {
                object.append_raw(leaf(SyntaxKind::Comma, ","));
            }
        }
        object.append_raw(leaf(SyntaxKind::Newline, style.newline));
        if !style.line_indent.is_empty() {
            object.append_raw(leaf(SyntaxKind::Whitespace, style.line_indent.clone()));
        }
    } else {
        let count = props.len();
        for (index, (key, value)) in props.into_iter().enumerate() {
            if index == 0 {
                object.append_raw(leaf(SyntaxKind::Whitespace, " "));
            } else {
                object.append_raw(leaf(SyntaxKind::Comma, ","));
                object.append_raw(leaf(SyntaxKind::Whitespace, " "));
            }
            object.append_raw(synthesize_prop(&key, value, style));
        }
        object.append_raw(leaf(SyntaxKind::Whitespace, " "));
    }
    object.append_raw(leaf(SyntaxKind::CloseBrace, "}"));
    object
}

pub(crate) fn synthesize_prop(key: &str, value: CstInputValue, style: &SynthStyle) -> SyntaxNode {
    let prop = SyntaxNode::new_container(SyntaxKind::ObjectProp);
    prop.append_raw(leaf(SyntaxKind::StringLit, encode_string(key)));
    prop.append_raw(leaf(SyntaxKind::Colon, ":"));
    prop.append_raw(leaf(SyntaxKind::Whitespace, " "));
    prop.append_raw(synthesize_value(value, style));
    prop
}

fn synthesize_raw(text: &str) -> SyntaxNode {
    let root = match parse_document(text, &ParseOptions::permissive()) {
        Ok(root) => root,
        Err(_) => unreachable!("raw input text is validated at construction"),
    };
    match root.children_exclude_trivia_and_tokens().into_iter().next() {
        Some(value) => {
            let index = value.child_index();
            root.remove_raw_range(index, index + 1);
            value
        }
        None => unreachable!("raw input text is validated to contain a value"),
    }
}

// ============================================================================
// Insert
// ============================================================================

/// What to insert into a container.
pub(crate) enum NewEntry {
    /// An array element or root value
    Element(CstInputValue),
    /// An object property
    Property(String, CstInputValue),
}

/// Insert a new significant child at `sig_index` (an index into the
/// container's significant children), applying the comma discipline and the
/// inferred formatting. Returns the inserted significant node.
pub(crate) fn insert_entry(
    container: &SyntaxNode,
    sig_index: usize,
    entry: NewEntry,
) -> Result<SyntaxNode, StateError> {
    container.ensure_attached()?;

    let significant = container.children_exclude_trivia_and_tokens();
    let count = significant.len();
    let sig_index = sig_index.min(count);
    let style = style_for_container_children(container);
    let node = match entry {
        NewEntry::Element(value) => synthesize_value(value, &style),
        NewEntry::Property(key, value) => synthesize_prop(&key, value, &style),
    };
    tracing::trace!(kind = ?node.kind(), index = sig_index, "inserting child");

    if sig_index == count {
        append_after_last(container, significant.last(), node.clone(), &style);
    } else {
        let target = &significant[sig_index];
        let at = target.child_index();
        let mut nodes = vec![node.clone(), leaf(SyntaxKind::Comma, ",")];
        if style.multiline {
            nodes.push(leaf(SyntaxKind::Newline, style.newline));
            push_ws(&mut nodes, &style.line_indent);
        } else {
            nodes.push(leaf(SyntaxKind::Whitespace, " "));
        }
        container.insert_raw(at, nodes);
    }

    Ok(node)
}

fn append_after_last(
    container: &SyntaxNode,
    last: Option<&SyntaxNode>,
    node: SyntaxNode,
    style: &SynthStyle,
) {
    let Some(last) = last else {
        append_into_empty(container, node, style);
        return;
    };

    let had_trailing_comma = uses_trailing_commas_in(container);

    // One separator between the previous last child and the new one.
    if find_separator_comma_after(container, last).is_none() {
        container.insert_raw(last.child_index() + 1, vec![leaf(SyntaxKind::Comma, ",")]);
    }
    let comma = find_separator_comma_after(container, last)
        .expect("separator comma was just ensured");

    if style.multiline {
        // Walk past the previous child's same-line trivia and its newline;
        // the new child starts the next line.
        let children = container.children();
        let mut position = comma.child_index() + 1;
        let mut consumed_newline = false;
        while position < children.len() {
            let child = &children[position];
            if child.is_whitespace() || child.is_comment() {
                position += 1;
            } else if child.is_newline() {
                position += 1;
                consumed_newline = true;
                break;
            } else {
                break;
            }
        }
        let mut nodes = Vec::new();
        if consumed_newline {
            push_ws(&mut nodes, &style.line_indent);
            nodes.push(node.clone());
            nodes.push(leaf(SyntaxKind::Newline, style.newline));
        } else {
            nodes.push(leaf(SyntaxKind::Newline, style.newline));
            push_ws(&mut nodes, &style.line_indent);
            nodes.push(node.clone());
        }
        container.insert_raw(position, nodes);
        if had_trailing_comma {
            container.insert_raw(node.child_index() + 1, vec![leaf(SyntaxKind::Comma, ",")]);
        }
    } else {
        container.insert_raw(
            comma.child_index() + 1,
            vec![leaf(SyntaxKind::Whitespace, " "), node],
        );
    }
}

fn append_into_empty(container: &SyntaxNode, node: SyntaxNode, style: &SynthStyle) {
    if container.kind() == SyntaxKind::Root {
        // Keep leading trivia (comments, blank lines) in front of the value.
        if container
            .children()
            .last()
            .is_some_and(|child| child.kind() == SyntaxKind::LineComment)
        {
            container.append_raw(leaf(SyntaxKind::Newline, style.newline));
        }
        container.append_raw(node);
        return;
    }

    if is_multiline(container) {
        let children = container.children();
        let after_last_newline = children
            .iter()
            .rposition(SyntaxNode::is_newline)
            .map(|index| index + 1)
            .unwrap_or(children.len().saturating_sub(1));
        let mut nodes = Vec::new();
        push_ws(&mut nodes, &style.line_indent);
        nodes.push(node);
        nodes.push(leaf(SyntaxKind::Newline, style.newline));
        container.insert_raw(after_last_newline, nodes);
    } else {
        // Drop leftover spacing between the brackets, then lay the child out.
        let mut index = 1;
        while index + 1 < container.children_len() {
            match container.child_at_index(index) {
                Some(child) if child.is_whitespace() => {
                    container.remove_raw_range(index, index + 1);
                }
                _ => index += 1,
            }
        }
        let close_index = container.children_len().saturating_sub(1);
        if container.kind() == SyntaxKind::Object {
            container.insert_raw(
                close_index,
                vec![
                    leaf(SyntaxKind::Whitespace, " "),
                    node,
                    leaf(SyntaxKind::Whitespace, " "),
                ],
            );
        } else {
            container.insert_raw(close_index, vec![node]);
        }
    }
}

// ============================================================================
// Remove
// ============================================================================

/// Remove a significant child from its container, together with its
/// separator comma and the same-line trivia that only existed around it.
/// Comments on earlier lines stay with the remaining siblings.
pub(crate) fn remove_from_parent(node: &SyntaxNode) -> Result<(), StateError> {
    node.ensure_attached()?;
    let parent = match node.parent() {
        Some(parent) => parent,
        None => return Err(StateError::CannotRemoveRoot),
    };
    tracing::trace!(kind = ?node.kind(), "removing child");

    let children = parent.children();
    let index = node.child_index();
    let mut start = index;
    let mut end = index + 1;

    // The node's own line indentation.
    let mut owns_line = false;
    if start > 0 {
        let prev = &children[start - 1];
        if prev.is_newline() {
            owns_line = true;
        } else if prev.is_whitespace() && start > 1 && children[start - 2].is_newline() {
            owns_line = true;
            start -= 1;
        }
    }

    // The separator comma plus same-line trivia; one newline when the node
    // occupied the whole line.
    let mut saw_comma = false;
    let mut position = end;
    while position < children.len() {
        let child = &children[position];
        if child.is_comma() && !saw_comma {
            saw_comma = true;
            position += 1;
        } else if child.is_whitespace() || child.is_comment() {
            position += 1;
        } else if child.is_newline() {
            if owns_line {
                position += 1;
            }
            break;
        } else {
            break;
        }
    }
    end = position;

    // No comma after: this was the last child, so the separator to keep out
    // of the text is the comma before it.
    let mut comma_before = None;
    if !saw_comma {
        let mut j = start;
        while j > 0 {
            let child = &children[j - 1];
            if child.is_comma() {
                comma_before = Some(j - 1);
                break;
            }
            if child.is_trivia() {
                j -= 1;
            } else {
                break;
            }
        }
    }

    parent.remove_raw_range(start, end);
    if let Some(comma_index) = comma_before {
        parent.remove_raw_range(comma_index, comma_index + 1);
        // Collapse the separator spacing the comma used to need.
        if parent
            .child_at_index(comma_index)
            .is_some_and(|child| child.is_whitespace())
        {
            parent.remove_raw_range(comma_index, comma_index + 1);
        }
    }

    Ok(())
}

// ============================================================================
// Replace
// ============================================================================

/// Swap `node` for a fresh subtree synthesized from `input`, leaving the
/// surrounding separators and trivia untouched. The old node detaches; the
/// new node inherits its child index.
pub(crate) fn replace_node_with(
    node: &SyntaxNode,
    input: CstInputValue,
) -> Result<SyntaxNode, StateError> {
    node.ensure_attached()?;
    let parent = match node.parent() {
        Some(parent) => parent,
        None => return Err(StateError::CannotRemoveRoot),
    };
    let style = style_for_existing(node);
    let replacement = synthesize_value(input, &style);
    tracing::trace!(old = ?node.kind(), new = ?replacement.kind(), "replacing node");
    parent.replace_raw(node.child_index(), replacement.clone());
    Ok(replacement)
}

/// Replace a whole property (name and value) with a new one.
pub(crate) fn replace_prop_with(
    prop: &SyntaxNode,
    key: &str,
    input: CstInputValue,
) -> Result<SyntaxNode, StateError> {
    prop.ensure_attached()?;
    let parent = match prop.parent() {
        Some(parent) => parent,
        None => return Err(StateError::CannotRemoveRoot),
    };
    let style = style_for_existing(prop);
    let replacement = synthesize_prop(key, input, &style);
    parent.replace_raw(prop.child_index(), replacement.clone());
    Ok(replacement)
}

/// Set the value of a property, inserting one when the property is
/// ill-formed and has none.
pub(crate) fn set_prop_value(prop: &SyntaxNode, input: CstInputValue) -> Result<(), StateError> {
    prop.ensure_attached()?;
    let significant = prop.children_exclude_trivia_and_tokens();
    match significant.get(1) {
        Some(existing) => {
            replace_node_with(existing, input)?;
        }
        None => {
            let style = style_for_existing(prop);
            let value = synthesize_value(input, &style);
            prop.append_raw(leaf(SyntaxKind::Whitespace, " "));
            prop.append_raw(value);
        }
    }
    Ok(())
}

/// Set the root value, replacing the existing one or appending after the
/// document's leading trivia.
pub(crate) fn root_set_value(root: &SyntaxNode, input: CstInputValue) {
    match root.children_exclude_trivia_and_tokens().first() {
        Some(existing) => {
            let style = style_for_existing(existing);
            let replacement = synthesize_value(input, &style);
            root.replace_raw(existing.child_index(), replacement);
        }
        None => {
            let style = SynthStyle {
                newline: detect_newline_kind(root).as_str(),
                line_indent: String::new(),
                single_indent: detect_single_indent(root)
                    .unwrap_or_else(|| DEFAULT_INDENT.to_string()),
                multiline: true,
            };
            let node = synthesize_value(input, &style);
            append_into_empty(root, node, &style);
        }
    }
}

/// Force-coerce `node` into a container of `kind` (`Object` or `Array`).
/// Already-matching nodes are returned as-is; anything else is replaced in
/// place by an empty container, detaching the old handle.
pub(crate) fn force_container(
    node: &SyntaxNode,
    kind: SyntaxKind,
) -> Result<SyntaxNode, StateError> {
    if node.kind() == kind {
        return Ok(node.clone());
    }
    let input = if kind == SyntaxKind::Object {
        CstInputValue::Object(Vec::new())
    } else {
        CstInputValue::Array(Vec::new())
    };
    replace_node_with(node, input)
}

// ============================================================================
// Trailing commas and multiline conversion
// ============================================================================

/// Add or remove the trailing comma of `container` and, when `recursive`,
/// of every container beneath it.
pub(crate) fn set_trailing_commas(
    container: &SyntaxNode,
    mode: TrailingCommaMode,
    recursive: bool,
) {
    if matches!(container.kind(), SyntaxKind::Object | SyntaxKind::Array) {
        apply_trailing_commas(container, mode);
    }
    if recursive {
        for child in container.children() {
            if child.is_container() {
                set_trailing_commas(&child, mode, true);
            }
        }
    }
}

fn apply_trailing_commas(container: &SyntaxNode, mode: TrailingCommaMode) {
    let significant = container.children_exclude_trivia_and_tokens();
    let Some(last) = significant.last() else {
        return;
    };
    let comma = find_separator_comma_after(container, last);
    match mode {
        TrailingCommaMode::IfMultiline => {
            if is_multiline(container) && comma.is_none() {
                container.insert_raw(last.child_index() + 1, vec![leaf(SyntaxKind::Comma, ",")]);
            }
        }
        TrailingCommaMode::Never => {
            if let Some(comma) = comma {
                let index = comma.child_index();
                container.remove_raw_range(index, index + 1);
            }
        }
    }
}

/// Convert a single-line container to one child per line. Multiline
/// containers are left untouched.
pub(crate) fn ensure_multiline(container: &SyntaxNode) -> Result<(), StateError> {
    container.ensure_attached()?;
    if is_multiline(container) {
        return Ok(());
    }
    let root = container.topmost();
    let newline = detect_newline_kind(&root).as_str();
    let single_indent =
        detect_single_indent(&root).unwrap_or_else(|| DEFAULT_INDENT.to_string());
    let close_indent = indent_text_of(container).unwrap_or_default();
    let child_indent = format!("{close_indent}{single_indent}");

    let total = container.children_len();
    if total < 2 {
        return Ok(());
    }
    let inner = container.remove_raw_range(1, total - 1);

    let mut rebuilt: Vec<SyntaxNode> = Vec::new();
    for child in inner {
        if child.is_whitespace() || child.is_newline() {
            continue;
        }
        if child.is_comma() {
            rebuilt.push(child);
        } else if child.kind().is_significant() {
            rebuilt.push(leaf(SyntaxKind::Newline, newline));
            push_ws(&mut rebuilt, &child_indent);
            rebuilt.push(child);
        } else {
            // Comments stay on the line of whatever precedes them.
            push_ws(&mut rebuilt, " ");
            rebuilt.push(child);
        }
    }
    rebuilt.push(leaf(SyntaxKind::Newline, newline));
    push_ws(&mut rebuilt, &close_indent);
    container.insert_raw(1, rebuilt);
    Ok(())
}
