//! The CST node graph
//!
//! Container nodes own their children through [`Rc`] handles; every child
//! carries a [`Weak`] back reference to its parent plus a cached child index
//! that is renumbered on every structural change. Node identity is pointer
//! identity, so two handles to the same logical node compare equal and both
//! observe mutations.
//!
//! All structural mutation goes through the `pub(crate)` primitives at the
//! bottom of this file; the public mutation API lives in the edit module and
//! is responsible for commas, trivia, and formatting.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use crate::cst::SyntaxKind;
use crate::error::StateError;

pub(crate) struct NodeData {
    kind: SyntaxKind,
    /// Exact source bytes for leaves; empty for containers
    text: String,
    /// Ordered children (significant, structural, and trivia interleaved in
    /// source order); empty for leaves
    children: Vec<SyntaxNode>,
    parent: Option<Weak<RefCell<NodeData>>>,
    child_index: usize,
}

/// A shared handle to one node of the concrete syntax tree.
///
/// Handles are cheap to clone and compare by identity. A handle stays valid
/// until its node is removed or an ancestor is removed or replaced, after
/// which operations that need the tree fail with [`StateError`].
#[derive(Clone)]
pub struct SyntaxNode(pub(crate) Rc<RefCell<NodeData>>);

impl SyntaxNode {
    pub(crate) fn new_leaf(kind: SyntaxKind, text: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            kind,
            text: text.into(),
            children: Vec::new(),
            parent: None,
            child_index: 0,
        })))
    }

    pub(crate) fn new_container(kind: SyntaxKind) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            kind,
            text: String::new(),
            children: Vec::new(),
            parent: None,
            child_index: 0,
        })))
    }

    pub fn kind(&self) -> SyntaxKind {
        self.0.borrow().kind
    }

    /// The exact source text of a leaf. Containers return `None`; their text
    /// is the concatenation of their descendants, available via `to_string`.
    pub fn leaf_text(&self) -> Option<String> {
        let data = self.0.borrow();
        if data.kind.is_container() {
            None
        } else {
            Some(data.text.clone())
        }
    }

    pub(crate) fn set_leaf_text(&self, text: impl Into<String>) {
        self.0.borrow_mut().text = text.into();
    }

    // ==================
    // Navigation
    // ==================

    pub fn parent(&self) -> Option<SyntaxNode> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(SyntaxNode)
    }

    /// Zero-based position among the parent's children. Stable while the
    /// node remains in its parent.
    pub fn child_index(&self) -> usize {
        self.0.borrow().child_index
    }

    /// All ancestors, nearest first.
    pub fn ancestors(&self) -> Vec<SyntaxNode> {
        let mut result = Vec::new();
        let mut current = self.parent();
        while let Some(node) = current {
            current = node.parent();
            result.push(node);
        }
        result
    }

    /// The topmost node reachable from this one. For an attached node this
    /// is the document root; for a detached node it is the detached subtree
    /// top.
    pub(crate) fn topmost(&self) -> SyntaxNode {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// All children, including whitespace, comments, and punctuation.
    pub fn children(&self) -> Vec<SyntaxNode> {
        self.0.borrow().children.clone()
    }

    pub fn child_at_index(&self, index: usize) -> Option<SyntaxNode> {
        self.0.borrow().children.get(index).cloned()
    }

    pub fn children_len(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Children excluding trivia and structural punctuation.
    pub fn children_exclude_trivia_and_tokens(&self) -> Vec<SyntaxNode> {
        self.0
            .borrow()
            .children
            .iter()
            .filter(|child| child.kind().is_significant())
            .cloned()
            .collect()
    }

    pub fn previous_sibling(&self) -> Option<SyntaxNode> {
        let parent = self.parent()?;
        let index = self.child_index();
        if index == 0 {
            None
        } else {
            parent.child_at_index(index - 1)
        }
    }

    pub fn next_sibling(&self) -> Option<SyntaxNode> {
        let parent = self.parent()?;
        parent.child_at_index(self.child_index() + 1)
    }

    /// All siblings before this node, nearest first.
    pub fn previous_siblings(&self) -> Vec<SyntaxNode> {
        match self.parent() {
            Some(parent) => {
                let mut siblings = parent.children();
                siblings.truncate(self.child_index());
                siblings.reverse();
                siblings
            }
            None => Vec::new(),
        }
    }

    /// All siblings after this node, in source order.
    pub fn next_siblings(&self) -> Vec<SyntaxNode> {
        match self.parent() {
            Some(parent) => parent
                .children()
                .into_iter()
                .skip(self.child_index() + 1)
                .collect(),
            None => Vec::new(),
        }
    }

    // ==================
    // Kind tests
    // ==================

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_container()
    }

    pub fn is_trivia(&self) -> bool {
        self.kind().is_trivia()
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind() == SyntaxKind::Whitespace
    }

    pub fn is_newline(&self) -> bool {
        self.kind() == SyntaxKind::Newline
    }

    pub fn is_comment(&self) -> bool {
        self.kind().is_comment()
    }

    pub fn is_token(&self) -> bool {
        self.kind().is_token()
    }

    pub fn is_comma(&self) -> bool {
        self.kind() == SyntaxKind::Comma
    }

    /// The character of a single-character punctuation token.
    pub fn token_char(&self) -> Option<char> {
        self.kind().token_char()
    }

    // ==================
    // Attachment
    // ==================

    /// Whether this node is still part of a document (reachable from a root).
    pub fn is_attached(&self) -> bool {
        self.topmost().kind() == SyntaxKind::Root
    }

    pub(crate) fn ensure_attached(&self) -> Result<(), StateError> {
        if self.is_attached() {
            Ok(())
        } else {
            Err(StateError::Detached)
        }
    }

    // ==================
    // Structural primitives
    // ==================

    /// Append a child, used by the parser while building the tree.
    pub(crate) fn append_raw(&self, child: SyntaxNode) {
        let mut data = self.0.borrow_mut();
        let index = data.children.len();
        {
            let mut child_data = child.0.borrow_mut();
            child_data.parent = Some(Rc::downgrade(&self.0));
            child_data.child_index = index;
        }
        data.children.push(child);
    }

    /// Splice `nodes` into the child list at `index`, reparenting them and
    /// renumbering every following child.
    pub(crate) fn insert_raw(&self, index: usize, nodes: Vec<SyntaxNode>) {
        if nodes.is_empty() {
            return;
        }
        let mut data = self.0.borrow_mut();
        let index = index.min(data.children.len());
        data.children.splice(index..index, nodes);
        for (position, child) in data.children.iter().enumerate().skip(index) {
            let mut child_data = child.0.borrow_mut();
            child_data.parent = Some(Rc::downgrade(&self.0));
            child_data.child_index = position;
        }
    }

    /// Remove the children in `start..end`, detaching them (their parent
    /// link is cleared) and renumbering the remainder.
    pub(crate) fn remove_raw_range(&self, start: usize, end: usize) -> Vec<SyntaxNode> {
        let mut data = self.0.borrow_mut();
        let end = end.min(data.children.len());
        if start >= end {
            return Vec::new();
        }
        let removed: Vec<SyntaxNode> = data.children.drain(start..end).collect();
        for node in &removed {
            let mut node_data = node.0.borrow_mut();
            node_data.parent = None;
            node_data.child_index = 0;
        }
        for (position, child) in data.children.iter().enumerate().skip(start) {
            child.0.borrow_mut().child_index = position;
        }
        removed
    }

    /// Swap the child at `index` for `replacement`, which inherits the child
    /// index and the parent link. Returns the detached old child.
    pub(crate) fn replace_raw(&self, index: usize, replacement: SyntaxNode) -> SyntaxNode {
        let mut data = self.0.borrow_mut();
        {
            let mut new_data = replacement.0.borrow_mut();
            new_data.parent = Some(Rc::downgrade(&self.0));
            new_data.child_index = index;
        }
        let old = std::mem::replace(&mut data.children[index], replacement);
        {
            let mut old_data = old.0.borrow_mut();
            old_data.parent = None;
            old_data.child_index = 0;
        }
        old
    }

    /// Detach and return every child.
    pub(crate) fn clear_raw(&self) -> Vec<SyntaxNode> {
        let end = self.children_len();
        self.remove_raw_range(0, end)
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SyntaxNode {}

impl Hash for SyntaxNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        if data.kind.is_container() {
            write!(f, "SyntaxNode({:?}, {} children)", data.kind, data.children.len())
        } else {
            write!(f, "SyntaxNode({:?}, {:?})", data.kind, data.text)
        }
    }
}

/// The serializer: concatenates the text of every leaf in depth-first order.
/// Untouched subtrees reproduce their original bytes exactly.
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        if data.kind.is_container() {
            for child in &data.children {
                write!(f, "{child}")?;
            }
            Ok(())
        } else {
            f.write_str(&data.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: SyntaxKind, text: &str) -> SyntaxNode {
        SyntaxNode::new_leaf(kind, text)
    }

    #[test]
    fn test_parent_and_child_index() {
        let array = SyntaxNode::new_container(SyntaxKind::Array);
        let open = leaf(SyntaxKind::OpenBracket, "[");
        let one = leaf(SyntaxKind::NumberLit, "1");
        let close = leaf(SyntaxKind::CloseBracket, "]");
        array.append_raw(open.clone());
        array.append_raw(one.clone());
        array.append_raw(close.clone());

        assert_eq!(one.child_index(), 1);
        assert_eq!(one.parent().unwrap(), array);
        assert_eq!(array.to_string(), "[1]");
    }

    #[test]
    fn test_insert_renumbers_following_children() {
        let array = SyntaxNode::new_container(SyntaxKind::Array);
        array.append_raw(leaf(SyntaxKind::OpenBracket, "["));
        let one = leaf(SyntaxKind::NumberLit, "1");
        array.append_raw(one.clone());
        array.append_raw(leaf(SyntaxKind::CloseBracket, "]"));

        array.insert_raw(1, vec![leaf(SyntaxKind::NumberLit, "0"), leaf(SyntaxKind::Comma, ",")]);
        assert_eq!(array.to_string(), "[0,1]");
        assert_eq!(one.child_index(), 3);

        for (index, child) in array.children().into_iter().enumerate() {
            assert_eq!(child.child_index(), index);
            assert_eq!(child.parent().unwrap(), array);
        }
    }

    #[test]
    fn test_remove_detaches() {
        let array = SyntaxNode::new_container(SyntaxKind::Array);
        array.append_raw(leaf(SyntaxKind::OpenBracket, "["));
        let one = leaf(SyntaxKind::NumberLit, "1");
        array.append_raw(one.clone());
        array.append_raw(leaf(SyntaxKind::CloseBracket, "]"));

        let removed = array.remove_raw_range(1, 2);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0], one);
        assert!(one.parent().is_none());
        assert_eq!(array.to_string(), "[]");
    }

    #[test]
    fn test_replace_preserves_index() {
        let array = SyntaxNode::new_container(SyntaxKind::Array);
        array.append_raw(leaf(SyntaxKind::OpenBracket, "["));
        let one = leaf(SyntaxKind::NumberLit, "1");
        array.append_raw(one.clone());
        array.append_raw(leaf(SyntaxKind::CloseBracket, "]"));

        let two = leaf(SyntaxKind::NumberLit, "2");
        let old = array.replace_raw(1, two.clone());
        assert_eq!(old, one);
        assert!(one.parent().is_none());
        assert_eq!(two.child_index(), 1);
        assert_eq!(array.to_string(), "[2]");
    }

    #[test]
    fn test_identity_equality() {
        let a = leaf(SyntaxKind::NumberLit, "1");
        let b = a.clone();
        let c = leaf(SyntaxKind::NumberLit, "1");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
