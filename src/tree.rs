//! Arena-backed working tree.
//!
//! The parsed `dom_query` document is copied into a flat arena where every
//! node is addressed by a [`NodeId`] index and keeps explicit parent and
//! children lists. Pruning and flattening edit this private copy in place:
//! removing a node unlinks it from its parent, the slot itself stays in the
//! arena and is simply unreachable from the root.

use std::collections::{HashMap, HashSet};

use dom_query::Document;

use crate::error::{Error, Result};
use crate::patterns::VOID_ELEMENTS;

/// Index of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Payload of an arena node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root.
    Document,
    /// Element with lowercase tag name and attributes in source order.
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    /// Raw text.
    Text(String),
    /// Comment; its content is never needed.
    Comment,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable document tree addressed by index.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only a document root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Copy a parsed document into a fresh arena.
    ///
    /// Returns the tree together with a map from `dom_query` node ids to
    /// arena ids, so selector matches computed on the document can be
    /// resolved against the copy. Doctypes and processing instructions are
    /// not copied.
    #[must_use]
    pub fn from_document(doc: &Document) -> (Self, HashMap<dom_query::NodeId, NodeId>) {
        let mut tree = Self::new();
        let mut index = HashMap::new();

        let root = doc.root();
        index.insert(root.id, tree.root());

        // Explicit stack: html5ever happily produces trees deeper than the
        // default thread stack would allow us to recurse through.
        let mut stack = vec![(root, tree.root())];
        while let Some((node, parent)) = stack.pop() {
            for child in node.children() {
                let id = if child.is_element() {
                    let name = child
                        .node_name()
                        .map(|n| n.to_string())
                        .unwrap_or_default();
                    let attrs = child
                        .attrs()
                        .iter()
                        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                        .collect();
                    tree.create_element(&name, attrs)
                } else if child.is_text() {
                    tree.create_text(&child.text())
                } else if child.is_comment() {
                    tree.create_comment()
                } else {
                    continue;
                };

                tree.append(parent, id);
                index.insert(child.id, id);
                stack.push((child, id));
            }
        }

        (tree, index)
    }

    /// The document root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // === Construction ===

    /// Create a detached element.
    pub fn create_element(&mut self, name: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.push(NodeKind::Element {
            name: name.to_ascii_lowercase(),
            attrs,
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self) -> NodeId {
        self.push(NodeKind::Comment)
    }

    // === Structure ===

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Unlink a node from its parent. Its own subtree is left intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            let children = &mut self.node_mut(parent).children;
            if let Some(pos) = children.iter().position(|&c| c == id) {
                children.remove(pos);
            }
        }
    }

    /// Unlink a set of children of `parent` in a single pass over its child list.
    pub fn detach_children(&mut self, parent: NodeId, ids: &HashSet<NodeId>) {
        if ids.is_empty() {
            return;
        }
        self.node_mut(parent).children.retain(|c| !ids.contains(c));
        for &id in ids {
            if self.node(id).parent == Some(parent) {
                self.node_mut(id).parent = None;
            }
        }
    }

    /// Turn a node into a text node in place, keeping its position.
    ///
    /// Former children are unlinked.
    pub fn convert_to_text(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        self.node_mut(id).kind = NodeKind::Text(text.to_string());
    }

    /// Put `new` at the position `old` occupies, detaching `old`.
    ///
    /// `new` is first detached from wherever it lives, which makes this safe
    /// for replacing a node by one of its own descendants.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if old == new {
            return;
        }
        self.detach(new);
        let Some(parent) = self.node(old).parent else {
            return;
        };
        if let Some(pos) = self.node(parent).children.iter().position(|&c| c == old) {
            self.node_mut(parent).children[pos] = new;
            self.node_mut(new).parent = Some(parent);
            self.node_mut(old).parent = None;
        }
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    // === Inspection ===

    /// Payload of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Parent of a node, `None` for the root or detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Direct children in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Tag name for elements.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Attribute value for elements.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Set (or add) an attribute on an element. No-op for other nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(id).kind {
            if let Some(slot) = attrs.iter_mut().find(|(k, _)| k == name) {
                slot.1 = value.to_string();
            } else {
                attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// Keep only the attributes whose name satisfies `keep`.
    pub fn retain_attrs<F>(&mut self, id: NodeId, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(id).kind {
            attrs.retain(|(name, _)| keep(name));
        }
    }

    /// All descendants of `id` in document order, `id` excluded.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Descendant elements with the given tag, in document order.
    #[must_use]
    pub fn find_all(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.tag(n) == Some(tag))
            .collect()
    }

    /// First descendant element with the given tag.
    #[must_use]
    pub fn find_first(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|&n| self.tag(n) == Some(tag))
    }

    /// Whether `ancestor` is a proper ancestor of `id`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    // === Text ===

    fn text_pieces(&self, id: NodeId) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(move |n| match &self.node(n).kind {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
    }

    /// Concatenated raw text of the node and its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.text_pieces(id).collect()
    }

    /// Visible text: every text piece trimmed, empty pieces dropped, joined by a space.
    #[must_use]
    pub fn visible_text(&self, id: NodeId) -> String {
        self.text_pieces(id)
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of whitespace-separated words in the visible text.
    #[must_use]
    pub fn word_count(&self, id: NodeId) -> usize {
        self.text_pieces(id)
            .map(|piece| piece.split_whitespace().count())
            .sum()
    }

    // === Serialization ===

    /// Serialize the subtree rooted at `id` to markup.
    ///
    /// Fails when an element sits more than `max_depth` levels below `id`
    /// or when a child link does not point back at its parent. Text and
    /// comments do not count as a level.
    pub fn serialize(&self, id: NodeId, max_depth: usize) -> Result<String> {
        let mut out = String::new();
        self.write_node(id, 0, max_depth, false, &mut out)?;
        Ok(out)
    }

    fn write_node(
        &self,
        id: NodeId,
        depth: usize,
        max_depth: usize,
        raw_text: bool,
        out: &mut String,
    ) -> Result<()> {
        match &self.node(id).kind {
            NodeKind::Document => self.write_children(id, depth, max_depth, false, out),
            NodeKind::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
                Ok(())
            }
            NodeKind::Comment => Ok(()),
            NodeKind::Element { name, attrs } => {
                // Element depth only, the same measure the pruner applies.
                if depth > max_depth {
                    return Err(Error::Serialize(format!(
                        "<{name}> nested deeper than {max_depth} levels"
                    )));
                }

                out.push('<');
                out.push_str(name);
                for (key, value) in attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return Ok(());
                }

                let raw = matches!(name.as_str(), "script" | "style");
                self.write_children(id, depth, max_depth, raw, out)?;

                out.push_str("</");
                out.push_str(name);
                out.push('>');
                Ok(())
            }
        }
    }

    fn write_children(
        &self,
        id: NodeId,
        depth: usize,
        max_depth: usize,
        raw_text: bool,
        out: &mut String,
    ) -> Result<()> {
        for &child in self.children(id) {
            if self.parent(child) != Some(id) {
                return Err(Error::Serialize(format!(
                    "node {} is listed under {} but linked elsewhere",
                    child.0, id.0
                )));
            }
            self.write_node(child, depth + 1, max_depth, raw_text, out)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn corrupt_parent_link(&mut self, id: NodeId) {
        self.node_mut(id).parent = None;
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
