//! Recursive keep/discard pruning of the working tree.
//!
//! The pruner walks the tree depth-first, strips presentational attributes,
//! records links and media through the classifier, and detaches every
//! element that does not earn a keep signal. A node is kept when one of
//! its children is kept or when its visible word count reaches
//! `word_count_threshold`; anchors with an href, images and media are kept
//! unless a domain rule removes them.

use std::collections::HashSet;

use tracing::warn;

use crate::error::{Error, Result};
use crate::options::ExtractionOptions;
use crate::patterns::{
    DATA_ATTR_PREFIX, IMPORTANT_ATTRS, NON_CONTENT_TAGS, ONLY_TEXT_ELIGIBLE_TAGS,
};
use crate::result::MediaKind;
use crate::tree::{NodeId, NodeKind, Tree};

use super::classify::{classify_anchor, classify_image, record_media, Verdict};
use super::state::{Inventory, PageContext};

/// What happened to a node during pruning.
#[derive(Debug)]
pub enum Outcome {
    /// The node survives and signals its parent to survive.
    Keep,
    /// The node was detached.
    Drop,
    /// Processing the node failed; it was detached and the walk went on.
    Failed(Error),
}

impl Outcome {
    /// Whether the parent receives a keep signal.
    #[must_use]
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// Depth-first pruner for one page.
pub struct Pruner<'a> {
    ctx: &'a PageContext,
    options: &'a ExtractionOptions,
    inventory: Inventory,
}

impl<'a> Pruner<'a> {
    #[must_use]
    pub fn new(ctx: &'a PageContext, options: &'a ExtractionOptions) -> Self {
        Self {
            ctx,
            options,
            inventory: Inventory::default(),
        }
    }

    /// Links and media recorded so far.
    #[must_use]
    pub fn into_inventory(self) -> Inventory {
        self.inventory
    }

    /// Prune the subtree under `root`.
    ///
    /// The root itself is never detached; when it earns no keep signal its
    /// content is cleared instead.
    pub fn prune(&mut self, tree: &mut Tree, root: NodeId) -> Outcome {
        let outcome = match self.process(tree, root, 0) {
            Ok(true) => Outcome::Keep,
            Ok(false) => Outcome::Drop,
            Err(err) => {
                warn!(error = %err, "extraction root failed to process");
                Outcome::Failed(err)
            }
        };

        if !outcome.is_keep() {
            tree.clear_children(root);
        }
        outcome
    }

    /// Process a child node. The caller detaches it unless it is kept.
    fn visit(&mut self, tree: &mut Tree, id: NodeId, depth: usize) -> Outcome {
        match self.process(tree, id, depth) {
            Ok(true) => Outcome::Keep,
            Ok(false) => Outcome::Drop,
            Err(err) => {
                warn!(node = id.index(), error = %err, "excluding node that failed to process");
                Outcome::Failed(err)
            }
        }
    }

    fn process(&mut self, tree: &mut Tree, id: NodeId, depth: usize) -> Result<bool> {
        let Some(tag) = tree.tag(id).map(str::to_string) else {
            return Ok(matches!(tree.kind(id), NodeKind::Text(text) if !text.trim().is_empty()));
        };

        if depth > self.options.max_tree_depth {
            return Err(Error::NodeFailure(format!(
                "<{tag}> nested deeper than {} levels",
                self.options.max_tree_depth
            )));
        }

        if NON_CONTENT_TAGS.contains(&tag.as_str()) {
            return Ok(false);
        }

        let mut keep = false;

        match tag.as_str() {
            "a" => {
                match classify_anchor(tree, id, self.ctx, self.options, &mut self.inventory) {
                    Some(Verdict::Remove) => return Ok(false),
                    Some(Verdict::Keep) => keep = true,
                    None => {}
                }
            }
            "img" => {
                return Ok(classify_image(tree, id, self.ctx, self.options) == Verdict::Keep);
            }
            "video" => {
                record_media(tree, id, MediaKind::Video, self.options, &mut self.inventory);
                return Ok(true);
            }
            "audio" => {
                record_media(tree, id, MediaKind::Audio, self.options, &mut self.inventory);
                return Ok(true);
            }
            _ => {}
        }

        self.strip_attributes(tree, id);

        if self.options.only_text && ONLY_TEXT_ELIGIBLE_TAGS.contains(&tag.as_str()) {
            let text = tree.text_content(id);
            tree.convert_to_text(id, &text);
            return Ok(!text.trim().is_empty());
        }

        let mut dropped = HashSet::new();
        for child in tree.children(id).to_vec() {
            match tree.kind(child) {
                NodeKind::Comment => {
                    dropped.insert(child);
                }
                NodeKind::Element { .. } => {
                    if self.visit(tree, child, depth + 1).is_keep() {
                        keep = true;
                    } else {
                        dropped.insert(child);
                    }
                }
                NodeKind::Text(_) | NodeKind::Document => {}
            }
        }
        tree.detach_children(id, &dropped);

        // Direct text only counts once it reaches the word floor.
        if !keep {
            keep = tree.word_count(id) >= self.options.word_count_threshold;
        }

        Ok(keep)
    }

    fn strip_attributes(&self, tree: &mut Tree, id: NodeId) {
        let keep_data = self.options.keep_data_attributes;
        tree.retain_attrs(id, |name| {
            IMPORTANT_ATTRS.contains(&name) || (keep_data && name.starts_with(DATA_ATTR_PREFIX))
        });
    }
}

/// Detach the given nodes (excluded-tag pre-pass).
pub fn remove_nodes(tree: &mut Tree, ids: &[NodeId]) {
    for &id in ids {
        tree.detach(id);
    }
}

/// Move the selected nodes under a fresh `<div>` that becomes the extraction root.
///
/// Only nodes still inside `body` are taken, so anything removed by the
/// excluded-tag pre-pass stays gone. Returns `None` when nothing qualifies.
pub fn narrow_scope(tree: &mut Tree, body: NodeId, matched: &[NodeId]) -> Option<NodeId> {
    let selected: Vec<NodeId> = matched
        .iter()
        .copied()
        .filter(|&id| tree.is_ancestor(body, id))
        .collect();
    if selected.is_empty() {
        return None;
    }

    let wrapper = tree.create_element("div", Vec::new());
    for id in selected {
        tree.append(wrapper, id);
    }
    Some(wrapper)
}
