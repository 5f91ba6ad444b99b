//! Tree canonicalization: collapse redundant same-tag wrappers.

use crate::tree::{NodeId, Tree};

/// Flatten the subtree rooted at `id`, returning the node now standing in its place.
///
/// A node whose only child (text nodes included) is an element with the
/// same tag is replaced by that child, repeatedly, and the children of the
/// survivor are flattened in turn. The surviving node keeps its own
/// attributes; the collapsed wrappers' attributes are lost. Flattening a
/// flat tree changes nothing.
pub fn flatten(tree: &mut Tree, id: NodeId) -> NodeId {
    let Some(tag) = tree.tag(id).map(str::to_string) else {
        return id;
    };

    let mut survivor = id;
    while let Some(child) = same_tag_only_child(tree, survivor, &tag) {
        survivor = child;
    }
    if survivor != id {
        tree.replace(id, survivor);
    }

    for child in tree.children(survivor).to_vec() {
        flatten(tree, child);
    }

    survivor
}

fn same_tag_only_child(tree: &Tree, id: NodeId, tag: &str) -> Option<NodeId> {
    match tree.children(id) {
        [only] if tree.tag(*only) == Some(tag) => Some(*only),
        _ => None,
    }
}
