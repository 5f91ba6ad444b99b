//! Link and media classification.
//!
//! Anchors, images, videos and audio elements are inspected as the pruner
//! reaches them. Anchors and media sources are recorded in the page
//! inventory; the returned [`Verdict`] tells the pruner whether the node
//! survives the domain-based exclusion rules.

use tracing::debug;

use crate::options::ExtractionOptions;
use crate::result::{LinkEntry, MediaEntry, MediaKind};
use crate::tree::{NodeId, Tree};

use super::state::{Inventory, PageContext};

/// Outcome of a domain-based inclusion check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Remove,
}

/// Record an anchor's link and decide whether it stays.
///
/// Returns `None` when the anchor has no usable `href`; such anchors are
/// treated like any other element.
pub fn classify_anchor(
    tree: &Tree,
    id: NodeId,
    ctx: &PageContext,
    options: &ExtractionOptions,
    inventory: &mut Inventory,
) -> Option<Verdict> {
    let href = tree.attr(id, "href").filter(|h| !h.trim().is_empty())?;

    let kind = ctx.link_kind(href);
    inventory.links.push(
        kind,
        LinkEntry {
            href: href.to_string(),
            text: tree.text_content(id).trim().to_string(),
        },
    );

    if options.exclude_external_links {
        if ctx.is_off_host(href) {
            debug!(href, "removing external link");
            return Some(Verdict::Remove);
        }
    } else if options.exclude_social_media_links && ctx.is_social(href) {
        debug!(href, "removing social media link");
        return Some(Verdict::Remove);
    }

    Some(Verdict::Keep)
}

/// Decide whether an image survives the domain exclusion rules.
///
/// Images are not recorded here; scoring runs on the pruned tree.
#[must_use]
pub fn classify_image(
    tree: &Tree,
    id: NodeId,
    ctx: &PageContext,
    options: &ExtractionOptions,
) -> Verdict {
    let src = tree.attr(id, "src").unwrap_or_default();

    if options.exclude_external_images {
        if ctx.is_off_host(src) {
            debug!(src, "removing external image");
            return Verdict::Remove;
        }
    } else if options.exclude_social_media_links && ctx.is_social(src) {
        debug!(src, "removing social media image");
        return Verdict::Remove;
    }

    Verdict::Keep
}

/// Record a video or audio element and every nested `source`.
///
/// Each entry carries the alt of the media element itself and the nearest
/// ancestor text describing it.
pub fn record_media(
    tree: &Tree,
    id: NodeId,
    kind: MediaKind,
    options: &ExtractionOptions,
    inventory: &mut Inventory,
) {
    let alt = tree.attr(id, "alt").map(str::to_string);
    let description = closest_description(tree, id, options.image_description_min_word_threshold);

    inventory.media.push(MediaEntry {
        src: tree.attr(id, "src").map(str::to_string),
        alt: alt.clone(),
        kind,
        description: description.clone(),
    });

    for source in tree.find_all(id, "source") {
        inventory.media.push(MediaEntry {
            src: tree.attr(source, "src").map(str::to_string),
            alt: alt.clone(),
            kind,
            description: description.clone(),
        });
    }
}

/// Visible text of the nearest ancestor with at least `min_words` words.
///
/// The walk stops at the first qualifying ancestor or at the tree root.
#[must_use]
pub fn closest_description(tree: &Tree, id: NodeId, min_words: usize) -> Option<String> {
    let mut current = tree.parent(id);
    while let Some(ancestor) = current {
        let text = tree.visible_text(ancestor);
        if text.split_whitespace().count() >= min_words {
            return Some(text);
        }
        current = tree.parent(ancestor);
    }
    None
}
