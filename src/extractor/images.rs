//! Image validity filtering and usefulness scoring.
//!
//! Scoring runs after pruning over every `<img>` left in the tree. Each
//! image is first captured into an owned [`ImageSnapshot`] on the calling
//! thread; the snapshots are then scored in parallel on the rayon pool.
//! A scoring job reads only its snapshot and the page URL and writes only
//! its own result slot, and the indexed collect keeps DOM order.

use rayon::prelude::*;
use tracing::debug;

use crate::dimension::parse_dimension;
use crate::patterns::{
    CONTENT_IMAGE_FORMATS, DECORATIVE_MARKERS, IMAGE_FILE_SIZE_MIN, IMAGE_SCORE_THRESHOLD,
    INTERACTIVE_PARENT_TAGS,
};
use crate::result::{ImageCandidate, MediaKind};
use crate::tree::{NodeId, Tree};

use super::classify::closest_description;

/// The parent element of an image as seen by the validity filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentSnapshot {
    pub tag: Option<String>,
    /// Class tokens as written in the source page.
    pub classes: Vec<String>,
}

/// Owned copy of everything the filter and scorer need from one `<img>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSnapshot {
    pub src: String,
    pub data_src: String,
    pub alt: Option<String>,
    pub style: String,
    pub width: Option<String>,
    pub height: Option<String>,
    pub parent: ParentSnapshot,
    pub description: Option<String>,
}

impl ImageSnapshot {
    /// Capture an image from the working tree.
    ///
    /// `parent_classes` come from the unpruned page: the pruner strips
    /// `class` before images are scored.
    #[must_use]
    pub fn capture(
        tree: &Tree,
        id: NodeId,
        parent_classes: Vec<String>,
        min_description_words: usize,
    ) -> Self {
        let attr = |name: &str| tree.attr(id, name).map(str::to_string);

        Self {
            src: attr("src").unwrap_or_default(),
            data_src: attr("data-src").unwrap_or_default(),
            alt: attr("alt"),
            style: attr("style").unwrap_or_default(),
            width: attr("width"),
            height: attr("height"),
            parent: ParentSnapshot {
                tag: tree.parent(id).and_then(|p| tree.tag(p)).map(str::to_string),
                classes: parent_classes,
            },
            description: closest_description(tree, id, min_description_words),
        }
    }
}

/// Reject decorative and non-content images.
///
/// An image is invalid when it is hidden by inline style, has no `src`,
/// carries a decorative marker (`button`, `icon`, `logo`) in its src, alt
/// or any parent class, or sits directly inside a `button`/`input`.
#[must_use]
pub fn is_valid_image(image: &ImageSnapshot, parent: &ParentSnapshot) -> bool {
    let style: String = image
        .style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    if style.contains("display:none") {
        return false;
    }

    if image.src.trim().is_empty() {
        return false;
    }

    let decorative = std::iter::once(image.src.as_str())
        .chain(image.alt.as_deref())
        .chain(parent.classes.iter().map(String::as_str))
        .map(str::to_ascii_lowercase)
        .any(|value| DECORATIVE_MARKERS.iter().any(|marker| value.contains(marker)));
    if decorative {
        return false;
    }

    !parent
        .tag
        .as_deref()
        .is_some_and(|tag| INTERACTIVE_PARENT_TAGS.contains(&tag))
}

/// Lowercase file extension of an image URL, query and fragment stripped.
#[must_use]
pub fn image_format(src: &str) -> String {
    let path = src.split(['?', '#']).next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();
    file.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Size of the image file in bytes.
///
/// Always 0: the engine performs no network I/O, so the lookup is a fixed
/// no-op and never contributes to the score.
#[must_use]
pub fn image_file_size(_src: &str, _page_url: &str) -> u64 {
    0
}

/// Additive usefulness score of one image.
///
/// One point each for: prominent height, prominent width, file size over
/// 10 kB, non-empty alt, a photographic/web extension, and a position in
/// the first half of the page's images.
#[must_use]
pub fn score_image(image: &ImageSnapshot, page_url: &str, index: usize, total: usize) -> u32 {
    let mut score = 0;

    let prominent = |raw: Option<&str>| {
        raw.and_then(parse_dimension)
            .is_some_and(|d| d.is_prominent())
    };
    if prominent(image.height.as_deref()) {
        score += 1;
    }
    if prominent(image.width.as_deref()) {
        score += 1;
    }

    if image_file_size(&image.src, page_url) > IMAGE_FILE_SIZE_MIN {
        score += 1;
    }

    if image.alt.as_deref().is_some_and(|alt| !alt.is_empty()) {
        score += 1;
    }

    if CONTENT_IMAGE_FORMATS.contains(&image_format(&image.src).as_str()) {
        score += 1;
    }

    if total > 0 && (index as f64) / (total as f64) < 0.5 {
        score += 1;
    }

    score
}

/// Filter and score one image, producing a candidate when it qualifies.
#[must_use]
pub fn evaluate_image(
    image: &ImageSnapshot,
    page_url: &str,
    index: usize,
    total: usize,
) -> Option<ImageCandidate> {
    if !is_valid_image(image, &image.parent) {
        return None;
    }

    let score = score_image(image, page_url, index, total);
    if score <= IMAGE_SCORE_THRESHOLD {
        return None;
    }

    Some(ImageCandidate {
        src: image.src.clone(),
        data_src: image.data_src.clone(),
        alt: image.alt.clone().unwrap_or_default(),
        description: image.description.clone(),
        score,
        kind: MediaKind::Image,
    })
}

/// Score every image of a page in parallel, keeping DOM order.
#[must_use]
pub fn score_images(images: &[ImageSnapshot], page_url: &str) -> Vec<ImageCandidate> {
    let total = images.len();

    let slots: Vec<Option<ImageCandidate>> = images
        .par_iter()
        .enumerate()
        .map(|(index, image)| evaluate_image(image, page_url, index, total))
        .collect();

    let kept: Vec<ImageCandidate> = slots.into_iter().flatten().collect();
    debug!(total, kept = kept.len(), "scored images");
    kept
}
