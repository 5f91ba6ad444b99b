//! Configuration options for content extraction.
//!
//! `ExtractionOptions` is a fixed structure with named fields and explicit
//! defaults. It derives `serde` so ingestion pipelines can load it from
//! JSON; missing fields take their default.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::patterns::SOCIAL_MEDIA_DOMAINS;

/// Pass-through options for the markdown renderer.
///
/// The engine never interprets these; the renderer decides which keys it
/// understands.
pub type RendererOptions = BTreeMap<String, serde_json::Value>;

/// Configuration options for content extraction.
///
/// # Example
///
/// ```rust
/// use rs_pagesift::ExtractionOptions;
///
/// let options = ExtractionOptions {
///     word_count_threshold: 5,
///     exclude_external_links: true,
///     ..ExtractionOptions::default()
/// };
/// assert!(options.css_selector.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractionOptions {
    /// Minimum visible word count for an element with no kept children.
    ///
    /// Default: `1`
    pub word_count_threshold: usize,

    /// Restrict extraction to the elements matched by this selector.
    ///
    /// Default: `None`
    pub css_selector: Option<String>,

    /// Tag names (or selectors) removed before pruning starts.
    ///
    /// Default: empty
    pub excluded_tags: BTreeSet<String>,

    /// Minimum word count for an ancestor's text to describe an image or media node.
    ///
    /// Default: `1`
    pub image_description_min_word_threshold: usize,

    /// Drop anchors whose host differs from the page host.
    ///
    /// Excluded links are still recorded in the link inventory.
    ///
    /// Default: `false`
    pub exclude_external_links: bool,

    /// Drop anchors and images pointing at social-media domains.
    ///
    /// Default: `false`
    pub exclude_social_media_links: bool,

    /// Extra social-media domains, unioned with the built-in list.
    ///
    /// Default: empty
    pub social_media_domains: Vec<String>,

    /// Drop images whose host differs from the page host.
    ///
    /// Default: `false`
    pub exclude_external_images: bool,

    /// Keep `data-*` attributes when stripping attributes.
    ///
    /// Default: `false`
    pub keep_data_attributes: bool,

    /// Collapse inline formatting tags into plain text.
    ///
    /// Default: `false`
    pub only_text: bool,

    /// Options handed unchanged to the markdown renderer.
    ///
    /// Default: empty
    pub markdown_renderer_options: RendererOptions,

    /// Maximum nesting depth below the extraction root.
    ///
    /// Deeper nodes are treated as per-node failures by the pruner, and the
    /// serializer refuses trees that exceed it.
    ///
    /// Default: `512`
    pub max_tree_depth: usize,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            word_count_threshold: 1,
            css_selector: None,
            excluded_tags: BTreeSet::new(),
            image_description_min_word_threshold: 1,
            exclude_external_links: false,
            exclude_social_media_links: false,
            social_media_domains: Vec::new(),
            exclude_external_images: false,
            keep_data_attributes: false,
            only_text: false,
            markdown_renderer_options: RendererOptions::new(),
            max_tree_depth: 512,
        }
    }
}

impl ExtractionOptions {
    /// Built-in social domains followed by the configured extras, deduplicated.
    #[must_use]
    pub fn social_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = SOCIAL_MEDIA_DOMAINS.iter().map(|d| (*d).to_string()).collect();
        for extra in &self.social_media_domains {
            let extra = extra.trim().to_ascii_lowercase();
            if !extra.is_empty() && !domains.contains(&extra) {
                domains.push(extra);
            }
        }
        domains
    }
}
