//! Result assembly.
//!
//! Drives one extraction call end to end: parse, copy into the working
//! tree, excluded-tag and scope pre-pass, prune, score images, flatten,
//! strip base64 payloads, serialize (with the diagnostic fallback), render
//! markdown, read metadata and sanitize the cleaned markup.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::dom;
use crate::error::{Error, Result};
use crate::extractor::{flatten, pruning, score_images, ImageSnapshot, PageContext, Pruner};
use crate::markdown::{normalize_fences, Html2MdRenderer, MarkdownRenderer};
use crate::metadata::{MetaTagExtractor, MetadataExtractor};
use crate::options::ExtractionOptions;
use crate::patterns::BASE64_IMAGE_SRC;
use crate::result::{ExtractionResult, Media, Metadata};
use crate::sanitize::{DomSanitizer, Sanitizer};
use crate::tree::{NodeId, Tree};

/// Id of the block appended to the fallback page.
pub const FALLBACK_BLOCK_ID: &str = "extraction-error";

/// The pluggable collaborators of an extraction call.
#[derive(Clone)]
pub struct Collaborators {
    pub sanitizer: Arc<dyn Sanitizer>,
    pub renderer: Arc<dyn MarkdownRenderer>,
    pub metadata: Arc<dyn MetadataExtractor>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            sanitizer: Arc::new(DomSanitizer),
            renderer: Arc::new(Html2MdRenderer),
            metadata: Arc::new(MetaTagExtractor),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Run the full pipeline for one page.
pub(crate) fn extract_document(
    url: &str,
    html: &str,
    options: &ExtractionOptions,
    collaborators: &Collaborators,
) -> Result<Option<ExtractionResult>> {
    if html.is_empty() {
        debug!(url, "empty document, nothing to extract");
        return Ok(None);
    }

    let doc = dom::parse(html);
    let (mut tree, id_map) = Tree::from_document(&doc);
    let Some(body) = tree.find_first(tree.root(), "body") else {
        return Ok(None);
    };

    remove_excluded_tags(&doc, &mut tree, &id_map, options);

    let root = match &options.css_selector {
        Some(selector) => {
            let matched = map_ids(&id_map, &dom::select_ids(&doc, selector)?);
            match pruning::narrow_scope(&mut tree, body, &matched) {
                Some(wrapper) => wrapper,
                None => {
                    debug!(url, selector = %selector, "css selector matched nothing");
                    return Ok(Some(ExtractionResult::scope_empty(selector)));
                }
            }
        }
        None => body,
    };

    let parent_classes = image_parent_classes(&tree, root);

    let ctx = PageContext::new(url, options);
    let mut pruner = Pruner::new(&ctx, options);
    pruner.prune(&mut tree, root);
    let inventory = pruner.into_inventory();

    let snapshots: Vec<ImageSnapshot> = tree
        .find_all(root, "img")
        .into_iter()
        .map(|id| {
            let classes = parent_classes.get(&id).cloned().unwrap_or_default();
            ImageSnapshot::capture(&tree, id, classes, options.image_description_min_word_threshold)
        })
        .collect();
    let images = score_images(&snapshots, ctx.url());

    let root = flatten::flatten(&mut tree, root);
    strip_base64_payloads(&mut tree, root);

    let (serialized, success) = serialize_or_fallback(&tree, root, html, options.max_tree_depth);
    let cleaned = serialized.replace("\n\n", "\n").replace("  ", " ");

    let markdown = render_markdown(&cleaned, options, collaborators)?;

    let metadata = match collaborators.metadata.extract(html, &doc) {
        Ok(metadata) => metadata,
        Err(err) => {
            warn!(url, error = %err, "metadata extraction failed, continuing without metadata");
            Metadata::new()
        }
    };

    let cleaned_html = collaborators.sanitizer.sanitize(&cleaned);

    debug!(
        url,
        success,
        internal_links = inventory.links.internal.len(),
        external_links = inventory.links.external.len(),
        images = images.len(),
        "extraction complete"
    );

    Ok(Some(ExtractionResult {
        markdown,
        cleaned_html,
        success,
        media: Media {
            images,
            ..inventory.media
        },
        links: inventory.links,
        metadata,
        message: None,
    }))
}

fn map_ids(id_map: &HashMap<dom_query::NodeId, NodeId>, ids: &[dom_query::NodeId]) -> Vec<NodeId> {
    ids.iter().filter_map(|id| id_map.get(id).copied()).collect()
}

/// Detach every element matching one of the excluded tags.
///
/// Tag names that do not parse as selectors are skipped with a warning.
fn remove_excluded_tags(
    doc: &dom::Document,
    tree: &mut Tree,
    id_map: &HashMap<dom_query::NodeId, NodeId>,
    options: &ExtractionOptions,
) {
    for tag in &options.excluded_tags {
        match dom::select_ids(doc, tag) {
            Ok(ids) => pruning::remove_nodes(tree, &map_ids(id_map, &ids)),
            Err(err) => warn!(tag = %tag, error = %err, "skipping excluded tag"),
        }
    }
}

/// Class tokens of each image's parent, captured before pruning strips `class`.
fn image_parent_classes(tree: &Tree, root: NodeId) -> HashMap<NodeId, Vec<String>> {
    tree.find_all(root, "img")
        .into_iter()
        .map(|img| {
            let classes = tree
                .parent(img)
                .and_then(|parent| tree.attr(parent, "class"))
                .map(|class| class.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            (img, classes)
        })
        .collect()
}

/// Empty the payload of base64 image sources, keeping the `data:image/...;base64,` prefix.
fn strip_base64_payloads(tree: &mut Tree, root: NodeId) {
    for img in tree.find_all(root, "img") {
        let prefix = tree
            .attr(img, "src")
            .and_then(|src| BASE64_IMAGE_SRC.captures(src))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        if let Some(prefix) = prefix {
            tree.set_attr(img, "src", &prefix);
        }
    }
}

/// Serialize the extraction root; on failure fall back to the original
/// page with a diagnostic block appended and report `success = false`.
fn serialize_or_fallback(tree: &Tree, root: NodeId, html: &str, max_depth: usize) -> (String, bool) {
    match tree.serialize(root, max_depth) {
        Ok(markup) => (markup, true),
        Err(err) => {
            warn!(error = %err, "serialization failed, using original page");
            let block = format!(
                concat!(
                    r#"<div id="{id}">"#,
                    "<p>Error processing page content: {detail}</p>",
                    "<p>Likely cause: the structure of this page is not supported. ",
                    "It may nest elements deeper than the configured limit or be malformed ",
                    "in a way the cleaner cannot represent.</p>",
                    "<p>Suggestion: retry with a narrower css_selector that targets the main ",
                    "content, or adjust max_tree_depth.</p>",
                    "</div>"
                ),
                id = FALLBACK_BLOCK_ID,
                detail = escape(&err.to_string())
            );
            (dom::document_with_appended_block(html, &block), false)
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render markdown, retrying once with sanitized input.
fn render_markdown(
    cleaned: &str,
    options: &ExtractionOptions,
    collaborators: &Collaborators,
) -> Result<String> {
    let renderer_options = &options.markdown_renderer_options;

    let markdown = match collaborators.renderer.render(cleaned, renderer_options) {
        Ok(markdown) => markdown,
        Err(err) => {
            warn!(error = %err, "markdown rendering failed, retrying with sanitized markup");
            let sanitized = collaborators.sanitizer.sanitize(cleaned);
            collaborators
                .renderer
                .render(&sanitized, renderer_options)
                .map_err(|retry| Error::Render(format!("{err}; retry: {retry}")))?
        }
    };

    Ok(normalize_fences(&markdown))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::options::RendererOptions;

    const PAGE: &str = "https://example.com/post";

    fn run(html: &str, options: &ExtractionOptions) -> ExtractionResult {
        extract_document(PAGE, html, options, &Collaborators::default())
            .expect("extraction")
            .expect("result")
    }

    /// Fails until it has been called `failures` times.
    struct FlakyRenderer {
        failures: usize,
        calls: AtomicUsize,
        seen: std::sync::Mutex<Vec<String>>,
    }

    impl FlakyRenderer {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                calls: AtomicUsize::new(0),
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    impl MarkdownRenderer for FlakyRenderer {
        fn render(&self, html: &str, _options: &RendererOptions) -> Result<String> {
            self.seen.lock().expect("lock").push(html.to_string());
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(Error::Render(format!("attempt {call}")))
            } else {
                Ok("    ```\nok\n    ```".to_string())
            }
        }
    }

    struct MarkingSanitizer;

    impl Sanitizer for MarkingSanitizer {
        fn sanitize(&self, html: &str) -> String {
            format!("<!--sanitized-->{html}")
        }
    }

    struct BrokenMetadata;

    impl MetadataExtractor for BrokenMetadata {
        fn extract(&self, _html: &str, _doc: &dom::Document) -> Result<Metadata> {
            Err(Error::Metadata("no head".into()))
        }
    }

    #[test]
    fn test_empty_html_yields_nothing() {
        let out = extract_document(PAGE, "", &ExtractionOptions::default(), &Collaborators::default())
            .expect("extraction");
        assert!(out.is_none());
    }

    #[test]
    fn test_render_retry_uses_sanitized_markup() {
        let renderer = Arc::new(FlakyRenderer::new(1));
        let collaborators = Collaborators {
            renderer: renderer.clone(),
            sanitizer: Arc::new(MarkingSanitizer),
            ..Collaborators::default()
        };

        let markdown =
            render_markdown("<p>x</p>", &ExtractionOptions::default(), &collaborators).expect("retry succeeds");

        assert_eq!(markdown, "```\nok\n```");
        let seen = renderer.seen.lock().expect("lock");
        assert_eq!(seen.as_slice(), ["<p>x</p>", "<!--sanitized--><p>x</p>"]);
    }

    #[test]
    fn test_render_fails_after_one_retry() {
        let renderer = Arc::new(FlakyRenderer::new(5));
        let collaborators = Collaborators {
            renderer: renderer.clone(),
            ..Collaborators::default()
        };

        let err = extract_document(PAGE, "<p>Hello world</p>", &ExtractionOptions::default(), &collaborators)
            .expect_err("render failure propagates");

        assert!(matches!(err, Error::Render(_)));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_metadata_failure_leaves_success_untouched() {
        let collaborators = Collaborators {
            metadata: Arc::new(BrokenMetadata),
            ..Collaborators::default()
        };

        let result = extract_document(PAGE, "<p>Hello world</p>", &ExtractionOptions::default(), &collaborators)
            .expect("extraction")
            .expect("result");

        assert!(result.success);
        assert!(result.metadata.is_empty());
    }

    #[test]
    fn test_serialization_failure_falls_back_to_original_page() {
        let html = "<html><body><div><p>Original text</p></div></body></html>";
        let doc = dom::parse(html);
        let (mut tree, _) = Tree::from_document(&doc);
        let body = tree.find_first(tree.root(), "body").expect("body");
        let p = tree.find_first(body, "p").expect("p");
        tree.corrupt_parent_link(p);

        let (markup, success) = serialize_or_fallback(&tree, body, html, 512);

        assert!(!success);
        assert!(markup.contains("Original text"));
        assert!(markup.contains(FALLBACK_BLOCK_ID));
        assert!(markup.contains("Error processing page content"));
        assert!(markup.contains("structure of this page is not supported"));
        assert!(markup.contains("retry with a narrower css_selector"));
        assert!(markup.find("Original text") < markup.find(FALLBACK_BLOCK_ID));
    }

    #[test]
    fn test_serialization_success_is_reported() {
        let doc = dom::parse("<p>x</p>");
        let (tree, _) = Tree::from_document(&doc);
        let body = tree.find_first(tree.root(), "body").expect("body");

        assert_eq!(serialize_or_fallback(&tree, body, "<p>x</p>", 512), ("<body><p>x</p></body>".to_string(), true));
    }

    #[test]
    fn test_base64_payload_is_emptied() {
        let doc = dom::parse(r#"<img src="data:image/png;base64,iVBORw0KGgo="><img src="/a.png">"#);
        let (mut tree, _) = Tree::from_document(&doc);
        let body = tree.find_first(tree.root(), "body").expect("body");

        strip_base64_payloads(&mut tree, body);

        let imgs = tree.find_all(body, "img");
        assert_eq!(tree.attr(imgs[0], "src"), Some("data:image/png;base64,"));
        assert_eq!(tree.attr(imgs[1], "src"), Some("/a.png"));
    }

    #[test]
    fn test_parent_classes_are_captured_before_pruning() {
        let html = r#"<div class="site-Logo wrap"><img src="/brand.jpg" alt="Brand" width="400" height="400"></div>
                      <p>Enough words here for the page to keep content.</p>"#;
        let result = run(html, &ExtractionOptions::default());

        assert!(result.media.images.is_empty());
        assert!(!result.cleaned_html.contains("class="));
    }

    #[test]
    fn test_excluded_tags_are_removed_and_bad_names_skipped() {
        let options = ExtractionOptions {
            excluded_tags: ["nav".to_string(), "[[".to_string()].into_iter().collect(),
            ..ExtractionOptions::default()
        };
        let result = run(
            r#"<nav><a href="/home">Home</a></nav><p>Body text <a href="/post">post</a></p>"#,
            &options,
        );

        assert!(!result.cleaned_html.contains("Home"));
        let hrefs: Vec<_> = result.links.internal.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/post"]);
    }

    #[test]
    fn test_whitespace_is_collapsed_once() {
        let result = run("<p>a  b</p>\n\n<p>c</p>", &ExtractionOptions::default());
        assert!(!result.cleaned_html.contains("\n\n"));
        assert!(result.cleaned_html.contains("a b"));
    }
}
