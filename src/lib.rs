//! # rs-pagesift
//!
//! Content extraction for crawled web pages.
//!
//! Given a page's HTML and URL, the engine prunes boilerplate and noise,
//! scores the page's images for usefulness, inventories internal and
//! external links plus video and audio, flattens redundant nesting and
//! renders the surviving markup as markdown.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_pagesift::{extract, ExtractionOptions};
//!
//! let html = r#"<html><head><title>Harbour</title></head>
//! <body><p>Boats come in with the tide. <a href="/tides">Tide tables</a></p></body></html>"#;
//!
//! let result = extract("https://example.com/", html, &ExtractionOptions::default())?
//!     .expect("non-empty page");
//! assert!(result.success);
//! assert_eq!(result.links.internal[0].href, "/tides");
//! assert_eq!(result.metadata["title"], "Harbour");
//! # Ok::<(), rs_pagesift::Error>(())
//! ```
//!
//! ## Collaborators
//!
//! Sanitizing, markdown rendering and metadata extraction go through the
//! [`Sanitizer`], [`MarkdownRenderer`] and [`MetadataExtractor`] traits.
//! [`extract`] uses the built-in implementations; [`extract_with`] accepts
//! any other set through [`Collaborators`].

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Arena-backed working tree.
pub mod tree;

/// Pruning, classification, image scoring and flattening.
pub mod extractor;

/// CSS length parsing for image dimensions.
pub mod dimension;

/// URL resolution and host comparison.
pub mod url_utils;

/// Markup sanitization.
pub mod sanitize;

/// Markdown rendering.
pub mod markdown;

/// Page metadata from `<title>` and `<meta>` tags.
pub mod metadata;

/// Character encoding detection and transcoding.
pub mod encoding;

// Public API - re-exports
pub use error::{Error, Result};
pub use extract::{Collaborators, FALLBACK_BLOCK_ID};
pub use markdown::{Html2MdRenderer, MarkdownRenderer};
pub use metadata::{MetaTagExtractor, MetadataExtractor};
pub use options::{ExtractionOptions, RendererOptions};
pub use result::{
    ExtractionResult, ImageCandidate, LinkEntry, LinkKind, Links, Media, MediaEntry, MediaKind,
    Metadata,
};
pub use sanitize::{DomSanitizer, Sanitizer};

/// Extracts content from a page using the built-in collaborators.
///
/// Returns `Ok(None)` for an empty `html`. `url` is the address the page was
/// fetched from; it decides which links and images are internal.
///
/// # Errors
///
/// Fails only when `options.css_selector` does not parse or when markdown
/// rendering fails twice. Every other failure degrades the result instead:
/// see [`ExtractionResult::success`].
pub fn extract(url: &str, html: &str, options: &ExtractionOptions) -> Result<Option<ExtractionResult>> {
    extract_with(url, html, options, &Collaborators::default())
}

/// Extracts content from a page with caller-supplied collaborators.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rs_pagesift::{extract_with, Collaborators, ExtractionOptions, Sanitizer};
///
/// struct Passthrough;
///
/// impl Sanitizer for Passthrough {
///     fn sanitize(&self, html: &str) -> String {
///         html.to_string()
///     }
/// }
///
/// let collaborators = Collaborators {
///     sanitizer: Arc::new(Passthrough),
///     ..Collaborators::default()
/// };
/// let result = extract_with("https://example.com/", "<p>Hello there</p>", &ExtractionOptions::default(), &collaborators)?
///     .expect("non-empty page");
/// assert_eq!(result.cleaned_html, "<body><p>Hello there</p></body>");
/// # Ok::<(), rs_pagesift::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_with(
    url: &str,
    html: &str,
    options: &ExtractionOptions,
    collaborators: &Collaborators,
) -> Result<Option<ExtractionResult>> {
    extract::extract_document(url, html, options, collaborators)
}

/// Extracts content from raw page bytes with automatic encoding detection.
///
/// The charset is taken from a byte order mark or a `<meta>` declaration,
/// defaulting to UTF-8. Invalid sequences become U+FFFD.
///
/// # Example
///
/// ```rust
/// use rs_pagesift::{extract_bytes, ExtractionOptions};
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><p>Caf\xE9 au lait</p></body></html>";
/// let result = extract_bytes("https://example.com/", html, &ExtractionOptions::default())?
///     .expect("non-empty page");
/// assert!(result.markdown.contains("Café"));
/// # Ok::<(), rs_pagesift::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes(url: &str, html: &[u8], options: &ExtractionOptions) -> Result<Option<ExtractionResult>> {
    extract_bytes_with(url, html, options, &Collaborators::default())
}

/// Byte-input variant of [`extract_with`].
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes_with(
    url: &str,
    html: &[u8],
    options: &ExtractionOptions,
    collaborators: &Collaborators,
) -> Result<Option<ExtractionResult>> {
    let html = encoding::transcode_to_utf8(html);
    extract_with(url, &html, options, collaborators)
}

/// Runs [`extract`] on tokio's blocking pool.
///
/// The pruner and renderer are CPU-bound; this keeps them off the async
/// worker threads.
///
/// # Errors
///
/// As [`extract`], plus [`Error::Join`] when the blocking task panics or is
/// cancelled.
#[cfg(feature = "tokio")]
pub async fn extract_async(
    url: String,
    html: String,
    options: ExtractionOptions,
) -> Result<Option<ExtractionResult>> {
    tokio::task::spawn_blocking(move || extract(&url, &html, &options))
        .await
        .map_err(|err| Error::Join(err.to_string()))?
}
