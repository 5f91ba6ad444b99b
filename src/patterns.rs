//! Constant tables and compiled regex patterns used by the extraction engine.
//!
//! All patterns are compiled once using `LazyLock`. The tables are read-only
//! and shared between concurrent extraction calls.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Pruning Tables
// =============================================================================

/// Tags removed unconditionally by the pruner.
pub const NON_CONTENT_TAGS: &[&str] = &["script", "style", "link", "meta", "noscript"];

/// Attributes preserved on pruned elements; everything else is stripped.
pub const IMPORTANT_ATTRS: &[&str] = &["src", "href", "alt", "title", "width", "height"];

/// Prefix of attributes optionally kept via `keep_data_attributes`.
pub const DATA_ATTR_PREFIX: &str = "data-";

/// Inline tags collapsed to plain text when `only_text` is enabled.
pub const ONLY_TEXT_ELIGIBLE_TAGS: &[&str] = &[
    "b", "i", "u", "span", "del", "ins", "sub", "sup", "strong", "em", "code", "kbd", "var", "s",
    "q", "abbr", "cite", "dfn", "time", "small", "mark",
];

/// Built-in social-media domains, unioned with `ExtractionOptions::social_media_domains`.
pub const SOCIAL_MEDIA_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "instagram.com",
    "pinterest.com",
    "tiktok.com",
    "snapchat.com",
    "reddit.com",
];

/// Void elements serialized without a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

// =============================================================================
// Image Heuristics
// =============================================================================

/// Substrings in src/alt/parent class marking an image as decorative.
pub const DECORATIVE_MARKERS: &[&str] = &["button", "icon", "logo"];

/// Parent tags that make an image an interactive control rather than content.
pub const INTERACTIVE_PARENT_TAGS: &[&str] = &["button", "input"];

/// File extensions treated as photographic/web content images.
pub const CONTENT_IMAGE_FORMATS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Relative units scored against `RELATIVE_DIMENSION_MIN`.
pub const RELATIVE_UNITS: &[&str] = &["%", "vh", "vmin", "vmax"];

/// Pixel size above which a dimension counts toward the score.
pub const PIXEL_DIMENSION_MIN: u64 = 150;

/// Relative size above which a dimension counts toward the score.
pub const RELATIVE_DIMENSION_MIN: u64 = 30;

/// File size (bytes) above which an image counts toward the score.
pub const IMAGE_FILE_SIZE_MIN: u64 = 10_000;

/// An image is kept only when its score is strictly greater than this.
pub const IMAGE_SCORE_THRESHOLD: u32 = 2;

// =============================================================================
// Regex Patterns
// =============================================================================

/// Leading integer followed by an optional unit suffix (`"150px"`, `"30%"`, `"200"`).
pub static DIMENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(\D*)").expect("DIMENSION regex"));

/// Base64 image data URI; group 1 is the prefix kept after stripping.
pub static BASE64_IMAGE_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(data:image/[^;]+;base64,)").expect("BASE64_IMAGE_SRC regex")
});

/// `<meta charset="...">` declaration.
pub static CHARSET_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s/>]+)"#).expect("CHARSET_META regex")
});

/// Indented code fences left behind by the markdown renderer.
pub static INDENTED_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ {4}```").expect("INDENTED_FENCE regex"));
