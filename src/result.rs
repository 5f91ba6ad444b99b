//! Result types for extraction output.
//!
//! Field names serialize to the JSON shape crawling pipelines already
//! consume (`cleaned_html`, `data-src`, `type`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Page metadata (title, description, OpenGraph and Twitter card values).
pub type Metadata = BTreeMap<String, String>;

/// A hyperlink found in the extracted content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    /// The `href` exactly as written in the page.
    pub href: String,
    /// Anchor text, trimmed.
    pub text: String,
}

/// Host-relative classification of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Internal,
    External,
}

/// Links found in the content, split by host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub internal: Vec<LinkEntry>,
    pub external: Vec<LinkEntry>,
}

impl Links {
    /// Append an entry to the list matching `kind`.
    pub fn push(&mut self, kind: LinkKind, entry: LinkEntry) {
        match kind {
            LinkKind::Internal => self.internal.push(entry),
            LinkKind::External => self.external.push(entry),
        }
    }
}

/// Kind of media entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

/// A video or audio source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub src: Option<String>,
    pub alt: Option<String>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Text of the closest ancestor with enough words to describe the media.
    pub description: Option<String>,
}

/// An image that passed the validity filter and scored above the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub src: String,
    #[serde(rename = "data-src")]
    pub data_src: String,
    pub alt: String,
    /// Text of the closest ancestor with enough words to describe the image.
    #[serde(rename = "desc")]
    pub description: Option<String>,
    /// Usefulness score (always above the inclusion threshold).
    pub score: u32,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// Media inventory of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub images: Vec<ImageCandidate>,
    pub videos: Vec<MediaEntry>,
    pub audios: Vec<MediaEntry>,
}

impl Media {
    /// Append a video or audio entry to the list matching its kind.
    pub fn push(&mut self, entry: MediaEntry) {
        match entry.kind {
            MediaKind::Video => self.videos.push(entry),
            MediaKind::Audio => self.audios.push(entry),
            MediaKind::Image => {}
        }
    }
}

/// Result of extracting one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Markdown rendering of the cleaned markup.
    pub markdown: String,

    /// Pruned, flattened and sanitized markup.
    pub cleaned_html: String,

    /// `false` when the pruned tree could not be serialized and the
    /// diagnostic fallback page was used instead.
    pub success: bool,

    pub media: Media,

    pub links: Links,

    pub metadata: Metadata,

    /// Explanation attached to terminal results (e.g. selector matched nothing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExtractionResult {
    /// Terminal result for a CSS selector that matched no element.
    #[must_use]
    pub fn scope_empty(selector: &str) -> Self {
        Self {
            success: true,
            message: Some(format!("No elements found for CSS selector: {selector}")),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_empty_is_successful_and_empty() {
        let result = ExtractionResult::scope_empty("#missing");

        assert!(result.success);
        assert!(result.markdown.is_empty());
        assert!(result.cleaned_html.is_empty());
        assert!(result.media.images.is_empty());
        assert!(result.links.internal.is_empty());
        assert!(result.metadata.is_empty());
        assert!(result.message.as_deref().is_some_and(|m| m.contains("#missing")));
    }

    #[test]
    fn test_image_candidate_serializes_with_wire_names() {
        let image = ImageCandidate {
            src: "a.jpg".into(),
            data_src: String::new(),
            alt: "x".into(),
            description: None,
            score: 4,
            kind: MediaKind::Image,
        };

        let json = serde_json::to_value(&image).expect("serialize");
        assert_eq!(json["type"], "image");
        assert!(json.get("data-src").is_some());
        assert!(json.get("desc").is_some());
    }

    #[test]
    fn test_message_is_omitted_when_absent() {
        let json = serde_json::to_value(ExtractionResult::default()).expect("serialize");
        assert!(json.get("message").is_none());
        assert!(json.get("cleaned_html").is_some());
    }

    #[test]
    fn test_media_push_routes_by_kind() {
        let mut media = Media::default();
        media.push(MediaEntry {
            src: Some("a.mp4".into()),
            alt: None,
            kind: MediaKind::Video,
            description: None,
        });
        media.push(MediaEntry {
            src: Some("a.mp3".into()),
            alt: None,
            kind: MediaKind::Audio,
            description: None,
        });

        assert_eq!(media.videos.len(), 1);
        assert_eq!(media.audios.len(), 1);
    }
}
