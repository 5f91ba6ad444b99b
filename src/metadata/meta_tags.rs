//! HTML meta tag extraction.
//!
//! Reads the document title, the standard `name`/`content` meta tags, Open
//! Graph (`property="og:*"`) and Twitter card (`name="twitter:*"`) tags.
//! When a key appears more than once the first value wins.

use dom_query::{Document, Selection};

use crate::result::Metadata;

/// Standard meta names copied into the metadata map.
const STANDARD_NAMES: &[&str] = &["description", "keywords", "author"];

/// Insert `value` under `key` unless the key is already present.
fn insert_first(metadata: &mut Metadata, key: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    metadata
        .entry(key.to_string())
        .or_insert_with(|| value.to_string());
}

/// Text of the first `<title>` element.
#[must_use]
pub fn examine_title(doc: &Document) -> Option<String> {
    let title = doc.select("title").first().text();
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

/// Examine the `<meta>` tags of a document.
///
/// Keys are lowercased; values are trimmed. Existing entries in `metadata`
/// are never overwritten.
pub fn examine_meta(doc: &Document, metadata: &mut Metadata) {
    for node in doc.select("meta").nodes() {
        let meta = Selection::from(*node);
        let Some(content) = meta.attr("content") else {
            continue;
        };

        if let Some(property) = meta.attr("property") {
            let property = property.trim().to_ascii_lowercase();
            if property.starts_with("og:") {
                insert_first(metadata, &property, &content);
                continue;
            }
        }

        let Some(name) = meta.attr("name") else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.starts_with("twitter:") || STANDARD_NAMES.contains(&name.as_str()) {
            insert_first(metadata, &name, &content);
        }
    }
}
