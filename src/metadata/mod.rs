//! Metadata extraction module.
//!
//! Metadata is read from the original, unpruned document. The engine only
//! depends on the [`MetadataExtractor`] trait; [`MetaTagExtractor`] is the
//! default implementation built on `<title>` and `<meta>` tags.

pub mod meta_tags;

use dom_query::Document;

use crate::error::Result;
use crate::result::Metadata;

pub use meta_tags::{examine_meta, examine_title};

/// Page metadata source.
///
/// Receives both the raw HTML and the parsed document so implementations
/// can choose whichever they need. A returned error is logged by the
/// assembler and replaced with an empty map.
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, html: &str, doc: &Document) -> Result<Metadata>;
}

/// Default extractor: title, description, keywords, author, `og:*` and `twitter:*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaTagExtractor;

impl MetadataExtractor for MetaTagExtractor {
    fn extract(&self, _html: &str, doc: &Document) -> Result<Metadata> {
        let mut metadata = Metadata::new();

        if let Some(title) = examine_title(doc) {
            metadata.insert("title".to_string(), title);
        }
        examine_meta(doc, &mut metadata);

        Ok(metadata)
    }
}
