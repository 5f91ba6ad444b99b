//! DOM operations adapter over `dom_query`.
//!
//! Parsing and CSS selector matching are delegated to `dom_query`; the
//! engine only consumes the ids of the matched nodes and resolves them
//! against its own working tree.

pub use dom_query::{Document, Matcher, Selection};

use crate::error::{Error, Result};

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Compile a CSS selector, reporting parse failures as `InvalidSelector`.
pub fn compile_selector(selector: &str) -> Result<Matcher> {
    Matcher::new(selector).map_err(|_| Error::InvalidSelector(selector.to_string()))
}

/// Ids of the elements under `<body>` matched by `matcher`, in document order.
#[must_use]
pub fn select_in_body(doc: &Document, matcher: &Matcher) -> Vec<dom_query::NodeId> {
    doc.select("body")
        .select_matcher(matcher)
        .nodes()
        .iter()
        .map(|node| node.id)
        .collect()
}

/// Ids of the elements under `<body>` matched by a selector string.
pub fn select_ids(doc: &Document, selector: &str) -> Result<Vec<dom_query::NodeId>> {
    let matcher = compile_selector(selector)?;
    Ok(select_in_body(doc, &matcher))
}

/// Get all attributes as key-value pairs.
///
/// Returns an empty vector for an empty selection.
#[must_use]
pub fn get_all_attributes(sel: &Selection) -> Vec<(String, String)> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Append a diagnostic block to `<body>` and return the full document markup.
#[must_use]
pub fn document_with_appended_block(html: &str, block: &str) -> String {
    let doc = parse(html);
    let body = doc.select("body");
    body.append_html(block);
    doc.html().to_string()
}
