//! Markup sanitization.
//!
//! [`DomSanitizer`] removes active content from markup: script-like
//! elements, inline event handlers and `javascript:` URLs. Everything else
//! passes through unchanged.

use dom_query::Document;

use crate::dom;

/// Elements removed together with their content.
const ACTIVE_ELEMENTS: &str = "script, style, iframe, object, embed, noscript, template";

/// Attributes whose value is a URL.
const URL_ATTRS: &[&str] = &["href", "src", "action", "formaction", "xlink:href"];

/// Markup sanitizer used for the cleaned HTML and the render retry.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

/// Default sanitizer built on `dom_query`.
///
/// Input containing an `<html>` element comes back as a full document;
/// input containing a `<body>` element comes back as that element; any
/// other input is treated as a fragment and returned without a wrapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomSanitizer;

impl Sanitizer for DomSanitizer {
    fn sanitize(&self, html: &str) -> String {
        let doc = dom::parse(html);
        doc.select(ACTIVE_ELEMENTS).remove();
        strip_active_attributes(&doc);

        let lower = html.to_ascii_lowercase();
        if lower.contains("<html") {
            doc.html().to_string()
        } else if lower.contains("<body") {
            doc.select("body").html().to_string()
        } else {
            doc.select("body").inner_html().to_string()
        }
    }
}

fn strip_active_attributes(doc: &Document) {
    for element in doc.select("*").iter() {
        for (name, value) in dom::get_all_attributes(&element) {
            let lname = name.to_ascii_lowercase();
            if lname.starts_with("on") || (URL_ATTRS.contains(&lname.as_str()) && is_script_url(&value)) {
                element.remove_attr(&name);
            }
        }
    }
}

/// Whether a URL runs script when followed (`javascript:`, with obfuscating whitespace).
fn is_script_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take("javascript:".len())
        .collect();
    compact.eq_ignore_ascii_case("javascript:")
}
