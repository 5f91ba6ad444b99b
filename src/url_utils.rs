//! URL utilities for host-based link and image classification.
//!
//! Hosts are compared through a real URL parser rather than by splitting on
//! `/`, so scheme-relative (`//cdn.example.com/a.png`) and relative
//! references resolve against the page URL before the comparison.

use url::Url;

/// Parse the page URL, returning `None` for anything that is not absolute.
#[must_use]
pub fn parse_url(url_str: &str) -> Option<Url> {
    Url::parse(url_str.trim()).ok()
}

/// Resolve a reference against an optional base.
///
/// Without a base only absolute references resolve.
#[must_use]
pub fn resolve(reference: &str, base: Option<&Url>) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    match base {
        Some(base) => base.join(reference).ok(),
        None => Url::parse(reference).ok(),
    }
}

/// Lowercase host of a web (http/https) reference after resolution.
///
/// `None` for non-web schemes (`mailto:`, `data:`, `javascript:`) and for
/// references that cannot be resolved.
#[must_use]
pub fn web_host(reference: &str, base: Option<&Url>) -> Option<String> {
    let url = resolve(reference, base)?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str().map(str::to_ascii_lowercase)
}

/// Whether a reference points to a different web host than the page.
///
/// Relative references are never external. Non-web schemes are never
/// external either: they are not pages on another site.
#[must_use]
pub fn is_external(reference: &str, page: Option<&Url>) -> bool {
    let Some(host) = web_host(reference, page) else {
        return false;
    };
    let page_host = page.and_then(Url::host_str).map(str::to_ascii_lowercase);
    page_host.as_deref() != Some(host.as_str())
}

/// Whether `host` is `domain` itself or one of its subdomains (case-insensitive).
#[must_use]
pub fn host_within(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let domain = domain.trim_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }
    host == domain
        || host
            .strip_suffix(domain.as_str())
            .is_some_and(|prefix| prefix.ends_with('.'))
}
