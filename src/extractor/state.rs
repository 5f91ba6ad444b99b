//! Per-page extraction state.
//!
//! `PageContext` holds the read-only facts every stage consults (page URL,
//! resolved host, social-domain table). `Inventory` collects the links and
//! media the pruner records as it walks the tree.

use url::Url;

use crate::options::ExtractionOptions;
use crate::result::{LinkKind, Links, Media};
use crate::url_utils;

/// Read-only page facts shared by the pruner, classifier and image scorer.
#[derive(Debug, Clone)]
pub struct PageContext {
    url: String,
    page: Option<Url>,
    social_domains: Vec<String>,
}

impl PageContext {
    /// Build the context for one extraction call.
    #[must_use]
    pub fn new(url: &str, options: &ExtractionOptions) -> Self {
        Self {
            url: url.to_string(),
            page: url_utils::parse_url(url),
            social_domains: options.social_domains(),
        }
    }

    /// The page URL as given by the caller.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The parsed page URL, when it is absolute.
    #[must_use]
    pub fn page_url(&self) -> Option<&Url> {
        self.page.as_ref()
    }

    /// Classify a reference as internal or external to the page host.
    #[must_use]
    pub fn link_kind(&self, reference: &str) -> LinkKind {
        if self.is_off_host(reference) {
            LinkKind::External
        } else {
            LinkKind::Internal
        }
    }

    /// Whether the reference resolves to a web host other than the page's.
    #[must_use]
    pub fn is_off_host(&self, reference: &str) -> bool {
        url_utils::is_external(reference, self.page.as_ref())
    }

    /// Whether the reference points at a social-media host.
    ///
    /// The reference is resolved against the page URL and its host must be
    /// a social domain or a subdomain of one, so `x.com` matches
    /// `mobile.x.com` but not `netflix.com`. Unresolvable references and
    /// non-web schemes never match.
    #[must_use]
    pub fn is_social(&self, reference: &str) -> bool {
        let Some(host) = url_utils::web_host(reference, self.page.as_ref()) else {
            return false;
        };
        self.social_domains
            .iter()
            .any(|domain| url_utils::host_within(&host, domain))
    }
}

/// Links and media recorded during one pruning pass.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub links: Links,
    pub media: Media,
}
