//! Placeholder page addressing.
//!
//! A suspended tab shows `<base>?originalUrl=<enc>&originalTitle=<enc>`. Both values are
//! percent-encoded component-wise, so `&`, `?`, `#` and `=` inside the original URL or
//! title survive the round trip. This module is also the single place that decides
//! whether an address is internal, our placeholder, or a normal page.

use crate::types::placeholder::{PlaceholderReference, UrlKind, UNTITLED};

/// Default placeholder base when the extension shell does not supply its own.
pub const DEFAULT_PLACEHOLDER_BASE: &str = "chrome-extension://tab-suspender/suspended.html";

const URL_PARAM: &str = "originalUrl";
const TITLE_PARAM: &str = "originalTitle";

/// Schemes of pages the extension must never track or replace.
const INTERNAL_PREFIXES: &[&str] = &[
    "chrome://",
    "edge://",
    "brave://",
    "about:",
    "devtools://",
    "view-source:",
    "chrome-extension://",
    "moz-extension://",
];

/// Encodes, decodes and classifies addresses against one placeholder base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderCodec {
    base_url: String,
}

impl Default for PlaceholderCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_BASE)
    }
}

impl PlaceholderCodec {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.split(['?', '#']).next().unwrap_or(base_url);
        Self {
            base_url: base_url.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the placeholder address for a tab showing `url` titled `title`.
    pub fn encode(&self, url: &str, title: &str) -> String {
        format!(
            "{}?{}={}&{}={}",
            self.base_url,
            URL_PARAM,
            urlencoding::encode(url),
            TITLE_PARAM,
            urlencoding::encode(title)
        )
    }

    /// Recovers the original identity from a placeholder address.
    ///
    /// Returns `None` when `url` is not our placeholder or carries no original URL.
    /// A missing title decodes to "Untitled".
    pub fn decode(&self, url: &str) -> Option<PlaceholderReference> {
        if self.classify(url) != UrlKind::Placeholder {
            return None;
        }
        let query = url[self.base_url.len()..].strip_prefix('?')?;

        let mut original_url = None;
        let mut original_title = None;
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let decoded = urlencoding::decode(value).ok().map(|v| v.into_owned());
            match key {
                URL_PARAM => original_url = decoded,
                TITLE_PARAM => original_title = decoded,
                _ => {}
            }
        }

        let original_url = original_url.filter(|u| !u.is_empty())?;
        Some(PlaceholderReference {
            original_url,
            original_title: original_title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
        })
    }

    /// The one classification used everywhere a URL needs a kind.
    pub fn classify(&self, url: &str) -> UrlKind {
        if self.is_placeholder(url) {
            return UrlKind::Placeholder;
        }
        if url.is_empty() || INTERNAL_PREFIXES.iter().any(|p| url.starts_with(p)) {
            return UrlKind::Internal;
        }
        UrlKind::Normal
    }

    fn is_placeholder(&self, url: &str) -> bool {
        match url.strip_prefix(self.base_url.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('?') || rest.starts_with('#'),
            None => false,
        }
    }
}
