//! URL detection and decomposition for text found in 856 fields.
//!
//! Detection is pluggable through [`UrlClassifier`]. The default,
//! [`DotComClassifier`], accepts any text containing `.com`, which is the rule
//! existing catalog reports were produced with. [`SchemeClassifier`] is a
//! stricter alternative.
//!
//! [`Url::parse`] splits any string into protocol, domain, port and path
//! without validating them; text that does not look like a URI simply yields
//! empty components.
//!
//! # Examples
//!
//! ```
//! use shelflink::url::{DotComClassifier, Url, UrlClassifier};
//!
//! assert!(DotComClassifier.is_url_like("http://example.com/path"));
//! assert!(!DotComClassifier.is_url_like("not a link"));
//!
//! let url = Url::parse("http://example.com:8080/a/b");
//! assert_eq!(url.protocol, "http");
//! assert_eq!(url.domain, "example.com");
//! assert_eq!(url.port, Some(8080));
//! assert_eq!(url.path, "/a/b");
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    /// URI reference split: scheme, authority, path, query, fragment.
    static ref URI_REFERENCE: Regex = Regex::new(
        r"(?s)^(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$"
    )
    .unwrap();
}

/// A URL and its components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    /// The text the URL was parsed from, verbatim
    pub full_url: String,
    /// Scheme, e.g. `http` (empty when there is none)
    pub protocol: String,
    /// Explicit port from the authority, if any
    pub port: Option<u32>,
    /// Host with the port suffix removed (empty when there is no authority)
    pub domain: String,
    /// Path component, possibly empty
    pub path: String,
}

impl Url {
    /// Split `text` into its components.
    ///
    /// Userinfo (`user:pass@`) is dropped from the authority; the domain is
    /// what precedes the first `:` of the remaining `host:port`. The port is
    /// whatever follows the last `:` when that parses as an integer.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut url = Url {
            full_url: text.to_string(),
            protocol: String::new(),
            port: None,
            domain: String::new(),
            path: String::new(),
        };

        let Some(caps) = URI_REFERENCE.captures(text.trim()) else {
            return url;
        };

        if let Some(scheme) = caps.get(1) {
            url.protocol = scheme.as_str().to_ascii_lowercase();
        }
        if let Some(authority) = caps.get(2) {
            let host_port = authority
                .as_str()
                .rsplit_once('@')
                .map_or(authority.as_str(), |(_, host)| host);
            url.domain = match host_port.find(':') {
                Some(colon) => host_port[..colon].to_string(),
                None => host_port.to_string(),
            };
            url.port = host_port
                .rsplit_once(':')
                .and_then(|(_, port)| port.parse::<u32>().ok());
        }
        if let Some(path) = caps.get(3) {
            url.path = path.as_str().to_string();
        }

        url
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_url)
    }
}

/// Decides whether a piece of leaf text is a URL.
pub trait UrlClassifier: fmt::Debug {
    /// Returns true if `text` should be treated as a URL.
    fn is_url_like(&self, text: &str) -> bool;
}

/// Accepts any text containing `.com`.
///
/// `.com` anywhere in the text counts; `.org` and `.edu` links are missed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotComClassifier;

impl UrlClassifier for DotComClassifier {
    fn is_url_like(&self, text: &str) -> bool {
        text.contains(".com")
    }
}

/// Accepts `http`, `https` and `ftp` URLs that have a domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemeClassifier;

impl UrlClassifier for SchemeClassifier {
    fn is_url_like(&self, text: &str) -> bool {
        let url = Url::parse(text);
        matches!(url.protocol.as_str(), "http" | "https" | "ftp") && !url.domain.is_empty()
    }
}

/// Selects a [`UrlClassifier`] from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// [`DotComClassifier`]
    #[default]
    DotCom,
    /// [`SchemeClassifier`]
    Scheme,
}

impl ClassifierKind {
    /// Instantiate the classifier this kind names.
    #[must_use]
    pub fn build(self) -> Box<dyn UrlClassifier> {
        match self {
            Self::DotCom => Box::new(DotComClassifier),
            Self::Scheme => Box::new(SchemeClassifier),
        }
    }
}
