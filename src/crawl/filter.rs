// src/crawl/filter.rs
// =============================================================================
// Decides which link strings are allowed into the frontier.
//
// How it works:
// 1. Skip empty hrefs and fragment-only anchors ("#section")
// 2. Resolve relative links against the page they were found on
// 3. Drop the fragment, so "/docs#intro" and "/docs" are the same page
// 4. Keep only http/https URLs that match one of the accepted patterns
//
// A rejected link is not an error. Real pages are full of mailto:, tel: and
// javascript: links; we just don't follow them.
// =============================================================================

use regex::Regex;
use url::Url;

use crate::error::CrawlError;

/// Accepted-URL patterns plus the normalization rules above.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    patterns: Vec<Regex>,
}

impl UrlFilter {
    /// Compiles the accepted-URL patterns.
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::InvalidFilter` for the first pattern that is not
    /// a valid regular expression.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, CrawlError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern.as_ref()).map_err(|e| CrawlError::InvalidFilter {
                    pattern: pattern.as_ref().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Turns a raw link into a canonical absolute URL, or None if it
    /// should not be crawled.
    ///
    /// `base` is the page the link was found on; pass None for a seed.
    pub fn normalize(&self, base: Option<&Url>, raw: &str) -> Option<Url> {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            return None;
        }

        let mut url = match base {
            Some(base) => base.join(raw).ok()?,
            None => Url::parse(raw).ok()?,
        };
        url.set_fragment(None);

        self.accepts(&url).then_some(url)
    }

    /// True if `url` is http(s) and matches one of the patterns.
    pub fn accepts(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
            && self
                .patterns
                .iter()
                .any(|pattern| pattern.is_match(url.as_str()))
    }
}
