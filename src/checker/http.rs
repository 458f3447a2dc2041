// src/checker/http.rs
// =============================================================================
// This module performs the HTTP side of a crawl: one GET per URL.
//
// Key functionality:
// - PageFetcher: the trait the crawl engine talks to. The real
//   implementation is HttpFetcher (reqwest); tests plug in an in-memory site.
// - Any HTTP status (200, 404, 500...) is a successful fetch as far as this
//   module is concerned. Deciding whether it's healthy is the classifier's job.
// - Redirects are NOT followed here. A 3xx comes back as a Page with its
//   Location header, and the crawl engine decides whether to follow it (it
//   has to check the target against the URLs it has already visited).
// - Transport failures (DNS, connection refused, timeout, TLS) become a
//   FetchError with a readable reason.
//
// Rust concepts:
// - async-trait: lets a trait have async methods that can be used from
//   spawned tokio tasks
// - Error source chains: reqwest wraps the real cause (e.g. "connection
//   refused") a few levels deep, so we walk .source() to find it
// =============================================================================

use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Client};
use tracing::{debug, warn};
use url::Url;

use crate::config::CrawlConfig;
use crate::error::{CrawlError, FetchError, FetchErrorKind};

/// What came back from a URL that answered with an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The URL that answered.
    pub url: Url,
    pub status: u16,
    pub content_type: Option<String>,
    /// Raw `Location` header, as sent by the server.
    pub location: Option<String>,
    /// Only filled in for HTML responses.
    pub body: Option<String>,
}

impl Page {
    /// Where the server wants us to go instead, for redirect statuses.
    pub fn redirect_location(&self) -> Option<&str> {
        match self.status {
            301 | 302 | 303 | 307 | 308 => self.location.as_deref(),
            _ => None,
        }
    }

    /// True when the server says the body is HTML.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.to_ascii_lowercase().contains("html"))
    }
}

/// Something that can fetch a page for the crawl engine.
#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    /// Fetches `url`.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` when no HTTP status was received at all.
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError>;
}

/// The real fetcher, backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client with the configured user agent and timeout.
    ///
    /// The client never follows redirects on its own.
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::HttpClient` if reqwest can't build the client
    /// (for example when the TLS backend fails to initialize).
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        // We reuse this client for all requests (connection pooling)
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| CrawlError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        let mut page = Page {
            url: response.url().clone(),
            status: response.status().as_u16(),
            content_type: header_text(response.headers(), CONTENT_TYPE),
            location: header_text(response.headers(), LOCATION),
            body: None,
        };

        // Only HTML can contain links we follow, so skip downloading
        // images, PDFs and the like
        if page.is_html() {
            match response.text().await {
                Ok(body) => page.body = Some(body),
                Err(e) => {
                    // We already have a status, so the link itself is
                    // reported; we just can't look inside the page
                    warn!(url = %url, error = %e, "failed to read response body");
                }
            }
        }

        debug!(url = %url, status = page.status, html = page.is_html(), "fetched");
        Ok(page)
    }
}

// Header value as text; missing or non-ASCII values count as absent
fn header_text(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

// Turns a reqwest error into a FetchError with a readable reason
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure / connection refused
// - SSL certificate issues
fn categorize_error(error: reqwest::Error) -> FetchError {
    let kind = if error.is_timeout() {
        FetchErrorKind::Timeout
    } else if error.is_connect() {
        FetchErrorKind::Connect
    } else if error.is_body() || error.is_decode() {
        FetchErrorKind::Body
    } else {
        FetchErrorKind::Other
    };

    FetchError::new(kind, error_chain(&error))
}

// Joins an error and all of its sources into one line:
//   "error sending request: error trying to connect: connection refused"
fn error_chain(error: &dyn StdError) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut current = Some(error);

    while let Some(err) = current {
        let text = err.to_string();
        // Wrappers often repeat their source's text; only keep new info
        if !text.is_empty() && !parts.iter().any(|part| part.contains(&text)) {
            parts.push(text);
        }
        current = err.source();
    }

    parts.join(": ")
}
