// src/checker/mod.rs
// =============================================================================
// This module contains the per-link logic of the crawler.
//
// Submodules:
// - http: fetches a URL and reports its status (or why it failed)
// - html: pulls href values out of fetched pages
// - classify: decides whether a result is Healthy or Unhealthy
//
// The crawl module drives these; nothing in here knows about depth,
// deduplication or rate limits.
// =============================================================================

mod classify;
mod html;
mod http;

pub use classify::{classify, Verdict};
pub use html::extract_hrefs;
pub use http::{HttpFetcher, Page, PageFetcher};
