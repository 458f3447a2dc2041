// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-bounded recursive crawling starting from a seed URL
// - Each URL fetched at most once per run (the frontier's visited set)
// - At most N requests in flight per domain, with a random delay before
//   each request
// - Results are streamed to a ResultSink as soon as each fetch finishes
//
// Submodules:
// - filter: which hrefs are crawlable, and their canonical form
// - frontier: visited set + work queue
// - dispatcher: per-domain concurrency limits and jitter
// - engine: the crawl loop itself
// - sink / stats / target: the values that come out of a crawl
// =============================================================================

mod dispatcher;
mod engine;
mod filter;
mod frontier;
mod sink;
mod stats;
mod target;

pub use engine::Crawler;
pub use sink::{CollectingSink, ResultSink};
pub use stats::CrawlSummary;
pub use target::{CrawlResult, Outcome};
