// src/checker/classify.rs
// =============================================================================
// Healthy or not? A link is healthy when the server answered with a 2xx
// status. Everything else is unhealthy:
// - 3xx: we only see these when redirects were not followed
// - 4xx: client errors (404 Not Found, 410 Gone, ...)
// - 5xx: server errors
// - no status at all: the request failed at the transport level
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::crawl::{CrawlResult, Outcome};

const HTTP_MIN_HEALTHY: u16 = 200;
const HTTP_MAX_HEALTHY: u16 = 299;

/// The verdict for one crawled link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Healthy,
    Unhealthy,
}

/// Classifies a bare HTTP status code.
pub fn classify_status(status: u16) -> Verdict {
    if (HTTP_MIN_HEALTHY..=HTTP_MAX_HEALTHY).contains(&status) {
        Verdict::Healthy
    } else {
        Verdict::Unhealthy
    }
}

/// Classifies a finished crawl result.
pub fn classify(result: &CrawlResult) -> Verdict {
    match &result.outcome {
        Outcome::Status(status) => classify_status(*status),
        Outcome::Failed(_) => Verdict::Unhealthy,
    }
}
