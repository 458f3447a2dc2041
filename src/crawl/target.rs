// src/crawl/target.rs
// =============================================================================
// The two values that flow through a crawl:
// - CrawlTarget: a URL waiting to be fetched, plus how many hops it is from
//   the seed
// - CrawlResult: what happened when we fetched it
// =============================================================================

use serde::{Deserialize, Serialize};
use url::Url;

/// A URL admitted to the frontier at a given depth (0 = seed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: Url,
    pub depth: usize,
}

/// How a fetch ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// The server answered with this HTTP status.
    Status(u16),
    /// No status was received; the reason is never empty.
    Failed(String),
}

/// The outcome of fetching one CrawlTarget. Produced exactly once per target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: Url,
    pub depth: usize,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl CrawlResult {
    pub fn status(&self) -> Option<u16> {
        match self.outcome {
            Outcome::Status(status) => Some(status),
            Outcome::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_json_shape() {
        let result = CrawlResult {
            url: Url::parse("http://bad.org").unwrap(),
            depth: 1,
            outcome: Outcome::Status(500),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "http://bad.org/",
                "depth": 1,
                "outcome": "status",
                "value": 500
            })
        );
    }

    #[test]
    fn test_status_accessor() {
        let failed = CrawlResult {
            url: Url::parse("http://down.org").unwrap(),
            depth: 0,
            outcome: Outcome::Failed("connection refused".to_string()),
        };
        assert_eq!(failed.status(), None);
    }
}
