// src/config.rs
// =============================================================================
// Run parameters for a single crawl.
//
// CrawlConfig is built once at startup (from the CLI, or directly in tests)
// and then frozen: the crawl engine wraps it in an Arc and every task reads
// from it, nobody writes to it.
// =============================================================================

use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::warn;
use url::Url;

use crate::error::CrawlError;

/// Identifies the tool to the servers we crawl.
pub const DEFAULT_USER_AGENT: &str = concat!("link-health/", env!("CARGO_PKG_VERSION"));
/// How many link hops from the seed we follow.
pub const DEFAULT_MAX_DEPTH: usize = 2;
/// In-flight requests allowed per domain.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
/// Upper bound of the random pause taken before each request.
pub const DEFAULT_RANDOM_DELAY: Duration = Duration::from_secs(1);
/// Per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Only absolute http(s) URLs are crawled unless the user says otherwise.
pub const DEFAULT_URL_FILTER: &str = "^https?://.+$";

/// The resolved settings of one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seed: Url,
    pub max_depth: usize,
    pub max_concurrency: usize,
    pub random_delay: Duration,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub url_filters: Vec<String>,
}

impl CrawlConfig {
    /// Parses the seed and fills every other setting with its default.
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::InvalidSeed` if `seed` is not an absolute URL.
    pub fn new(seed: &str) -> Result<Self, CrawlError> {
        let seed = Url::parse(seed.trim()).map_err(|e| CrawlError::InvalidSeed {
            input: seed.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            seed,
            max_depth: DEFAULT_MAX_DEPTH,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            random_delay: DEFAULT_RANDOM_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            url_filters: vec![DEFAULT_URL_FILTER.to_string()],
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_random_delay(mut self, random_delay: Duration) -> Self {
        self.random_delay = random_delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Replaces the accepted-URL patterns. An empty list keeps the default.
    pub fn with_url_filters(mut self, url_filters: Vec<String>) -> Self {
        if !url_filters.is_empty() {
            self.url_filters = url_filters;
        }
        self
    }

    /// Checks the limiter settings and replaces unusable ones with defaults.
    ///
    /// Never fails: every problem found is logged, fixed, and handed back
    /// so the caller can report it.
    pub fn validated(mut self) -> (Self, Vec<CrawlError>) {
        let mut problems = Vec::new();

        let limit_problem = if self.max_concurrency == 0 {
            Some("parallelism must be at least 1".to_string())
        } else if self.max_concurrency > Semaphore::MAX_PERMITS {
            Some(format!(
                "parallelism must be at most {}",
                Semaphore::MAX_PERMITS
            ))
        } else {
            None
        };

        if let Some(reason) = limit_problem {
            warn!(
                requested = self.max_concurrency,
                fallback = DEFAULT_MAX_CONCURRENCY,
                "{reason}; using default parallelism"
            );
            self.max_concurrency = DEFAULT_MAX_CONCURRENCY;
            problems.push(CrawlError::InvalidLimit(reason));
        }

        (self, problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::new("https://example.com").unwrap();
        assert_eq!(config.seed.as_str(), "https://example.com/");
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.random_delay, Duration::from_secs(1));
        assert!(config.user_agent.starts_with("link-health/"));
        assert_eq!(config.url_filters, vec![DEFAULT_URL_FILTER.to_string()]);
    }

    #[test]
    fn test_relative_seed_is_fatal() {
        let result = CrawlConfig::new("example.com/page");
        assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));
    }

    #[test]
    fn test_any_scheme_parses() {
        let config = CrawlConfig::new("ftp://example.com/file").unwrap();
        assert_eq!(config.seed.scheme(), "ftp");
    }

    #[test]
    fn test_validated_keeps_good_limits() {
        let (config, problems) = CrawlConfig::new("https://example.com")
            .unwrap()
            .with_max_concurrency(7)
            .validated();
        assert_eq!(config.max_concurrency, 7);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_validated_replaces_zero_parallelism() {
        let (config, problems) = CrawlConfig::new("https://example.com")
            .unwrap()
            .with_max_concurrency(0)
            .validated();
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(problems.len(), 1);
        assert!(matches!(problems[0], CrawlError::InvalidLimit(_)));
        assert!(problems[0].to_string().contains("parallelism"));
    }

    #[test]
    fn test_validated_replaces_oversized_parallelism() {
        let (config, problems) = CrawlConfig::new("https://example.com")
            .unwrap()
            .with_max_concurrency(usize::MAX)
            .validated();
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_empty_filters_keep_default() {
        let config = CrawlConfig::new("https://example.com")
            .unwrap()
            .with_url_filters(Vec::new());
        assert_eq!(config.url_filters.len(), 1);
    }
}
