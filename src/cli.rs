// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using a
// Rust struct and attributes (the #[...] things). Every option can also be
// set through a LINK_HEALTH_* environment variable, which is handy in CI.
//
// The parsed Cli is turned into a CrawlConfig exactly once, in main.rs;
// after that the settings are frozen for the whole crawl.
// =============================================================================

use std::time::Duration;

use clap::Parser;

use crate::config::{
    CrawlConfig, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_USER_AGENT,
};
use crate::error::CrawlError;

#[derive(Parser, Debug)]
#[command(
    name = "link-health",
    version,
    about = "Crawl a website and report the health of every link",
    long_about = "link-health starts from one URL, follows the links it finds up to a \
                  fixed depth, and reports every link that does not answer with a 2xx status. \
                  It's perfect for CI/CD pipelines to catch broken links before your users do."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.com)
    ///
    /// This is a positional argument (required, no flag needed)
    pub url: String,

    /// User-Agent header sent with every request
    #[arg(long, env = "LINK_HEALTH_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Maximum recursion depth (0 = only the starting page)
    #[arg(long, env = "LINK_HEALTH_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub depth: usize,

    /// Maximum parallel requests per domain
    #[arg(long, env = "LINK_HEALTH_THREADS", default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub threads: usize,

    /// Upper bound, in milliseconds, of the random pause before each request
    #[arg(long, env = "LINK_HEALTH_DELAY_MS", default_value_t = 1000)]
    pub delay_ms: u64,

    /// Per-request timeout in seconds (at least 1)
    #[arg(
        long,
        env = "LINK_HEALTH_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Only crawl URLs matching this regex (repeatable; default: ^https?://.+$)
    #[arg(long = "filter", env = "LINK_HEALTH_FILTER")]
    pub filters: Vec<String>,

    /// Print results as JSON instead of one line per link
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Resolves the arguments into the frozen run configuration.
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::InvalidSeed` if the URL can't be parsed.
    pub fn into_config(self) -> Result<CrawlConfig, CrawlError> {
        Ok(CrawlConfig::new(&self.url)?
            .with_user_agent(self.user_agent)
            .with_max_depth(self.depth)
            .with_max_concurrency(self.threads)
            .with_random_delay(Duration::from_millis(self.delay_ms))
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
            .with_url_filters(self.filters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_URL_FILTER;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["link-health", "https://example.com"]).unwrap();
        assert!(!cli.json);

        let config = cli.into_config().unwrap();
        assert_eq!(config.seed.as_str(), "https://example.com/");
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.random_delay, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.url_filters, vec![DEFAULT_URL_FILTER.to_string()]);
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "link-health",
            "https://example.com",
            "--user-agent",
            "my-bot",
            "--depth",
            "0",
            "--threads",
            "8",
            "--delay-ms",
            "0",
            "--filter",
            "^https://example\\.com/",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);

        let config = cli.into_config().unwrap();
        assert_eq!(config.user_agent, "my-bot");
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.random_delay, Duration::ZERO);
        assert_eq!(config.url_filters, vec!["^https://example\\.com/".to_string()]);
    }

    #[test]
    fn test_missing_url_is_a_usage_error() {
        assert!(Cli::try_parse_from(["link-health"]).is_err());
    }

    #[test]
    fn test_zero_timeout_is_a_usage_error() {
        let result =
            Cli::try_parse_from(["link-health", "https://example.com", "--timeout-secs", "0"]);
        assert!(result.is_err());

        let cli =
            Cli::try_parse_from(["link-health", "https://example.com", "--timeout-secs", "1"])
                .unwrap();
        assert_eq!(cli.into_config().unwrap().request_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_bad_seed_is_an_error() {
        let cli = Cli::try_parse_from(["link-health", "not a url"]).unwrap();
        assert!(matches!(
            cli.into_config(),
            Err(CrawlError::InvalidSeed { .. })
        ));
    }
}
