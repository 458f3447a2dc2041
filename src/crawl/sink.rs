// src/crawl/sink.rs
// =============================================================================
// Where crawl results go.
//
// The engine doesn't print anything. It hands each classified result to a
// ResultSink, which decides how to present it (console lines, JSON, or just
// collecting them in a test).
//
// Four notifications:
// - healthy:     the link answered with a 2xx status
// - unhealthy:   the link answered with any other status
// - error:       the request never got a status; comes with a reason string
// - setup_error: something about the run itself was off (a setting replaced
//                by its default, a seed the filters reject). No request was
//                involved, so it must not read like a failed link.
// =============================================================================

use url::Url;

use super::target::{CrawlResult, Outcome};
use crate::checker::{classify, Verdict};

/// Receives classified results and error notifications from a crawl.
pub trait ResultSink {
    fn healthy(&mut self, result: &CrawlResult);
    fn unhealthy(&mut self, result: &CrawlResult, status: u16);
    fn error(&mut self, url: &str, reason: &str);
    /// A problem with the run rather than with a link. `seed` is the
    /// crawl's starting URL.
    fn setup_error(&mut self, seed: &str, reason: &str);
}

/// Classifies `result` and calls the matching sink method.
pub fn report<S: ResultSink + ?Sized>(sink: &mut S, result: &CrawlResult) -> Verdict {
    let verdict = classify(result);
    match (&result.outcome, verdict) {
        (Outcome::Status(_), Verdict::Healthy) => sink.healthy(result),
        (Outcome::Status(status), Verdict::Unhealthy) => sink.unhealthy(result, *status),
        (Outcome::Failed(reason), _) => sink.error(result.url.as_str(), reason),
    }
    verdict
}

/// A sink that keeps everything it's told, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub results: Vec<CrawlResult>,
    pub healthy: Vec<Url>,
    pub unhealthy: Vec<(Url, u16)>,
    pub errors: Vec<(String, String)>,
    pub setup_errors: Vec<(String, String)>,
}

impl ResultSink for CollectingSink {
    fn healthy(&mut self, result: &CrawlResult) {
        self.results.push(result.clone());
        self.healthy.push(result.url.clone());
    }

    fn unhealthy(&mut self, result: &CrawlResult, status: u16) {
        self.results.push(result.clone());
        self.unhealthy.push((result.url.clone(), status));
    }

    fn error(&mut self, url: &str, reason: &str) {
        self.errors.push((url.to_string(), reason.to_string()));
    }

    fn setup_error(&mut self, seed: &str, reason: &str) {
        self.setup_errors.push((seed.to_string(), reason.to_string()));
    }
}

#[cfg(test)]
impl CollectingSink {
    /// Every URL that got a status, healthy or not.
    pub fn fetched_urls(&self) -> Vec<String> {
        self.results.iter().map(|r| r.url.to_string()).collect()
    }
}
