// src/crawl/stats.rs
// =============================================================================
// Counters for one crawl run, returned when the crawl finishes.
//
// `discarded_links` counts hrefs the URL filter threw away (mailto:,
// javascript:, unparseable...). Those are never reported as errors, but the
// count shows how much of a site was skipped.
// =============================================================================

use serde::Serialize;

use crate::checker::Verdict;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    /// Targets dispatched and finished (healthy + unhealthy + failed).
    pub fetched: usize,
    pub healthy: usize,
    /// Got a non-2xx status.
    pub unhealthy: usize,
    /// Never got a status.
    pub failed: usize,
    pub discarded_links: usize,
    pub duplicate_links: usize,
    /// Fetch tasks that panicked; their targets have no result.
    pub panicked: usize,
}

impl CrawlSummary {
    pub(crate) fn record(&mut self, verdict: Verdict, has_status: bool) {
        self.fetched += 1;
        match (verdict, has_status) {
            (Verdict::Healthy, _) => self.healthy += 1,
            (Verdict::Unhealthy, true) => self.unhealthy += 1,
            (Verdict::Unhealthy, false) => self.failed += 1,
        }
    }

    /// True if any link was down or unreachable.
    pub fn has_unhealthy(&self) -> bool {
        self.unhealthy > 0 || self.failed > 0 || self.panicked > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut summary = CrawlSummary::default();
        summary.record(Verdict::Healthy, true);
        summary.record(Verdict::Unhealthy, true);
        summary.record(Verdict::Unhealthy, false);

        assert_eq!(summary.fetched, 3);
        assert_eq!(summary.healthy, 1);
        assert_eq!(summary.unhealthy, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_unhealthy());
    }

    #[test]
    fn test_all_healthy() {
        let mut summary = CrawlSummary::default();
        summary.record(Verdict::Healthy, true);
        assert!(!summary.has_unhealthy());
    }
}
