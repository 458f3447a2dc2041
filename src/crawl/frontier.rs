// src/crawl/frontier.rs
// =============================================================================
// The frontier remembers every URL a crawl has seen and queues the new ones.
//
// How it works:
// - `admit(url, depth)` locks the visited set, inserts the URL, and only if
//   the insert was new pushes a CrawlTarget onto the work queue
// - Because "check" and "insert" happen under one lock, two pages that link
//   to the same URL at the same moment can't both schedule it
// - The queue is unbounded: when all workers are busy new targets wait here
// - `claim(url)` is the same check-and-insert without the queueing; redirect
//   hops use it, since the task that saw the redirect fetches the target
//
// Each crawl run creates its own Frontier, so two crawls in the same process
// never share visited URLs.
// =============================================================================

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use url::Url;

use super::target::CrawlTarget;

/// Dedup set plus the sending half of the work queue.
#[derive(Debug)]
pub struct Frontier {
    visited: Mutex<HashSet<String>>,
    queue: UnboundedSender<CrawlTarget>,
    duplicates: AtomicUsize,
}

impl Frontier {
    /// Creates an empty frontier and the receiver the engine pulls work from.
    pub fn new() -> (Self, UnboundedReceiver<CrawlTarget>) {
        let (queue, receiver) = mpsc::unbounded_channel();
        let frontier = Self {
            visited: Mutex::new(HashSet::new()),
            queue,
            duplicates: AtomicUsize::new(0),
        };
        (frontier, receiver)
    }

    /// Records `url` and queues it at `depth` if it hasn't been seen this run.
    ///
    /// Returns false (and queues nothing) for a URL seen before. The caller
    /// checks `depth` against the configured maximum before calling.
    pub fn admit(&self, url: Url, depth: usize) -> bool {
        if !self.claim(&url) {
            return false;
        }

        // The receiver lives as long as the crawl loop; if it is gone the
        // crawl is over and there is nobody left to fetch this anyway
        self.queue.send(CrawlTarget { url, depth }).is_ok()
    }

    /// Marks `url` as visited without queueing it.
    ///
    /// Used for redirect hops: the task following the redirect fetches the
    /// URL itself. Returns false if the URL was already seen this run.
    pub fn claim(&self, url: &Url) -> bool {
        let is_new = {
            // A poisoned lock only means another task panicked mid-insert;
            // the set itself is still valid
            let mut visited = self
                .visited
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            visited.insert(url.as_str().to_string())
        };

        if !is_new {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
        }
        is_new
    }

    /// Number of distinct URLs admitted so far.
    pub fn visited_count(&self) -> usize {
        self.visited
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Number of admissions rejected as duplicates.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(address: &str) -> Url {
        Url::parse(address).unwrap()
    }

    #[test]
    fn test_admit_once() {
        let (frontier, mut receiver) = Frontier::new();

        assert!(frontier.admit(url("https://example.com/a"), 0));
        assert!(!frontier.admit(url("https://example.com/a"), 1));

        let target = receiver.try_recv().unwrap();
        assert_eq!(target.url.as_str(), "https://example.com/a");
        assert_eq!(target.depth, 0);
        assert!(receiver.try_recv().is_err());

        assert_eq!(frontier.visited_count(), 1);
        assert_eq!(frontier.duplicate_count(), 1);
    }

    #[test]
    fn test_claim_marks_visited_without_queueing() {
        let (frontier, mut receiver) = Frontier::new();

        assert!(frontier.claim(&url("https://example.com/new")));
        assert!(receiver.try_recv().is_err());

        // Once claimed by a redirect, a direct link is a duplicate
        assert!(!frontier.admit(url("https://example.com/new"), 1));
        assert!(!frontier.claim(&url("https://example.com/new")));
        assert_eq!(frontier.duplicate_count(), 2);
    }

    #[test]
    fn test_distinct_urls_are_all_queued() {
        let (frontier, mut receiver) = Frontier::new();

        assert!(frontier.admit(url("https://example.com/a"), 1));
        assert!(frontier.admit(url("https://example.com/b"), 1));
        assert!(frontier.admit(url("https://other.org/a"), 2));

        let mut queued = Vec::new();
        while let Ok(target) = receiver.try_recv() {
            queued.push(target.url.to_string());
        }
        assert_eq!(
            queued,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://other.org/a"
            ]
        );
    }

    #[test]
    fn test_separate_frontiers_do_not_share_state() {
        let (first, _first_rx) = Frontier::new();
        let (second, _second_rx) = Frontier::new();

        assert!(first.admit(url("https://example.com/"), 0));
        assert!(second.admit(url("https://example.com/"), 0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_admits_queue_exactly_once() {
        let (frontier, mut receiver) = Frontier::new();
        let frontier = Arc::new(frontier);

        let attempts = (0..64).map(|i| {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.admit(url("https://example.com/shared"), i % 3) })
        });
        let admitted = futures::future::join_all(attempts)
            .await
            .into_iter()
            .map(Result::unwrap)
            .filter(|admitted| *admitted)
            .count();

        assert_eq!(admitted, 1);
        assert!(receiver.try_recv().is_ok());
        assert!(receiver.try_recv().is_err());
        assert_eq!(frontier.duplicate_count(), 63);
    }
}
