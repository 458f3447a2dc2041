// src/crawl/dispatcher.rs
// =============================================================================
// Polite crawling: limits how hard we hit any single host.
//
// Two rules, applied to every domain alike:
// 1. At most `max_concurrency` requests in flight per domain. Each domain
//    gets its own tokio Semaphore, created the first time we see it.
// 2. Before each request, wait a random time between 0 and `random_delay`,
//    so a page with 50 links doesn't turn into 50 requests in one instant.
//
// When a domain is saturated, callers simply wait on its semaphore: work
// queues up, nothing is dropped.
// =============================================================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;
use url::Url;

use crate::error::CrawlError;

/// A slot on a domain. The slot is released when this is dropped.
#[derive(Debug)]
pub struct DispatchPermit {
    _permit: Option<OwnedSemaphorePermit>,
}

/// Per-domain concurrency limits plus the random pre-request delay.
#[derive(Debug)]
pub struct Dispatcher {
    max_concurrency: usize,
    random_delay: Duration,
    domains: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl Dispatcher {
    /// Creates a dispatcher allowing `max_concurrency` fetches per domain.
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::InvalidLimit` when `max_concurrency` is zero or
    /// larger than a semaphore can hold.
    pub fn new(max_concurrency: usize, random_delay: Duration) -> Result<Self, CrawlError> {
        if max_concurrency == 0 {
            return Err(CrawlError::InvalidLimit(
                "parallelism must be at least 1".to_string(),
            ));
        }
        if max_concurrency > Semaphore::MAX_PERMITS {
            return Err(CrawlError::InvalidLimit(format!(
                "parallelism must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }

        Ok(Self {
            max_concurrency,
            random_delay,
            domains: Mutex::new(HashMap::new()),
        })
    }


    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Waits for a free slot on `url`'s domain, then for the random delay.
    pub async fn acquire(&self, url: &Url) -> DispatchPermit {
        let semaphore = self.semaphore_for(domain_of(url));

        // Semaphores are never closed, so this only fails if that changes;
        // in that case the request goes ahead unthrottled
        let permit = semaphore.acquire_owned().await.ok();

        let delay = self.jitter();
        if !delay.is_zero() {
            trace!(url = %url, delay_ms = delay.as_millis() as u64, "delaying request");
            tokio::time::sleep(delay).await;
        }

        DispatchPermit { _permit: permit }
    }

    fn semaphore_for(&self, domain: &str) -> Arc<Semaphore> {
        let mut domains = self
            .domains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(
            domains
                .entry(domain.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.max_concurrency))),
        )
    }

    // Uniformly random between zero and the configured ceiling
    fn jitter(&self) -> Duration {
        let ceiling = u64::try_from(self.random_delay.as_millis()).unwrap_or(u64::MAX);
        if ceiling == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=ceiling))
    }
}

// The domain key used for limits. URLs without a host share one bucket.
fn domain_of(url: &Url) -> &str {
    url.host_str().unwrap_or_default()
}
