// src/crawl/engine.rs
// =============================================================================
// The crawl loop: ties the frontier, dispatcher, fetcher and classifier
// together.
//
// How it works:
// 1. Admit the seed URL to the frontier at depth 0
// 2. Every queued CrawlTarget becomes a tokio task. The task waits for the
//    dispatcher (per-domain slot + random delay), fetches the page, and if
//    the page is HTML and we're not at max depth, admits every link on it
//    at depth + 1
// 3. Each task returns exactly one CrawlResult. The loop below is the only
//    consumer: it classifies results and hands them to the sink
// 4. The crawl is over when the queue is empty and no task is running
//
// Why is step 4 safe? A task admits its children *before* it finishes.
// So if we drain the queue and then find no running task, nobody can add
// anything anymore.
//
// Termination on cyclic sites comes from two limits working together: the
// frontier never queues a URL twice, and nothing beyond max_depth is ever
// admitted.
//
// Redirects are followed here, hop by hop, and every hop is claimed in the
// frontier like a discovered link. A redirect to a URL the run has already
// seen is not followed: that URL is (or was) fetched by its own task, and
// this link is reported with its 3xx status.
// =============================================================================

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use url::Url;

use super::dispatcher::Dispatcher;
use super::filter::UrlFilter;
use super::frontier::Frontier;
use super::sink::{report, ResultSink};
use super::stats::CrawlSummary;
use super::target::{CrawlResult, CrawlTarget, Outcome};
use crate::checker::{extract_hrefs, Page, PageFetcher};
use crate::config::CrawlConfig;
use crate::error::{CrawlError, FetchError, FetchErrorKind};

/// Reported when the seed itself fails the URL filter.
const SEED_FILTERED_REASON: &str = "URL does not match the accepted URL filters";

/// Redirect hops followed for one link before it counts as failed.
const MAX_REDIRECTS: usize = 10;

/// Runs crawls with a given configuration and page fetcher.
pub struct Crawler<F> {
    config: Arc<CrawlConfig>,
    fetcher: Arc<F>,
    // Settings replaced by defaults, reported at the start of every run
    config_problems: Vec<String>,
}

// Everything a fetch task needs, shared by all tasks of one run
struct RunContext<F> {
    config: Arc<CrawlConfig>,
    fetcher: Arc<F>,
    filter: UrlFilter,
    frontier: Frontier,
    dispatcher: Dispatcher,
}

// What a finished task hands back to the loop
struct Visit {
    result: CrawlResult,
    discarded: usize,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(config: CrawlConfig, fetcher: F) -> Self {
        let (config, problems) = config.validated();
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            config_problems: problems.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawls from the configured seed until no work is left.
    ///
    /// Every fetched URL is reported to `sink` exactly once. Problems with
    /// individual links never stop the crawl.
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::InvalidFilter` if a URL filter pattern does not
    /// compile. Nothing has been fetched in that case.
    /// `CrawlError::InvalidLimit` can't happen for a config that went
    /// through `Crawler::new`.
    pub async fn run<S: ResultSink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<CrawlSummary, CrawlError> {
        let seed = self.config.seed.clone();
        let filter = UrlFilter::new(self.config.url_filters.as_slice())?;

        let dispatcher = Dispatcher::new(self.config.max_concurrency, self.config.random_delay)?;

        for problem in &self.config_problems {
            sink.setup_error(seed.as_str(), problem);
        }

        let (frontier, mut queue) = Frontier::new();
        let run = Arc::new(RunContext {
            config: Arc::clone(&self.config),
            fetcher: Arc::clone(&self.fetcher),
            filter,
            frontier,
            dispatcher,
        });

        let mut summary = CrawlSummary::default();

        let Some(start) = run.filter.normalize(None, seed.as_str()) else {
            warn!(url = %seed, "seed URL rejected by filter");
            sink.setup_error(seed.as_str(), SEED_FILTERED_REASON);
            return Ok(summary);
        };

        info!(
            url = %start,
            max_depth = run.config.max_depth,
            parallelism = run.dispatcher.max_concurrency(),
            "starting crawl"
        );
        run.frontier.admit(start, 0);

        let mut tasks = JoinSet::new();
        loop {
            while let Ok(target) = queue.try_recv() {
                let run = Arc::clone(&run);
                tasks.spawn(async move { run.visit(target).await });
            }

            match tasks.join_next().await {
                Some(Ok(visit)) => {
                    let verdict = report(sink, &visit.result);
                    summary.record(verdict, visit.result.status().is_some());
                    summary.discarded_links += visit.discarded;
                }
                Some(Err(e)) => {
                    // A panicking fetch must not take its siblings down
                    error!(error = %e, "fetch task failed");
                    summary.panicked += 1;
                }
                None => break,
            }
        }

        summary.duplicate_links = run.frontier.duplicate_count();
        info!(
            visited = run.frontier.visited_count(),
            fetched = summary.fetched,
            healthy = summary.healthy,
            unhealthy = summary.unhealthy,
            failed = summary.failed,
            discarded = summary.discarded_links,
            "crawl finished"
        );

        Ok(summary)
    }
}

impl<F: PageFetcher> RunContext<F> {
    async fn visit(&self, target: CrawlTarget) -> Visit {
        match self.fetch_following_redirects(&target.url).await {
            Ok(page) => {
                let discarded = if target.depth < self.config.max_depth {
                    self.discover(&target, &page)
                } else {
                    0
                };
                Visit {
                    result: CrawlResult {
                        url: target.url,
                        depth: target.depth,
                        outcome: Outcome::Status(page.status),
                    },
                    discarded,
                }
            }
            Err(e) => {
                debug!(url = %target.url, error = %e, "request failed");
                Visit {
                    result: CrawlResult {
                        url: target.url,
                        depth: target.depth,
                        outcome: Outcome::Failed(e.reason().to_string()),
                    },
                    discarded: 0,
                }
            }
        }
    }

    // Fetches `start`, then each redirect hop the frontier lets us claim.
    // Returns the last page fetched, which may itself be a redirect.
    async fn fetch_following_redirects(&self, start: &Url) -> Result<Page, FetchError> {
        let mut url = start.clone();
        let mut hops = 0;

        loop {
            let page = {
                // The permit is held only while the request is in flight
                let _permit = self.dispatcher.acquire(&url).await;
                self.fetcher.fetch(&url).await?
            };

            let Some(next) = redirect_target(&page) else {
                return Ok(page);
            };
            if hops == MAX_REDIRECTS {
                return Err(FetchError::new(
                    FetchErrorKind::Redirect,
                    format!("too many redirects (more than {MAX_REDIRECTS})"),
                ));
            }
            if !self.frontier.claim(&next) {
                debug!(from = %page.url, to = %next, "redirect target already visited");
                return Ok(page);
            }

            debug!(from = %page.url, to = %next, "following redirect");
            hops += 1;
            url = next;
        }
    }

    // Admits the page's links one level deeper; returns how many were
    // thrown away by the filter
    fn discover(&self, target: &CrawlTarget, page: &Page) -> usize {
        let Some(body) = page.body.as_deref().filter(|_| page.is_html()) else {
            return 0;
        };

        let mut discarded = 0;
        for href in extract_hrefs(body) {
            match self.filter.normalize(Some(&page.url), &href) {
                Some(url) => {
                    self.frontier.admit(url, target.depth + 1);
                }
                None => {
                    debug!(page = %target.url, href = %href, "discarding link");
                    discarded += 1;
                }
            }
        }
        discarded
    }
}

// Where a redirect points, if it's an http(s) URL we can fetch
fn redirect_target(page: &Page) -> Option<Url> {
    let location = page.redirect_location()?;
    let mut next = page.url.join(location.trim()).ok()?;
    next.set_fragment(None);
    matches!(next.scheme(), "http" | "https").then_some(next)
}
