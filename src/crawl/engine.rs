// src/crawl/engine.rs
// =============================================================================
// This module implements the concurrent crawl.
//
// How it works:
// 1. The seed URL becomes the first crawl task
// 2. Each task waits for a free "slot" (at most max_concurrency run at once)
// 3. It records the page in the visit registry
// 4. Only the task that saw the page first fetches it and extracts its links
// 5. Every link becomes a new task, spawned right away
// 6. The crawl is over when no task is left running or waiting
//
// Two separate counters keep this correct:
// - A Semaphore hands out the slots (bounds parallel work)
// - A TaskTracker counts tasks that exist at all (tells us when we're done)
// A parent spawns its children before it finishes, so the tracker can only
// reach zero once nothing more can be discovered.
//
// Boundaries:
// - Links to other hosts are counted but never fetched
// - Once more than max_pages distinct pages are known, new tasks stop early
//   (a soft limit: tasks that already passed the check still finish)
// =============================================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, trace, warn};
use url::Url;

use super::config::CrawlConfig;
use super::registry::VisitRegistry;
use crate::error::CrawlError;
use crate::fetch::Fetcher;
use crate::links::{extract_links, normalize_url, NormalizedUrl};

// One "visit this URL" unit of work
#[derive(Debug, Clone)]
struct CrawlTask {
    url: String,
    depth: usize, // How many links away from the seed (only used for logging)
}

// Where a task is in its life, logged at trace level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Pending,
    Admitted,
    Normalizing,
    ExternalRecorded,
    Fetching,
    Extracting,
    Spawning,
    Done,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Pending => "pending",
            TaskState::Admitted => "admitted",
            TaskState::Normalizing => "normalizing",
            TaskState::ExternalRecorded => "external_recorded",
            TaskState::Fetching => "fetching",
            TaskState::Extracting => "extracting",
            TaskState::Spawning => "spawning",
            TaskState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Counters describing what happened during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Pages downloaded successfully
    pub pages_fetched: usize,
    /// Pages whose download failed (network error or non-2xx status)
    pub fetch_failures: usize,
    /// Tasks dropped because the page budget was already exceeded
    pub skipped_over_budget: usize,
    /// Links to other hosts (counted, never fetched)
    pub external_links: usize,
}

#[derive(Debug, Default)]
struct StatsCounters {
    pages_fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    skipped_over_budget: AtomicUsize,
    external_links: AtomicUsize,
}

impl StatsCounters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            skipped_over_budget: self.skipped_over_budget.load(Ordering::Relaxed),
            external_links: self.external_links.load(Ordering::Relaxed),
        }
    }
}

/// The result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Every page seen and how many times it was linked
    pub pages: HashMap<NormalizedUrl, usize>,
    pub stats: CrawlStats,
}

/// Crawls one website, starting from the configured base URL
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Fetcher,
    cancel: CancellationToken,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = Fetcher::new(config.timeout())
            .map_err(|e| CrawlError::InvalidConfig(format!("couldn't build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            fetcher,
            cancel: CancellationToken::new(),
        })
    }

    /// Stops the crawl early once `token` is cancelled.
    ///
    /// Tasks waiting for a slot give up; running tasks finish their current
    /// step but fetch nothing new and spawn no children.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    // Runs the crawl to completion
    //
    // Returns: every page seen with its link count, plus run statistics
    pub async fn run(self) -> CrawlOutcome {
        let seed = self.config.base_url().to_string();

        let shared = Arc::new(Shared {
            slots: Semaphore::new(self.config.max_concurrency().min(Semaphore::MAX_PERMITS)),
            config: self.config,
            registry: VisitRegistry::new(),
            tracker: TaskTracker::new(),
            fetcher: self.fetcher,
            cancel: self.cancel,
            stats: StatsCounters::default(),
        });

        info!(
            seed = %seed,
            max_concurrency = shared.config.max_concurrency(),
            max_pages = shared.config.max_pages(),
            "starting crawl"
        );

        shared.spawn(CrawlTask { url: seed, depth: 0 });

        // Closing only means "wait() may now finish"; running tasks can
        // still spawn children on a closed tracker.
        shared.tracker.close();
        shared.tracker.wait().await;

        if shared.registry.is_empty() {
            warn!("crawl ended before the seed page was visited");
        }

        let outcome = CrawlOutcome {
            pages: shared.registry.snapshot(),
            stats: shared.stats.snapshot(),
        };

        info!(
            pages = outcome.pages.len(),
            fetched = outcome.stats.pages_fetched,
            failed = outcome.stats.fetch_failures,
            "crawl finished"
        );

        outcome
    }
}

// State shared by every task of one run
struct Shared {
    config: CrawlConfig,
    registry: VisitRegistry,
    slots: Semaphore,
    tracker: TaskTracker,
    fetcher: Fetcher,
    cancel: CancellationToken,
    stats: StatsCounters,
}

impl Shared {
    // Registers a task with the tracker and starts it
    fn spawn(self: &Arc<Self>, task: CrawlTask) {
        trace!(url = %task.url, state = %TaskState::Pending);
        self.tracker.spawn(Arc::clone(self).crawl_page(task));
    }

    // The body of one task
    //
    // Returns a boxed future because crawl_page spawns more crawl_page
    // futures, and a recursive async fn can't name its own type.
    fn crawl_page(self: Arc<Self>, task: CrawlTask) -> BoxFuture<'static, ()> {
        async move {
            // None when the run is cancelled or the semaphore is closed
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                permit = self.slots.acquire() => permit.ok(),
            };

            if let Some(permit) = permit {
                trace!(url = %task.url, state = %TaskState::Admitted);
                self.visit(&task).await;
                // The slot is held until children are spawned
                drop(permit);
            }

            trace!(url = %task.url, state = %TaskState::Done);
        }
        .boxed()
    }

    // Everything a task does while holding a slot. Every early return is a
    // local, silent (logged) failure: siblings and the run are unaffected.
    async fn visit(self: &Arc<Self>, task: &CrawlTask) {
        if self.cancel.is_cancelled() {
            return;
        }

        if self.registry.len() > self.config.max_pages() {
            StatsCounters::bump(&self.stats.skipped_over_budget);
            debug!(url = %task.url, "page budget exceeded, skipping");
            return;
        }

        let url = match Url::parse(&task.url) {
            Ok(url) => url,
            Err(e) => {
                debug!(url = %task.url, error = %e, "couldn't parse link");
                return;
            }
        };

        trace!(url = %task.url, state = %TaskState::Normalizing);

        // Other hosts are tallied as link targets but never fetched
        if !self.config.is_same_host(&url) {
            if let Ok(key) = normalize_url(url.as_str()) {
                self.registry.record_visit(key);
                StatsCounters::bump(&self.stats.external_links);
            }
            trace!(url = %task.url, state = %TaskState::ExternalRecorded);
            return;
        }

        let key = match normalize_url(&task.url) {
            Ok(key) => key,
            Err(e) => {
                debug!(url = %task.url, error = %e, "couldn't normalize link");
                return;
            }
        };

        // Only the first sighting fetches; this is what stops link cycles
        if !self.registry.record_visit(key.clone()) {
            debug!(
                url = %task.url,
                seen = self.registry.count(key.as_str()).unwrap_or(0),
                "already visited"
            );
            return;
        }

        if self.cancel.is_cancelled() {
            return;
        }

        trace!(url = %task.url, state = %TaskState::Fetching);
        info!("Crawling [depth {}]: {}", task.depth, task.url);

        let html = match self.fetcher.fetch(&task.url).await {
            Ok(html) => {
                StatsCounters::bump(&self.stats.pages_fetched);
                html
            }
            Err(e) => {
                StatsCounters::bump(&self.stats.fetch_failures);
                warn!(error = %e, "failed to fetch page");
                return;
            }
        };

        trace!(url = %task.url, state = %TaskState::Extracting);
        let links = match extract_links(&html, &task.url) {
            Ok(links) => links,
            Err(e) => {
                debug!(url = %task.url, error = %e, "couldn't extract links");
                return;
            }
        };

        if self.cancel.is_cancelled() {
            return;
        }

        trace!(url = %task.url, state = %TaskState::Spawning, links = links.len());
        for link in links {
            self.spawn(CrawlTask {
                url: link,
                depth: task.depth + 1,
            });
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why not one counter for both slots and completion?
//    - If a task had to hold its slot until all its children finished, a page
//      with more links than slots would wait forever on children that can
//      never get a slot
//    - Keeping "may run now" (Semaphore) apart from "still exists"
//      (TaskTracker) avoids that deadlock
//
// 2. What does `biased;` do in tokio::select!?
//    - Branches are polled top to bottom instead of at random
//    - A cancelled run never hands out another slot
//
// 3. Why is the registry check-and-insert one call?
//    - Two tasks can hold links to the same page at the same time
//    - If "is it new?" and "insert it" were separate lock sections, both
//      could see it as new and both would fetch it
// -----------------------------------------------------------------------------
