//! Crawler coordinator - main crawl orchestration logic
//!
//! A fixed pool of workers drains the shared [`Frontier`]. For every task a
//! worker:
//! 1. Checks robots.txt for the task's origin
//! 2. Fetches the page, waiting for the host's politeness slot before every
//!    request and refusing redirects that leave the crawl scope
//! 3. Extracts a document and stores it under its canonical URL
//! 4. Enqueues the document's links at depth + 1
//!
//! Per-page failures are collected and never stop the crawl. Cancellation
//! closes the frontier; in-flight pages finish and the partial result is
//! returned.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, Fetcher, RequestGate};
use crate::crawler::frontier::{CrawlTask, EnqueueOutcome, Frontier};
use crate::crawler::politeness::Politeness;
use crate::crawler::{CrawlFailure, CrawlResult};
use crate::extract::{extract_bytes, NormalizedDocument};
use crate::output::CrawlStats;
use crate::robots::RobotsCache;
use crate::state::PageState;
use crate::url::{canonicalize_url, extract_domain, host_in_scope};
use crate::{AtlasError, UrlError};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

/// How often (in completed pages) progress is logged
const PROGRESS_INTERVAL: usize = 10;

/// Main crawler structure
///
/// A `Crawler` can run several crawls; each one gets its own frontier, robots
/// cache and politeness state.
#[derive(Debug, Clone)]
pub struct Crawler {
    config: Arc<Config>,
    fetcher: Fetcher,
}

impl Crawler {
    /// Creates a crawler, building the HTTP client from the configuration
    pub fn new(config: Config) -> Result<Self, AtlasError> {
        let client = build_http_client(&config.user_agent, &config.fetch)?;
        let fetcher = Fetcher::new(client, config.fetch.clone());
        Ok(Self {
            config: Arc::new(config),
            fetcher,
        })
    }

    /// Crawls from `seed` until the frontier is exhausted or the configured
    /// deadline passes
    pub async fn crawl(&self, seed: &Url) -> Result<CrawlResult, AtlasError> {
        self.crawl_with_cancel(seed, CancellationToken::new()).await
    }

    /// Crawls from `seed`, stopping early when `cancel` fires
    ///
    /// Only an unusable seed URL is an error; a cancelled crawl returns the
    /// documents gathered so far with `cancelled` set.
    pub async fn crawl_with_cancel(
        &self,
        seed: &Url,
        cancel: CancellationToken,
    ) -> Result<CrawlResult, AtlasError> {
        let seed = canonicalize_url(seed.as_str())?;
        let seed_host = extract_domain(&seed).ok_or(UrlError::MissingDomain)?;
        let crawler_config = &self.config.crawler;

        info!(
            "Starting crawl of {} (max depth {}, max pages {}, {} workers)",
            seed, crawler_config.max_depth, crawler_config.max_pages, crawler_config.concurrency
        );

        let frontier = Arc::new(Frontier::new(
            &seed_host,
            crawler_config.domain_policy,
            crawler_config.max_depth,
            crawler_config.max_pages,
        ));
        frontier.seed(&seed);

        let context = Arc::new(CrawlContext {
            config: self.config.clone(),
            seed_host,
            frontier: frontier.clone(),
            fetcher: self.fetcher.clone(),
            robots: RobotsCache::new(self.fetcher.client().clone()),
            politeness: Politeness::new(Duration::from_millis(crawler_config.politeness_delay_ms)),
            documents: Mutex::new(BTreeMap::new()),
            failures: Mutex::new(Vec::new()),
            stats: Mutex::new(CrawlStats::default()),
            started: Instant::now(),
        });

        let stop = cancel.child_token();
        let done = CancellationToken::new();
        let watcher = tokio::spawn(watch_for_stop(
            frontier.clone(),
            stop.clone(),
            done.clone(),
            crawler_config.max_duration_secs.map(Duration::from_secs),
        ));

        let mut workers = JoinSet::new();
        for worker_id in 0..crawler_config.concurrency {
            let context = context.clone();
            workers.spawn(async move { run_worker(worker_id, context).await });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!("Crawl worker failed: {}", e);
            }
        }

        done.cancel();
        if let Err(e) = watcher.await {
            error!("Cancellation watcher failed: {}", e);
        }

        let cancelled = stop.is_cancelled();
        let result = context.into_result(seed, cancelled);

        info!(
            "Crawl {}: {} pages processed, {} failed, {} links discovered in {:.1}s",
            if cancelled { "cancelled" } else { "completed" },
            result.stats.pages_processed,
            result.stats.pages_failed,
            result.stats.links_discovered,
            result.stats.elapsed_ms as f64 / 1000.0
        );

        Ok(result)
    }
}

/// Closes the frontier when the caller cancels or the deadline passes
async fn watch_for_stop(
    frontier: Arc<Frontier>,
    stop: CancellationToken,
    done: CancellationToken,
    deadline: Option<Duration>,
) {
    let deadline = async {
        match deadline {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = done.cancelled() => return,
        _ = stop.cancelled() => {
            info!("Crawl cancelled, letting in-flight pages finish");
        }
        _ = deadline => {
            info!("Crawl deadline reached, letting in-flight pages finish");
            stop.cancel();
        }
    }

    frontier.cancel();
}

async fn run_worker(worker_id: usize, context: Arc<CrawlContext>) {
    debug!("Worker {} started", worker_id);
    while let Some(task) = context.frontier.next().await {
        let _slot = context.frontier.release_on_drop();
        context.process(&task).await;
    }
    debug!("Worker {} finished", worker_id);
}

/// State shared by all workers of one crawl
struct CrawlContext {
    config: Arc<Config>,
    seed_host: String,
    frontier: Arc<Frontier>,
    fetcher: Fetcher,
    robots: RobotsCache,
    politeness: Politeness,
    documents: Mutex<BTreeMap<String, NormalizedDocument>>,
    failures: Mutex<Vec<CrawlFailure>>,
    stats: Mutex<CrawlStats>,
    started: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CrawlContext {
    async fn process(&self, task: &CrawlTask) {
        lock(&self.stats).pages_attempted += 1;
        debug!("Processing {} (depth {})", task.url, task.depth);

        let host = extract_domain(&task.url).unwrap_or_default();

        if self.config.crawler.respect_robots {
            let robots = self
                .robots
                .get_with(&task.url, || self.politeness.wait_turn(&host))
                .await;
            let agent = &self.config.user_agent.crawler_name;
            self.politeness.set_crawl_delay(&host, robots.crawl_delay(agent));

            if !robots.is_allowed(task.url.as_str(), agent) {
                info!("Blocked by robots.txt: {}", task.url);
                self.record_failure(&task.url, PageState::RobotsDenied, "disallowed by robots.txt");
                return;
            }
        }

        let policy = self.config.crawler.domain_policy;
        let in_scope = |url: &Url| {
            extract_domain(url).is_some_and(|h| host_in_scope(&self.seed_host, &h, policy))
        };
        let gate = RequestGate {
            politeness: &self.politeness,
            in_scope: &in_scope,
        };

        let page = match self.fetcher.fetch_gated(&task.url, Some(&gate)).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Failed to fetch {}: {}", task.url, e);
                self.record_failure(&task.url, e.page_state(), &e.to_string());
                return;
            }
        };

        let final_url = canonicalize_url(page.final_url.as_str()).unwrap_or(page.final_url);
        if final_url != task.url && !self.frontier.mark_visited(&final_url) {
            debug!("{} redirected to already seen {}", task.url, final_url);
            lock(&self.stats).pages_duplicate += 1;
            return;
        }

        let document = match extract_bytes(&page.body, &final_url) {
            Ok(doc) => doc.with_fetch_status(page.status, &page.content_type),
            Err(e) => {
                warn!("Failed to extract {}: {}", final_url, e);
                self.record_failure(&task.url, PageState::ParseFailed, &e.to_string());
                return;
            }
        };

        self.enqueue_links(&document, task);
        self.store(document);
    }

    fn enqueue_links(&self, document: &NormalizedDocument, task: &CrawlTask) {
        let discovered = document.outbound_links.len();
        let mut enqueued = 0;

        if task.depth < self.config.crawler.max_depth {
            for link in &document.outbound_links {
                if self.frontier.enqueue_if_new(link, task.depth + 1, Some(&document.url))
                    == EnqueueOutcome::Enqueued
                {
                    enqueued += 1;
                }
            }
        }

        debug!(
            "{}: {} links found, {} new",
            document.url, discovered, enqueued
        );
        lock(&self.stats).links_discovered += discovered;
    }

    /// Inserts a document unless its URL is already stored
    fn store(&self, document: NormalizedDocument) {
        let key = document.url.to_string();
        let inserted = match lock(&self.documents).entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(document);
                true
            }
            Entry::Occupied(slot) => {
                debug!("Already stored {}, skipping duplicate", slot.key());
                false
            }
        };

        let mut stats = lock(&self.stats);
        if !inserted {
            stats.pages_duplicate += 1;
            return;
        }

        stats.pages_processed += 1;
        if stats.pages_processed % PROGRESS_INTERVAL == 0 {
            let elapsed = self.started.elapsed().as_secs_f64();
            info!(
                "Progress: {} pages processed, {} failed, {} in frontier, {:.2} pages/sec",
                stats.pages_processed,
                stats.pages_failed,
                self.frontier.pending_len(),
                stats.pages_processed as f64 / elapsed.max(f64::EPSILON)
            );
        }
    }

    fn record_failure(&self, url: &Url, state: PageState, reason: &str) {
        lock(&self.failures).push(CrawlFailure {
            url: url.clone(),
            state,
            reason: reason.to_string(),
        });
        lock(&self.stats).record_failure(state);
    }

    fn into_result(self: Arc<Self>, seed: Url, cancelled: bool) -> CrawlResult {
        let documents = std::mem::take(&mut *lock(&self.documents));
        let mut failures = std::mem::take(&mut *lock(&self.failures));
        failures.sort_by(|a, b| a.url.cmp(&b.url));

        let mut stats = lock(&self.stats).clone();
        stats.links_enqueued = self.frontier.stats().enqueued;
        stats.elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);

        CrawlResult {
            seed,
            documents,
            failures,
            stats,
            cancelled,
        }
    }
}
