//! Per-host robots.txt cache
//!
//! Every host gets a single `OnceCell`, so concurrent workers asking for the
//! same host wait on one fetch instead of issuing several. The map lock is only
//! held long enough to look up or insert the cell.

use crate::robots::{fetch_robots, ParsedRobots};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::info;
use url::Url;

type Slot = Arc<OnceCell<Arc<ParsedRobots>>>;

/// Caches parsed robots.txt files for the duration of one crawl
#[derive(Debug)]
pub struct RobotsCache {
    client: reqwest::Client,
    entries: Mutex<HashMap<String, Slot>>,
}

impl RobotsCache {
    /// Creates an empty cache that fetches with the given client
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the robots.txt rules for the origin of `url`, fetching them on
    /// first use
    pub async fn get(&self, url: &Url) -> Arc<ParsedRobots> {
        self.get_with(url, || async {}).await
    }

    /// Like [`RobotsCache::get`], awaiting `before_fetch` right before the
    /// robots.txt request; it is not called when the rules are cached
    pub async fn get_with<F, Fut>(&self, url: &Url, before_fetch: F) -> Arc<ParsedRobots>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let key = url.origin().ascii_serialization();
        let slot = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.entry(key.clone()).or_default().clone()
        };

        slot.get_or_init(|| async {
            before_fetch().await;
            let robots = fetch_robots(&self.client, url).await;
            info!("Loaded robots.txt for {}", key);
            Arc::new(robots)
        })
        .await
        .clone()
    }

    /// Inserts rules for an origin directly, replacing any cached entry
    pub fn insert(&self, url: &Url, robots: ParsedRobots) {
        let key = url.origin().ascii_serialization();
        let cell = OnceCell::new_with(Some(Arc::new(robots)));
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, Arc::new(cell));
    }

    /// Number of origins with an entry in the cache
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no origin has been looked up yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
