//! Crawler module for fetching and collecting documentation pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry and redirect handling
//! - The shared frontier with deduplication and scope limits
//! - Per-host politeness delays
//! - Overall crawl coordination across a worker pool

mod coordinator;
mod fetcher;
mod frontier;
mod politeness;

pub use coordinator::Crawler;
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, RequestGate};
pub use frontier::{
    CrawlTask, EnqueueOutcome, Frontier, FrontierPhase, FrontierStats, InFlightSlot,
};
pub use politeness::Politeness;

use crate::extract::NormalizedDocument;
use crate::output::CrawlStats;
use crate::state::PageState;
use std::collections::BTreeMap;
use url::Url;

/// A page that was attempted but did not produce a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFailure {
    pub url: Url,
    pub state: PageState,
    pub reason: String,
}

/// Everything a crawl produced
///
/// Documents are keyed by canonical URL, so iteration order is by URL and
/// never depends on fetch order.
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// Canonical seed URL
    pub seed: Url,
    pub documents: BTreeMap<String, NormalizedDocument>,
    /// Failed pages, sorted by URL
    pub failures: Vec<CrawlFailure>,
    pub stats: CrawlStats,
    /// True when the crawl stopped early because of cancellation or a deadline
    pub cancelled: bool,
}

impl CrawlResult {
    /// Looks up a document by canonical URL
    pub fn document(&self, url: &str) -> Option<&NormalizedDocument> {
        self.documents.get(url)
    }

    /// Splits the result into its documents (in URL order) and the rest
    pub fn into_parts(self) -> (Vec<NormalizedDocument>, Vec<CrawlFailure>, CrawlStats) {
        (
            self.documents.into_values().collect(),
            self.failures,
            self.stats,
        )
    }
}
