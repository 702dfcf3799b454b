//! Crawl frontier: the pending queue plus the set of URLs already seen
//!
//! All mutation goes through [`Frontier::enqueue_if_new`], [`Frontier::next`],
//! [`Frontier::complete`] and [`Frontier::cancel`]. The state lives behind one
//! std mutex that is never held across an await; idle workers park on a
//! [`Notify`] until work arrives or the frontier is exhausted.
//!
//! # Phases
//!
//! | Phase | Meaning |
//! |-------|---------|
//! | `Active` | tasks are pending |
//! | `Draining` | nothing pending, but tasks are still in flight |
//! | `Exhausted` | nothing pending and nothing in flight; terminal |

use crate::config::DomainPolicy;
use crate::url::{canonicalize_url, extract_domain, host_in_scope, is_document_link};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::trace;
use url::Url;

/// A URL waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// Canonical URL to fetch
    pub url: Url,

    /// Link distance from the seed (the seed has depth 0)
    pub depth: u32,

    /// Page the link was found on, if any
    pub discovered_from: Option<Url>,
}

/// Lifecycle of the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierPhase {
    Active,
    Draining,
    Exhausted,
}

/// Result of an enqueue attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The URL was new and is now pending
    Enqueued,
    /// The URL is already pending or visited
    Duplicate,
    /// The URL's host is outside the crawl scope
    OutOfScope,
    /// The URL would exceed the maximum depth
    TooDeep,
    /// The URL points at an asset rather than a page, or cannot be canonicalized
    NotDocument,
    /// The page budget has been used up
    PageBudget,
    /// The frontier was cancelled or is exhausted
    Closed,
}

/// Counters describing what the frontier saw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierStats {
    /// Every URL offered to `enqueue_if_new`
    pub offered: usize,
    /// URLs accepted into the queue
    pub enqueued: usize,
    pub duplicates: usize,
    pub out_of_scope: usize,
    pub too_deep: usize,
    pub not_document: usize,
    pub over_budget: usize,
}

#[derive(Debug)]
struct FrontierState {
    pending: VecDeque<CrawlTask>,
    seen: HashSet<String>,
    in_flight: usize,
    cancelled: bool,
    phase: FrontierPhase,
    stats: FrontierStats,
}

impl FrontierState {
    /// Recomputes the phase after a mutation; `Exhausted` is terminal
    fn refresh_phase(&mut self) {
        if self.phase == FrontierPhase::Exhausted {
            return;
        }

        self.phase = if self.in_flight == 0 && (self.pending.is_empty() || self.cancelled) {
            FrontierPhase::Exhausted
        } else if self.pending.is_empty() {
            FrontierPhase::Draining
        } else {
            FrontierPhase::Active
        };
    }

    fn is_closed(&self) -> bool {
        self.cancelled || self.phase == FrontierPhase::Exhausted
    }
}

/// Thread-safe crawl frontier with domain, depth and page-budget limits
#[derive(Debug)]
pub struct Frontier {
    seed_host: String,
    policy: DomainPolicy,
    max_depth: u32,
    max_pages: usize,
    state: Mutex<FrontierState>,
    notify: Notify,
}

impl Frontier {
    /// Creates an empty frontier scoped to `seed_host`
    pub fn new(seed_host: &str, policy: DomainPolicy, max_depth: u32, max_pages: usize) -> Self {
        Self {
            seed_host: seed_host.to_lowercase(),
            policy,
            max_depth,
            max_pages,
            state: Mutex::new(FrontierState {
                pending: VecDeque::new(),
                seen: HashSet::new(),
                in_flight: 0,
                cancelled: false,
                phase: FrontierPhase::Active,
                stats: FrontierStats::default(),
            }),
            notify: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues the seed URL at depth 0
    pub fn seed(&self, url: &Url) -> EnqueueOutcome {
        self.enqueue_if_new(url, 0, None)
    }

    /// Enqueues `url` unless it was seen before or falls outside the limits
    ///
    /// Only the first caller for a given canonical URL gets
    /// [`EnqueueOutcome::Enqueued`]; concurrent callers see `Duplicate`.
    pub fn enqueue_if_new(&self, url: &Url, depth: u32, parent: Option<&Url>) -> EnqueueOutcome {
        let canonical = canonicalize_url(url.as_str()).ok();

        let mut state = self.lock();
        state.stats.offered += 1;

        let outcome = self.admit(&mut state, canonical.as_ref(), depth);
        match outcome {
            EnqueueOutcome::Enqueued => {
                if let Some(canonical) = canonical {
                    trace!("Enqueued {} at depth {}", canonical, depth);
                    state.pending.push_back(CrawlTask {
                        url: canonical,
                        depth,
                        discovered_from: parent.cloned(),
                    });
                }
                state.stats.enqueued += 1;
                state.refresh_phase();
                drop(state);
                self.notify.notify_waiters();
            }
            EnqueueOutcome::Duplicate => state.stats.duplicates += 1,
            EnqueueOutcome::OutOfScope => state.stats.out_of_scope += 1,
            EnqueueOutcome::TooDeep => state.stats.too_deep += 1,
            EnqueueOutcome::NotDocument => state.stats.not_document += 1,
            EnqueueOutcome::PageBudget => state.stats.over_budget += 1,
            EnqueueOutcome::Closed => {}
        }

        outcome
    }

    /// Decides the outcome for a candidate and records it in `seen` when admitted
    fn admit(&self, state: &mut FrontierState, url: Option<&Url>, depth: u32) -> EnqueueOutcome {
        if state.is_closed() {
            return EnqueueOutcome::Closed;
        }

        let Some(url) = url.filter(|u| is_document_link(u)) else {
            return EnqueueOutcome::NotDocument;
        };

        let in_scope = extract_domain(url)
            .map(|host| host_in_scope(&self.seed_host, &host, self.policy))
            .unwrap_or(false);
        if !in_scope {
            return EnqueueOutcome::OutOfScope;
        }

        if depth > self.max_depth {
            return EnqueueOutcome::TooDeep;
        }

        if state.seen.contains(url.as_str()) {
            return EnqueueOutcome::Duplicate;
        }

        if state.stats.enqueued >= self.max_pages {
            return EnqueueOutcome::PageBudget;
        }

        state.seen.insert(url.to_string());
        EnqueueOutcome::Enqueued
    }

    /// Waits for the next task
    ///
    /// Returns `None` once the frontier is exhausted or cancelled. A returned
    /// task counts as in flight until [`Frontier::complete`] is called.
    pub async fn next(&self) -> Option<CrawlTask> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register interest before checking state so a wakeup between the
            // check and the await is not lost
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.cancelled {
                    return None;
                }

                if let Some(task) = state.pending.pop_front() {
                    state.in_flight += 1;
                    state.refresh_phase();
                    return Some(task);
                }

                state.refresh_phase();
                if state.phase == FrontierPhase::Exhausted {
                    drop(state);
                    self.notify.notify_waiters();
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Marks one in-flight task as finished
    pub fn complete(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.refresh_phase();
        drop(state);
        self.notify.notify_waiters();
    }

    /// Ties the completion of the task just taken from [`Frontier::next`] to a
    /// guard, so the slot is released even if processing panics
    pub fn release_on_drop(&self) -> InFlightSlot<'_> {
        InFlightSlot { frontier: self }
    }

    /// Records a URL reached through a redirect so it is never enqueued again
    ///
    /// Returns true if the URL had not been seen before.
    pub fn mark_visited(&self, url: &Url) -> bool {
        let key = canonicalize_url(url.as_str())
            .map(|u| u.to_string())
            .unwrap_or_else(|_| url.to_string());
        self.lock().seen.insert(key)
    }

    /// Stops the frontier: pending tasks are dropped, enqueues are refused and
    /// idle workers are released. In-flight tasks may still finish.
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.cancelled = true;
        state.pending.clear();
        state.refresh_phase();
        drop(state);
        self.notify.notify_waiters();
    }

    /// Current phase
    pub fn phase(&self) -> FrontierPhase {
        self.lock().phase
    }

    /// Number of tasks waiting in the queue
    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Number of tasks handed out and not yet completed
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Returns true if [`Frontier::cancel`] was called
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Snapshot of the frontier counters
    pub fn stats(&self) -> FrontierStats {
        self.lock().stats
    }
}

/// Calls [`Frontier::complete`] when dropped
#[must_use = "the slot is released as soon as the guard is dropped"]
pub struct InFlightSlot<'a> {
    frontier: &'a Frontier,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.frontier.complete();
    }
}
