//! Per-host request spacing
//!
//! Workers call [`Politeness::wait_turn`] before every request. Slots are
//! reserved under a short lock and the caller sleeps afterwards, so no lock is
//! held while waiting.

use crate::state::HostState;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::trace;

/// Enforces a minimum delay between requests to the same host
#[derive(Debug)]
pub struct Politeness {
    base_delay: Duration,
    hosts: Mutex<HashMap<String, HostState>>,
}

impl Politeness {
    /// Creates a limiter with the configured politeness delay
    pub fn new(base_delay: Duration) -> Self {
        Self {
            base_delay,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, HostState>> {
        self.hosts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the robots.txt crawl-delay for a host
    pub fn set_crawl_delay(&self, host: &str, delay: Option<Duration>) {
        self.lock().entry(host.to_string()).or_default().crawl_delay = delay;
    }

    /// Waits until a request to `host` is allowed
    pub async fn wait_turn(&self, host: &str) {
        let wait = self
            .lock()
            .entry(host.to_string())
            .or_default()
            .reserve_slot(self.base_delay, Instant::now());

        if !wait.is_zero() {
            trace!("Waiting {:?} before next request to {}", wait, host);
            tokio::time::sleep(wait).await;
        }
    }

    /// Number of requests issued to a host so far
    pub fn request_count(&self, host: &str) -> u32 {
        self.lock().get(host).map_or(0, |s| s.request_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_does_not_wait() {
        let politeness = Politeness::new(Duration::from_secs(5));
        let start = Instant::now();
        politeness.wait_turn("example.com").await;
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(politeness.request_count("example.com"), 1);
    }

    #[tokio::test]
    async fn test_second_request_is_delayed() {
        let politeness = Politeness::new(Duration::from_millis(100));
        let start = Instant::now();
        politeness.wait_turn("example.com").await;
        politeness.wait_turn("example.com").await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_hosts_are_independent() {
        let politeness = Politeness::new(Duration::from_secs(5));
        let start = Instant::now();
        politeness.wait_turn("a.example.com").await;
        politeness.wait_turn("b.example.com").await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_crawl_delay_extends_spacing() {
        let politeness = Politeness::new(Duration::ZERO);
        politeness.set_crawl_delay("example.com", Some(Duration::from_millis(150)));
        let start = Instant::now();
        politeness.wait_turn("example.com").await;
        politeness.wait_turn("example.com").await;
        assert!(start.elapsed() >= Duration::from_millis(150));
    }
}
