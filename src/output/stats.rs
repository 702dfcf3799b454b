//! Crawl statistics
//!
//! Counters collected during a crawl and a plain-text printer for the CLI.

use crate::state::PageState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// URLs taken from the frontier and attempted
    pub pages_attempted: usize,

    /// Pages fetched and extracted into documents
    pub pages_processed: usize,

    /// Pages that ended in a failure state
    pub pages_failed: usize,

    /// Fetched pages whose final URL had already been stored through a redirect
    pub pages_duplicate: usize,

    /// Count of failed pages by state
    pub failures_by_state: BTreeMap<PageState, usize>,

    /// Outbound links seen on processed pages
    pub links_discovered: usize,

    /// Links accepted into the frontier, including the seed
    pub links_enqueued: usize,

    /// Wall-clock duration of the crawl in milliseconds
    pub elapsed_ms: u64,
}

impl CrawlStats {
    /// Records one failed page
    pub fn record_failure(&mut self, state: PageState) {
        self.pages_failed += 1;
        *self.failures_by_state.entry(state).or_insert(0) += 1;
    }

    /// Percentage of attempted pages that were processed
    pub fn success_rate(&self) -> f64 {
        if self.pages_attempted == 0 {
            0.0
        } else {
            (self.pages_processed as f64 / self.pages_attempted as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages attempted: {}", stats.pages_attempted);
    println!("  Pages processed: {}", stats.pages_processed);
    println!("  Pages failed: {}", stats.pages_failed);
    if stats.pages_duplicate > 0 {
        println!("  Duplicate pages: {}", stats.pages_duplicate);
    }
    println!("  Links discovered: {}", stats.links_discovered);
    println!("  Links enqueued: {}", stats.links_enqueued);
    println!("  Elapsed: {:.1}s", stats.elapsed_ms as f64 / 1000.0);
    println!();

    if !stats.failures_by_state.is_empty() {
        println!("Failures by State:");
        // Sort states by count (descending)
        let mut counts: Vec<_> = stats.failures_by_state.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

        for (state, count) in counts {
            println!("  {}: {}", state, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully processed)",
        stats.success_rate(),
        stats.pages_processed,
        stats.pages_attempted
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_failure() {
        let mut stats = CrawlStats::default();
        stats.record_failure(PageState::DeadLink);
        stats.record_failure(PageState::DeadLink);
        stats.record_failure(PageState::RobotsDenied);

        assert_eq!(stats.pages_failed, 3);
        assert_eq!(stats.failures_by_state[&PageState::DeadLink], 2);
        assert_eq!(stats.failures_by_state[&PageState::RobotsDenied], 1);
    }

    #[test]
    fn test_success_rate() {
        let mut stats = CrawlStats::default();
        assert_eq!(stats.success_rate(), 0.0);

        stats.pages_attempted = 4;
        stats.pages_processed = 3;
        assert!((stats.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_states_as_keys() {
        let mut stats = CrawlStats::default();
        stats.record_failure(PageState::Unreachable);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"unreachable\":1"));

        let back: CrawlStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
