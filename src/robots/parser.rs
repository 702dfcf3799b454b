//! Robots.txt parsing built on the robotstxt crate
//!
//! Allow/Disallow matching is delegated to [`DefaultMatcher`]. The matcher does
//! not expose `Crawl-delay`, so those directives are collected here while the
//! file is loaded.

use robotstxt::DefaultMatcher;
use std::time::Duration;

/// Upper bound applied to advertised crawl delays
const MAX_CRAWL_DELAY_SECS: f64 = 60.0;

/// One `Crawl-delay` directive together with the user agents of its group
#[derive(Debug, Clone, PartialEq)]
struct DelayRule {
    agents: Vec<String>,
    seconds: f64,
}

/// Parsed robots.txt data
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Raw robots.txt body, matched lazily by `DefaultMatcher`
    body: String,
    delays: Vec<DelayRule>,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            body: content.to_string(),
            delays: collect_delays(content),
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// Used when robots.txt is missing or cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.body
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL or path to check
    /// * `user_agent` - The product token to match groups against (e.g. "doc-atlas")
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.body.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.body, user_agent, url)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// A group naming the agent wins over the `*` group. Negative or
    /// non-numeric values are ignored and large values are capped.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        let agent = user_agent.to_lowercase();

        let specific = self
            .delays
            .iter()
            .find(|rule| rule.agents.iter().any(|a| a != "*" && agent.contains(a.as_str())));
        let wildcard = self
            .delays
            .iter()
            .find(|rule| rule.agents.iter().any(|a| a == "*"));

        specific
            .or(wildcard)
            .map(|rule| Duration::from_secs_f64(rule.seconds.min(MAX_CRAWL_DELAY_SECS)))
    }
}

/// Scans robots.txt line by line and records every `Crawl-delay` with the
/// agents of the group it appears in
fn collect_delays(content: &str) -> Vec<DelayRule> {
    let mut rules = Vec::new();
    let mut agents: Vec<String> = Vec::new();
    let mut in_agent_lines = false;

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                // Consecutive user-agent lines share one group
                if !in_agent_lines {
                    agents.clear();
                }
                agents.push(value.to_lowercase());
                in_agent_lines = true;
            }
            "crawl-delay" => {
                in_agent_lines = false;
                if let Ok(seconds) = value.parse::<f64>() {
                    if seconds.is_finite() && seconds >= 0.0 && !agents.is_empty() {
                        rules.push(DelayRule {
                            agents: agents.clone(),
                            seconds,
                        });
                    }
                }
            }
            _ => in_agent_lines = false,
        }
    }

    rules
}
