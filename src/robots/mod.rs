//! Robots.txt handling module
//!
//! This module fetches, parses and caches robots.txt files. Each host's
//! robots.txt is requested at most once per crawl; a missing or unreadable
//! file allows everything.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::ParsedRobots;

use tracing::{debug, warn};
use url::Url;

/// Fetches robots.txt for the origin of `url`
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - Any URL on the target origin
///
/// # Returns
///
/// The parsed robots.txt. Non-2xx responses and network failures yield
/// [`ParsedRobots::allow_all`].
pub async fn fetch_robots(client: &reqwest::Client, url: &Url) -> ParsedRobots {
    let robots_url = match url.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => {
            warn!("Cannot build robots.txt URL for {}: {}", url, e);
            return ParsedRobots::allow_all();
        }
    };

    let response = match client.get(robots_url.as_str()).send().await {
        Ok(resp) => resp,
        Err(e) => {
            debug!("robots.txt fetch failed for {}: {}", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    if !response.status().is_success() {
        debug!(
            "robots.txt at {} returned {}, allowing all",
            robots_url,
            response.status()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            debug!("robots.txt body unreadable at {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
