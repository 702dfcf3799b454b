//! Page state definitions for crawl outcomes
//!
//! Every URL the crawler attempts ends in exactly one of these states.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the final state of an attempted page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    // ===== Success =====
    /// Page was fetched and extracted into a document
    Processed,

    // ===== Permanent HTTP failures =====
    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page returned another 4xx status
    ClientError,

    // ===== Transient failures that outlived their retries =====
    /// Page kept returning HTTP 429
    RateLimited,

    /// Page kept returning HTTP 5xx
    ServerError,

    /// Page kept timing out or refusing connections
    Unreachable,

    // ===== Other per-page failures =====
    /// Page Content-Type is not HTML
    ContentMismatch,

    /// Redirect loop, too many hops, or a redirect leaving the crawl scope
    RedirectFailed,

    /// Page is disallowed by robots.txt
    RobotsDenied,

    /// Page body could not be turned into a document
    ParseFailed,

    /// Page failed for any other reason
    Failed,
}

impl PageState {
    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns true if this represents a failure recorded in the failure list
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Returns the snake_case name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::DeadLink => "dead_link",
            Self::ClientError => "client_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Unreachable => "unreachable",
            Self::ContentMismatch => "content_mismatch",
            Self::RedirectFailed => "redirect_failed",
            Self::RobotsDenied => "robots_denied",
            Self::ParseFailed => "parse_failed",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Processed,
            Self::DeadLink,
            Self::ClientError,
            Self::RateLimited,
            Self::ServerError,
            Self::Unreachable,
            Self::ContentMismatch,
            Self::RedirectFailed,
            Self::RobotsDenied,
            Self::ParseFailed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
