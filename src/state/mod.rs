//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the outcome of every URL the crawler attempted
//! - `HostState`: per-host request pacing used for politeness delays

mod host_state;
mod page_state;

// Re-export main types
pub use host_state::HostState;
pub use page_state::PageState;
