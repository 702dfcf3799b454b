//! doc-atlas: a documentation site module mapper
//!
//! This crate crawls a documentation site from a single seed URL, extracts the
//! meaningful text of every page it can reach on the same site, and organizes the
//! pages into a tree of modules and submodules inferred from URL paths and heading
//! structure. Each module carries a short description taken only from its own text.

pub mod config;
pub mod crawler;
pub mod describe;
pub mod extract;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for a doc-atlas run
///
/// Only configuration and inference failures abort a run. Per-page fetch and
/// extraction failures are collected into the crawl result instead.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Inference error: {0}")]
    Inference(#[from] inference::InferenceError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for doc-atlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResult, Crawler};
pub use describe::DescriptionGenerator;
pub use extract::{extract, NormalizedDocument};
pub use inference::{ModuleInference, ModuleTree};
pub use output::SiteReport;
pub use pipeline::{run, run_with_cancel};
pub use state::PageState;
pub use url::{canonicalize_url, extract_domain, host_in_scope};
