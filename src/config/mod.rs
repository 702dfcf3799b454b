//! Configuration module for doc-atlas
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every table and key is optional; an empty file yields [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use doc_atlas::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("atlas.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DescriptionConfig, DescriptionStrategy, DomainPolicy, FetchConfig,
    InferenceConfig, OutputConfig, OutputFormat, UserAgentConfig,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_seed};
