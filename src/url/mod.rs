//! URL handling module for doc-atlas
//!
//! This module provides URL canonicalization, host extraction, crawl-scope checks,
//! and path segmentation used by module inference.

mod domain;
mod normalize;
mod scope;

pub use crate::config::DomainPolicy;

// Re-export main functions
pub use domain::{extract_domain, path_segments};
pub use normalize::canonicalize_url;
pub use scope::{host_in_scope, is_document_link};
