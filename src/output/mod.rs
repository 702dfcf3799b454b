//! Output module for site reports
//!
//! This module handles:
//! - Converting the module tree into a serializable [`SiteReport`]
//! - Writing the report as JSON or markdown
//! - Crawl statistics and their console summary

mod markdown;
mod report;
pub mod stats;

pub use markdown::{format_markdown, write_markdown};
pub use report::{FailureRecord, ModuleRecord, PageRecord, SiteReport};
pub use stats::{print_statistics, CrawlStats};

use crate::config::OutputFormat;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes `report` to `path` in the requested format
pub fn write_report(report: &SiteReport, path: &Path, format: OutputFormat) -> OutputResult<()> {
    match format {
        OutputFormat::Json => std::fs::write(path, report.to_json()?)?,
        OutputFormat::Markdown => write_markdown(report, path)?,
    }

    info!("Report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report() -> SiteReport {
        SiteReport {
            seed_url: "https://ex.com/".to_string(),
            generated_at: Utc::now(),
            partial: false,
            stats: CrawlStats::default(),
            tree: ModuleRecord {
                name: "ex.com".to_string(),
                title: "ex.com".to_string(),
                path: "/".to_string(),
                description: String::new(),
                pages: Vec::new(),
                submodules: Vec::new(),
                is_virtual: false,
            },
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modules.json");
        write_report(&report(), &path, OutputFormat::Json).unwrap();

        let back = SiteReport::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, report_with_time(back.generated_at));
    }

    fn report_with_time(at: chrono::DateTime<Utc>) -> SiteReport {
        SiteReport {
            generated_at: at,
            ..report()
        }
    }

    #[test]
    fn test_write_markdown_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modules.md");
        write_report(&report(), &path, OutputFormat::Markdown).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("# ex.com"));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let result = write_report(
            &report(),
            Path::new("/nonexistent/dir/modules.json"),
            OutputFormat::Json,
        );
        assert!(matches!(result, Err(OutputError::Io(_))));
    }
}
