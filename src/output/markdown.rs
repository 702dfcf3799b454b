//! Markdown rendering of a site report
//!
//! Produces a human-readable outline: one heading per module (nested up to
//! `######`), its description, the pages it owns, and a table of failed pages.

use super::report::{ModuleRecord, SiteReport};
use super::OutputError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown rendering of `report` to `output_path`
pub fn write_markdown(report: &SiteReport, output_path: &Path) -> Result<(), OutputError> {
    let markdown = format_markdown(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a site report as markdown
pub fn format_markdown(report: &SiteReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", report.tree.title));
    if !report.tree.description.is_empty() {
        md.push_str(&format!("{}\n\n", report.tree.description));
    }

    // Run metadata
    md.push_str(&format!("- **Seed**: {}\n", report.seed_url));
    md.push_str(&format!("- **Generated**: {}\n", report.generated_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Pages**: {} processed, {} failed\n",
        report.stats.pages_processed, report.stats.pages_failed
    ));
    if report.partial {
        md.push_str("- **Partial**: crawl was stopped early\n");
    }
    md.push('\n');

    write_pages(&mut md, &report.tree);
    for module in &report.tree.submodules {
        write_module(&mut md, module, 2);
    }

    if !report.failures.is_empty() {
        md.push_str("## Failed Pages\n\n");
        md.push_str("| URL | State | Reason |\n");
        md.push_str("|-----|-------|--------|\n");

        for failure in &report.failures {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                failure.url,
                failure.state,
                escape_cell(&failure.reason)
            ));
        }
        md.push('\n');
    }

    md
}

fn write_module(md: &mut String, module: &ModuleRecord, level: usize) {
    let hashes = "#".repeat(level.min(6));
    md.push_str(&format!("{} {} (`{}`)\n\n", hashes, module.title, module.path));

    if !module.description.is_empty() {
        md.push_str(&format!("{}\n\n", module.description));
    }

    write_pages(md, module);
    for child in &module.submodules {
        write_module(md, child, level + 1);
    }
}

fn write_pages(md: &mut String, module: &ModuleRecord) {
    if module.pages.is_empty() {
        return;
    }

    for page in &module.pages {
        md.push_str(&format!("- [{}]({})\n", page.title, page.url));
    }
    md.push('\n');
}

/// Keeps table cells on one line and free of column separators
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
