//! doc-atlas main entry point
//!
//! This is the command-line interface for the doc-atlas module mapper.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use doc_atlas::config::{
    load_config, validate, Config, DescriptionStrategy, DomainPolicy, OutputFormat,
};
use doc_atlas::output::{print_statistics, write_report};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// doc-atlas: map a documentation site into modules
///
/// doc-atlas crawls a documentation site from one seed URL, extracts the text
/// of every same-site page, and groups the pages into a tree of modules and
/// submodules with short descriptions.
#[derive(Parser, Debug)]
#[command(name = "doc-atlas")]
#[command(version)]
#[command(about = "Map a documentation site into modules", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link depth from the seed
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum number of pages to crawl
    #[arg(long)]
    max_pages: Option<usize>,

    /// Number of concurrent workers
    #[arg(long)]
    concurrency: Option<usize>,

    /// Minimum delay between requests to the same host, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Also crawl subdomains of the seed host
    #[arg(long)]
    allow_subdomains: bool,

    /// Where to write the report
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Description strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Markdown,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Lead,
    Frequency,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let output_path = PathBuf::from(&config.output.path);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, finishing in-flight pages");
            on_interrupt.cancel();
        }
    });

    tracing::info!("Mapping {}", cli.seed);
    let report = match doc_atlas::run_with_cancel(&cli.seed, &config, cancel).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            return Err(e.into());
        }
    };

    write_report(&report, &output_path, config.output.format)
        .with_context(|| format!("failed to write report to {}", output_path.display()))?;

    if !cli.quiet {
        print_statistics(&report.stats);
        println!(
            "\n✓ {} modules written to {}",
            report.tree.walk().len() - 1,
            output_path.display()
        );
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_atlas=info,warn"),
            1 => EnvFilter::new("doc_atlas=debug,info"),
            2 => EnvFilter::new("doc_atlas=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load(path)?,
        None => Config::default(),
    };

    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(pages) = cli.max_pages {
        config.crawler.max_pages = pages;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(delay) = cli.delay_ms {
        config.crawler.politeness_delay_ms = delay;
    }
    if cli.allow_subdomains {
        config.crawler.domain_policy = DomainPolicy::AllowSubdomains;
    }
    if let Some(path) = &cli.output {
        config.output.path = path.display().to_string();
    }
    if let Some(format) = cli.format {
        config.output.format = match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
        };
    }
    if let Some(strategy) = cli.strategy {
        config.description.strategy = match strategy {
            StrategyArg::Lead => DescriptionStrategy::Lead,
            StrategyArg::Frequency => DescriptionStrategy::Frequency,
        };
    }

    validate(&config).context("invalid configuration after command-line overrides")?;
    Ok(config)
}

fn load(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    load_config(path).with_context(|| format!("failed to load {}", path.display()))
}
