//! End-to-end run: crawl, infer modules, describe, report
//!
//! [`run`] is the single entry point a CLI or UI needs. Configuration and the
//! seed URL are validated before any network activity, so a bad invocation
//! fails fast with a [`ConfigError`](crate::ConfigError).

use crate::config::{validate, validate_seed, Config};
use crate::crawler::Crawler;
use crate::describe::generator_for;
use crate::inference::ModuleInference;
use crate::output::SiteReport;
use crate::AtlasError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Crawls `seed_url` and builds the described module tree
///
/// # Example
///
/// ```no_run
/// use doc_atlas::{run, Config};
///
/// # async fn example() -> Result<(), doc_atlas::AtlasError> {
/// let report = run("https://docs.example.com/", &Config::default()).await?;
/// println!("{} top-level modules", report.tree.submodules.len());
/// # Ok(())
/// # }
/// ```
pub async fn run(seed_url: &str, config: &Config) -> Result<SiteReport, AtlasError> {
    run_with_cancel(seed_url, config, CancellationToken::new()).await
}

/// Like [`run`], but stops crawling when `cancel` fires
///
/// A cancelled crawl still yields a report built from the pages gathered so
/// far, marked as partial. The run only fails if nothing at all was gathered.
pub async fn run_with_cancel(
    seed_url: &str,
    config: &Config,
    cancel: CancellationToken,
) -> Result<SiteReport, AtlasError> {
    validate(config)?;
    let seed = validate_seed(seed_url)?;

    let crawler = Crawler::new(config.clone())?;
    let result = crawler.crawl_with_cancel(&seed, cancel).await?;

    let cancelled = result.cancelled;
    let seed = result.seed.clone();
    let (documents, failures, stats) = result.into_parts();

    if documents.is_empty() {
        warn!(
            "No pages could be processed from {} ({} failures)",
            seed,
            failures.len()
        );
    }

    let generator = generator_for(&config.description);
    info!(
        "Inferring modules from {} documents ({} descriptions)",
        documents.len(),
        generator.name()
    );

    let tree = ModuleInference::new(
        config.inference.clone(),
        config.description.clone(),
        generator,
    )
    .with_seed(seed.clone())
    .infer(documents)?;

    Ok(SiteReport::new(
        seed.as_str(),
        &tree,
        &failures,
        stats,
        cancelled,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::InferenceError;
    use crate::ConfigError;

    #[tokio::test]
    async fn test_invalid_seed_is_config_error() {
        let result = run("not a url", &Config::default()).await;
        assert!(matches!(
            result,
            Err(AtlasError::Config(ConfigError::InvalidUrl(_)))
        ));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_crawl() {
        let mut config = Config::default();
        config.crawler.concurrency = 0;
        let result = run("https://example.invalid/", &config).await;
        assert!(matches!(
            result,
            Err(AtlasError::Config(ConfigError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_seed_is_inference_error() {
        let mut config = Config::default();
        config.fetch.max_retries = 0;
        config.fetch.connect_timeout_ms = 200;
        config.fetch.request_timeout_ms = 200;
        config.crawler.politeness_delay_ms = 0;

        // Nothing listens on port 9 of the loopback address
        let result = run("http://127.0.0.1:9/", &config).await;
        assert!(matches!(
            result,
            Err(AtlasError::Inference(InferenceError::NoDocuments))
        ));
    }
}
