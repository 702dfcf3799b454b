use crate::config::types::{
    Config, CrawlerConfig, DescriptionConfig, FetchConfig, InferenceConfig, OutputConfig,
    UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_inference_config(&config.inference)?;
    validate_description_config(&config.description)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates a seed URL and returns it parsed
///
/// The seed must be an absolute `http` or `https` URL with a host.
///
/// # Examples
///
/// ```
/// use doc_atlas::config::validate_seed;
///
/// assert!(validate_seed("https://example.com/docs").is_ok());
/// assert!(validate_seed("ftp://example.com/").is_err());
/// assert!(validate_seed("not a url").is_err());
/// ```
pub fn validate_seed(seed: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(seed.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            seed
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(url)
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 64, got {}",
            config.concurrency
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1".to_string(),
        ));
    }

    if config.max_duration_secs == Some(0) {
        return Err(ConfigError::Validation(
            "max-duration-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.request_timeout_ms < 1 || config.connect_timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "fetch timeouts must be >= 1ms".to_string(),
        ));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

fn validate_inference_config(config: &InferenceConfig) -> Result<(), ConfigError> {
    if config.grouping_depth < 1 {
        return Err(ConfigError::Validation(
            "grouping-depth must be >= 1".to_string(),
        ));
    }

    if config.max_nesting < 1 {
        return Err(ConfigError::Validation(
            "max-nesting must be >= 1".to_string(),
        ));
    }

    if config.virtual_sections && config.min_virtual_sections < 2 {
        return Err(ConfigError::Validation(format!(
            "min-virtual-sections must be >= 2, got {}",
            config.min_virtual_sections
        )));
    }

    if config.uncategorized_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "uncategorized-name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_description_config(config: &DescriptionConfig) -> Result<(), ConfigError> {
    if config.max_length < 16 {
        return Err(ConfigError::Validation(format!(
            "description max-length must be >= 16, got {}",
            config.max_length
        )));
    }

    if config.input_budget < config.max_length {
        return Err(ConfigError::Validation(format!(
            "description input-budget ({}) must be >= max-length ({})",
            config.input_budget, config.max_length
        )));
    }

    if config.max_sentences < 1 {
        return Err(ConfigError::Validation(
            "description max-sentences must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
