use serde::{Deserialize, Serialize};

/// Main configuration structure for doc-atlas
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub inference: InferenceConfig,
    pub description: DescriptionConfig,
    pub output: OutputConfig,
}

/// Which hosts count as "the same site" as the seed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DomainPolicy {
    /// Only the seed's exact host
    #[default]
    Exact,
    /// The seed's host and any of its subdomains
    AllowSubdomains,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link depth to follow from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages admitted to the crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Number of concurrent crawl workers
    pub concurrency: usize,

    /// Minimum time between requests to the same host (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Host restriction relative to the seed
    #[serde(rename = "domain-policy")]
    pub domain_policy: DomainPolicy,

    /// Whether robots.txt rules are honored
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,

    /// Optional wall-clock budget for the whole crawl (seconds)
    #[serde(rename = "max-duration-secs")]
    pub max_duration_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_pages: 200,
            concurrency: 4,
            politeness_delay_ms: 250,
            domain_policy: DomainPolicy::Exact,
            respect_robots: true,
            max_duration_secs: None,
        }
    }
}

/// HTTP fetch behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,

    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// Retries after the first attempt for transient failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// First backoff delay; doubles on every retry (milliseconds)
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    /// Maximum redirect hops followed for one request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            max_retries: 3,
            backoff_base_ms: 500,
            max_redirects: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "doc-atlas".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Module inference configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Number of leading path segments that form a top-level module key
    #[serde(rename = "grouping-depth")]
    pub grouping_depth: usize,

    /// Maximum number of module levels below the root
    #[serde(rename = "max-nesting")]
    pub max_nesting: usize,

    /// Fold submodules holding a single page into their parent
    #[serde(rename = "collapse-single-page")]
    pub collapse_single_page: bool,

    /// Drop the seed URL's own path segments before grouping
    #[serde(rename = "strip-seed-prefix")]
    pub strip_seed_prefix: bool,

    /// Derive submodules from the headings of single-page modules
    #[serde(rename = "virtual-sections")]
    pub virtual_sections: bool,

    /// Minimum number of top-level sections before virtual submodules are built
    #[serde(rename = "min-virtual-sections")]
    pub min_virtual_sections: usize,

    /// Name of the catch-all module for pages without a usable path
    #[serde(rename = "uncategorized-name")]
    pub uncategorized_name: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            grouping_depth: 1,
            max_nesting: 2,
            collapse_single_page: true,
            strip_seed_prefix: false,
            virtual_sections: true,
            min_virtual_sections: 3,
            uncategorized_name: "Uncategorized".to_string(),
        }
    }
}

/// Which built-in description generator to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DescriptionStrategy {
    /// Leading sentences of the module text
    #[default]
    Lead,
    /// Highest term-frequency sentences, in original order
    Frequency,
}

/// Description generation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DescriptionConfig {
    /// Upper bound on description length (characters)
    #[serde(rename = "max-length")]
    pub max_length: usize,

    /// Upper bound on the text handed to the generator (characters)
    #[serde(rename = "input-budget")]
    pub input_budget: usize,

    pub strategy: DescriptionStrategy,

    /// Maximum number of sentences in one description
    #[serde(rename = "max-sentences")]
    pub max_sentences: usize,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            max_length: 300,
            input_budget: 2000,
            strategy: DescriptionStrategy::Lead,
            max_sentences: 3,
        }
    }
}

/// Output artifact format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the report file
    pub path: String,

    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "modules.json".to_string(),
            format: OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_header_with_contact() {
        let ua = UserAgentConfig {
            crawler_name: "AtlasBot".to_string(),
            crawler_version: "2.1".to_string(),
            contact_url: Some("https://example.com/bot".to_string()),
        };
        assert_eq!(ua.header_value(), "AtlasBot/2.1 (+https://example.com/bot)");
    }

    #[test]
    fn test_user_agent_header_without_contact() {
        let ua = UserAgentConfig {
            crawler_name: "AtlasBot".to_string(),
            crawler_version: "2.1".to_string(),
            contact_url: None,
        };
        assert_eq!(ua.header_value(), "AtlasBot/2.1");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.domain_policy, DomainPolicy::Exact);
        assert_eq!(config.inference.grouping_depth, 1);
        assert_eq!(config.description.max_length, 300);
        assert_eq!(config.output.format, OutputFormat::Json);
    }
}
