//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - Manual redirect following with loop and hop-count detection
//! - Retry with exponential backoff for transient failures
//! - Error classification into [`FetchError`] and [`PageState`]

use crate::config::{FetchConfig, UserAgentConfig};
use crate::crawler::politeness::Politeness;
use crate::state::PageState;
use crate::url::extract_domain;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

/// Content types accepted as HTML documents
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Upper bound for a single backoff sleep
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Errors produced while fetching a single URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("server error: HTTP {status}")]
    ServerError { status: u16 },

    #[error("rate limited: HTTP 429")]
    RateLimited,

    #[error("client error: HTTP {status}")]
    ClientError { status: u16 },

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("too many redirects (more than {0})")]
    TooManyRedirects(usize),

    #[error("redirect loop at {0}")]
    RedirectLoop(String),

    #[error("redirected outside the crawl scope to {0}")]
    OffScopeRedirect(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Other(String),
}

impl FetchError {
    /// Returns true for failures worth retrying: timeouts, connection
    /// failures, 5xx responses and 429
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::Connect(_) | Self::ServerError { .. } | Self::RateLimited
        )
    }

    /// Maps the error to the page state recorded in the failure list
    pub fn page_state(&self) -> PageState {
        match self {
            Self::Timeout | Self::Connect(_) => PageState::Unreachable,
            Self::ServerError { .. } => PageState::ServerError,
            Self::RateLimited => PageState::RateLimited,
            Self::ClientError { status: 404 | 410 } => PageState::DeadLink,
            Self::ClientError { .. } => PageState::ClientError,
            Self::UnsupportedContentType(_) => PageState::ContentMismatch,
            Self::TooManyRedirects(_) | Self::RedirectLoop(_) | Self::OffScopeRedirect(_) => {
                PageState::RedirectFailed
            }
            Self::InvalidUrl(_) | Self::Body(_) | Self::Other(_) => PageState::Failed,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else if err.is_request() && err.url().is_none() {
            Self::InvalidUrl(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects
    pub final_url: Url,

    /// HTTP status code of the final response
    pub status: u16,

    /// Content-Type header of the final response
    pub content_type: String,

    /// Raw response body
    pub body: Vec<u8>,
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are disabled on the client; [`Fetcher`] follows them itself so it
/// can detect loops and enforce the hop limit.
///
/// # Example
///
/// ```
/// use doc_atlas::config::{FetchConfig, UserAgentConfig};
/// use doc_atlas::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetchConfig::default());
/// assert!(client.is_ok());
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch: &FetchConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_millis(fetch.request_timeout_ms))
        .connect_timeout(Duration::from_millis(fetch.connect_timeout_ms))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Checks applied before every request of a crawl, redirect hops included
pub struct RequestGate<'a> {
    /// Spacing is applied per host of the URL about to be requested
    pub politeness: &'a Politeness,

    /// Redirect targets failing this check are not requested
    pub in_scope: &'a (dyn Fn(&Url) -> bool + Send + Sync),
}

/// Fetches pages with retries and manual redirect handling
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 404 / 410 | Immediate → DeadLink |
/// | Other HTTP 4xx | Immediate → ClientError |
/// | HTTP 429 | Retry, then → RateLimited |
/// | HTTP 5xx | Retry, then → ServerError |
/// | Timeout / connect failure | Retry, then → Unreachable |
/// | Non-HTML Content-Type | Immediate → ContentMismatch |
/// | Redirect loop / too many hops | Immediate → RedirectFailed |
///
/// Retries sleep `backoff-base-ms * 2^attempt` between attempts.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Creates a fetcher around an already configured client
    pub fn new(client: Client, config: FetchConfig) -> Self {
        Self { client, config }
    }

    /// Returns the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches `url`, retrying transient failures
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.fetch_gated(url, None).await
    }

    /// Like [`Fetcher::fetch`], but every request (retries and redirect hops
    /// included) first passes through `gate`
    pub async fn fetch_gated(
        &self,
        url: &Url,
        gate: Option<&RequestGate<'_>>,
    ) -> Result<FetchedPage, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            match self.fetch_once(url, gate).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.backoff(attempt);
                    debug!(
                        "Retrying {} after {:?} (attempt {}/{}): {}",
                        url,
                        delay,
                        attempt + 1,
                        self.config.max_retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.config.backoff_base_ms.saturating_mul(factor)).min(MAX_BACKOFF)
    }

    /// Performs one GET, following redirects up to the configured hop count
    async fn fetch_once(
        &self,
        url: &Url,
        gate: Option<&RequestGate<'_>>,
    ) -> Result<FetchedPage, FetchError> {
        let mut current = url.clone();
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(current.to_string());

        for hop in 0..=self.config.max_redirects {
            if let Some(gate) = gate {
                if hop > 0 && !(gate.in_scope)(&current) {
                    return Err(FetchError::OffScopeRedirect(current.to_string()));
                }
                if let Some(host) = extract_domain(&current) {
                    gate.politeness.wait_turn(&host).await;
                }
            }

            trace!("GET {} (hop {})", current, hop);
            let response = self
                .client
                .get(current.as_str())
                .send()
                .await
                .map_err(FetchError::from_reqwest)?;
            let status = response.status();

            if status.is_redirection() {
                let next = redirect_target(&current, &response)?;
                if !visited.insert(next.to_string()) {
                    return Err(FetchError::RedirectLoop(next.to_string()));
                }
                debug!("{} redirected ({}) to {}", current, status.as_u16(), next);
                current = next;
                continue;
            }

            check_status(status)?;

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();

            if !is_html_content_type(&content_type) {
                return Err(FetchError::UnsupportedContentType(content_type));
            }

            let body = response.bytes().await.map_err(FetchError::from_reqwest)?;

            return Ok(FetchedPage {
                final_url: current,
                status: status.as_u16(),
                content_type,
                body: body.to_vec(),
            });
        }

        Err(FetchError::TooManyRedirects(self.config.max_redirects))
    }
}

fn redirect_target(current: &Url, response: &reqwest::Response) -> Result<Url, FetchError> {
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            FetchError::Other(format!(
                "HTTP {} without a Location header",
                response.status().as_u16()
            ))
        })?;

    let mut next = current
        .join(location)
        .map_err(|e| FetchError::InvalidUrl(format!("bad redirect target '{}': {}", location, e)))?;
    next.set_fragment(None);
    Ok(next)
}

fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }

    let code = status.as_u16();
    if status == StatusCode::TOO_MANY_REQUESTS {
        Err(FetchError::RateLimited)
    } else if status.is_server_error() {
        Err(FetchError::ServerError { status: code })
    } else {
        Err(FetchError::ClientError { status: code })
    }
}

/// Returns true if the Content-Type header names an HTML document
///
/// A missing header is accepted; many static hosts omit it for `.html` files.
fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.is_empty() || HTML_CONTENT_TYPES.contains(&mime.as_str())
}
