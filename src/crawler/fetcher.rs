//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared session (user agent, cookies, compression, redirects)
//! - GET requests with a bounded per-request timeout
//! - Error classification into `FetchError`
//!
//! No retries happen here. A non-2xx response is an error, never content.

use crate::config::CrawlerConfig;
use crate::CrawlError;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on the TCP/TLS connect phase
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

/// Content of a successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code (always 2xx)
    pub status: u16,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Page body content
    pub body: String,
}

impl PageContent {
    /// Whether the body is worth parsing for links and text
    ///
    /// A missing Content-Type is treated as text.
    pub fn is_textual(&self) -> bool {
        let Some(content_type) = &self.content_type else {
            return true;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        mime.is_empty()
            || mime.starts_with("text/")
            || mime == "application/xhtml+xml"
            || mime == "application/xml"
    }
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Short classification used in broken-link records
    ///
    /// # Examples
    ///
    /// ```
    /// use keyword_crawler::crawler::FetchError;
    ///
    /// assert_eq!(FetchError::HttpStatus(404).reason(), "HttpStatus(404)");
    /// assert_eq!(FetchError::Timeout.reason(), "Timeout");
    /// ```
    pub fn reason(&self) -> String {
        match self {
            Self::Timeout => "Timeout".to_string(),
            Self::ConnectionFailed(_) => "ConnectionFailed".to_string(),
            Self::HttpStatus(code) => format!("HttpStatus({})", code),
            Self::Other(message) => format!("Other({})", message),
        }
    }
}

/// Anything that can retrieve a page by URL
///
/// The crawl engine only depends on this trait, so tests can substitute a
/// canned implementation for the HTTP session.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<PageContent, FetchError>> + Send;
}

/// Builds the HTTP session shared by every fetch in a run
///
/// The session keeps cookies between requests, follows up to
/// `MAX_REDIRECTS` redirects and negotiates gzip/brotli.
///
/// # Errors
///
/// * `CrawlError::Config` - The configured timeout is not usable
/// * `CrawlError::Client` - reqwest could not build the session
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, CrawlError> {
    let timeout = config.timeout()?;

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a URL through `client`, failing after `timeout`
pub async fn fetch_url(client: &Client, url: &str, timeout: Duration) -> Result<PageContent, FetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    let final_url = response.url().to_string();

    if final_url != url {
        tracing::debug!("Request to {} was redirected to {}", url, final_url);
    }

    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response.text().await.map_err(classify_error)?;

    Ok(PageContent {
        final_url,
        status: status.as_u16(),
        content_type,
        body,
    })
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::ConnectionFailed(e.to_string())
    } else if e.is_redirect() {
        FetchError::Other("too many redirects".to_string())
    } else {
        FetchError::Other(e.to_string())
    }
}

/// The production fetcher: a reusable reqwest session plus timeout
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Wraps a caller-supplied session
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Builds a fresh session from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        Ok(Self::new(build_http_client(config)?, config.timeout()?))
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        fetch_url(&self.client, url, self.timeout).await
    }
}
