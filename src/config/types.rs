use crate::url::{NormalizeOptions, ScopePolicy};
use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for a crawl run
///
/// Accepts the kebab-case TOML layout as well as the snake_case JSON layout
/// (`{"base_urls": [...], "keywords": [...]}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Seed URLs; each one anchors its own crawl scope
    #[serde(default, rename = "base-urls", alias = "base_urls")]
    pub base_urls: Vec<String>,

    /// Keywords to look for in page text
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link depth from a seed; unlimited when absent
    #[serde(rename = "max-depth", alias = "max_depth")]
    pub max_depth: Option<u32>,

    /// Only follow links whose host matches the seed host
    #[serde(rename = "same-host-only", alias = "same_host_only")]
    pub same_host_only: bool,

    /// Treat subdomains of the seed host as in scope
    #[serde(rename = "include-subdomains", alias = "include_subdomains")]
    pub include_subdomains: bool,

    /// Drop query strings when canonicalizing links
    #[serde(rename = "strip-query", alias = "strip_query")]
    pub strip_query: bool,

    /// Drop utm_* and click-id parameters when canonicalizing links
    #[serde(rename = "strip-tracking-params", alias = "strip_tracking_params")]
    pub strip_tracking_params: bool,

    /// Share one visited set across all seeds instead of one per seed
    #[serde(rename = "shared-visited", alias = "shared_visited")]
    pub shared_visited: bool,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-seconds", alias = "timeout_seconds")]
    pub timeout_seconds: f64,

    /// Maximum number of fetches in flight
    pub concurrency: usize,

    /// Skip URLs disallowed by the host's robots.txt
    #[serde(rename = "respect-robots", alias = "respect_robots")]
    pub respect_robots: bool,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", alias = "user_agent")]
    pub user_agent: String,

    /// Overall crawl deadline in seconds; none when absent
    #[serde(rename = "crawl-deadline-seconds", alias = "crawl_deadline_seconds")]
    pub crawl_deadline_seconds: Option<f64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            same_host_only: true,
            include_subdomains: false,
            strip_query: false,
            strip_tracking_params: false,
            shared_visited: true,
            timeout_seconds: 30.0,
            concurrency: 1,
            respect_robots: false,
            user_agent: default_user_agent(),
            crawl_deadline_seconds: None,
        }
    }
}

impl CrawlerConfig {
    /// Scope policy derived from the host-matching flags
    pub fn scope_policy(&self) -> ScopePolicy {
        match (self.same_host_only, self.include_subdomains) {
            (false, _) => ScopePolicy::Unrestricted,
            (true, true) => ScopePolicy::Domain,
            (true, false) => ScopePolicy::Host,
        }
    }

    /// Link canonicalization options
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            strip_query: self.strip_query,
            strip_tracking_params: self.strip_tracking_params,
        }
    }

    /// Per-request timeout
    ///
    /// # Errors
    ///
    /// `ConfigError::Validation` if `timeout_seconds` is not a positive
    /// number of seconds that fits in a `Duration`.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        positive_duration("timeout_seconds", self.timeout_seconds)
    }

    /// Overall crawl deadline, if one is set
    pub fn crawl_deadline(&self) -> Result<Option<Duration>, ConfigError> {
        self.crawl_deadline_seconds
            .map(|seconds| positive_duration("crawl_deadline_seconds", seconds))
            .transpose()
    }
}

fn positive_duration(name: &str, seconds: f64) -> Result<Duration, ConfigError> {
    match Duration::try_from_secs_f64(seconds) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        _ => Err(ConfigError::Validation(format!(
            "{} must be a positive number of seconds, got {}",
            name, seconds
        ))),
    }
}

/// Keyword matching configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Require keywords to match on word boundaries instead of as substrings
    #[serde(rename = "whole-words", alias = "whole_words")]
    pub whole_words: bool,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV file receiving one row per matching page
    #[serde(rename = "results-path", alias = "results_path")]
    pub results_path: String,

    /// Log file receiving one line per broken link
    #[serde(rename = "error-log-path", alias = "error_log_path")]
    pub error_log_path: String,

    /// Separator placed between matched keywords in the results CSV
    #[serde(rename = "keyword-delimiter", alias = "keyword_delimiter")]
    pub keyword_delimiter: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "pages_with_keywords.csv".to_string(),
            error_log_path: "errors.log".to_string(),
            keyword_delimiter: ", ".to_string(),
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "{}/{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_policy_mapping() {
        let mut config = CrawlerConfig::default();
        assert_eq!(config.scope_policy(), ScopePolicy::Host);

        config.include_subdomains = true;
        assert_eq!(config.scope_policy(), ScopePolicy::Domain);

        config.same_host_only = false;
        assert_eq!(config.scope_policy(), ScopePolicy::Unrestricted);
    }

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.max_depth, None);
        assert!(config.shared_visited);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(30));
        assert!(config.crawl_deadline().unwrap().is_none());
        assert!(config.user_agent.starts_with("keyword-crawler/"));
    }

    #[test]
    fn test_durations_reject_unrepresentable_values() {
        let mut config = CrawlerConfig::default();
        for bad in [1e30, -1.0, 0.0, f64::NAN, f64::INFINITY] {
            config.timeout_seconds = bad;
            assert!(matches!(config.timeout(), Err(ConfigError::Validation(_))));
        }

        config.timeout_seconds = 2.5;
        assert_eq!(config.timeout().unwrap(), Duration::from_millis(2500));

        config.crawl_deadline_seconds = Some(1e30);
        assert!(config.crawl_deadline().is_err());
        config.crawl_deadline_seconds = Some(60.0);
        assert_eq!(config.crawl_deadline().unwrap(), Some(Duration::from_secs(60)));
    }
}
