use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::url::parse_seed;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seeds(&config.base_urls)?;
    validate_keywords(&config.keywords)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates seed URLs: at least one, each absolute HTTP(S) with a host
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one base URL is required".to_string(),
        ));
    }

    for seed in seeds {
        parse_seed(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base URL '{}': {}", seed, e)))?;
    }

    Ok(())
}

/// Validates keywords: at least one non-blank entry
fn validate_keywords(keywords: &[String]) -> Result<(), ConfigError> {
    if keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "at least one non-empty keyword is required".to_string(),
        ));
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    config.timeout()?;

    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    config.crawl_deadline()?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if !config.same_host_only && config.max_depth.is_none() {
        tracing::warn!("same_host_only is off and max_depth is unset; the crawl may not terminate");
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_path.is_empty() {
        return Err(ConfigError::Validation(
            "results_path cannot be empty".to_string(),
        ));
    }

    if config.error_log_path.is_empty() {
        return Err(ConfigError::Validation(
            "error_log_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            base_urls: vec!["https://example.com/".to_string()],
            keywords: vec!["widget".to_string()],
            ..Config::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_no_seeds_is_fatal() {
        let mut config = valid_config();
        config.base_urls.clear();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        let mut config = valid_config();
        config.base_urls.push("mailto:someone@example.com".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        let mut config = valid_config();
        config.base_urls.push("not a url".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_http_seed_is_allowed() {
        let mut config = valid_config();
        config.base_urls = vec!["http://127.0.0.1:8080/".to_string()];
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_blank_keywords_are_fatal() {
        let mut config = valid_config();
        config.keywords = vec!["  ".to_string(), String::new()];
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_crawler_limits() {
        let mut config = valid_config();
        config.crawler.timeout_seconds = 0.0;
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.crawler.concurrency = 0;
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.crawler.concurrency = 101;
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.crawler.crawl_deadline_seconds = Some(-1.0);
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.crawler.crawl_deadline_seconds = Some(1e30);
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.crawler.user_agent = " ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_timeout_must_fit_in_a_duration() {
        for bad in [1e30, -1.0, f64::NAN] {
            let mut config = valid_config();
            config.crawler.timeout_seconds = bad;
            assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
        }
    }

    #[test]
    fn test_empty_output_paths() {
        let mut config = valid_config();
        config.output.results_path.clear();
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.output.error_log_path.clear();
        assert!(validate(&config).is_err());
    }
}
