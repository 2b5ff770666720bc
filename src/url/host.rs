use url::Url;

/// Extracts the lowercase host from a URL
///
/// The port is not part of the result, so `http://127.0.0.1:8080/` and
/// `http://127.0.0.1:9090/` share a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use keyword_crawler::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}
