use crate::url::host::extract_host;
use url::Url;

/// How far a crawl may wander from its seed host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScopePolicy {
    /// Only the seed host itself
    #[default]
    Host,
    /// The seed host and any of its subdomains
    Domain,
    /// Any HTTP(S) host
    Unrestricted,
}

/// Checks whether a URL belongs to the crawl anchored at `base_host`
///
/// Unparseable URLs are never in scope.
///
/// # Examples
///
/// ```
/// use keyword_crawler::url::{in_scope, ScopePolicy};
///
/// assert!(in_scope("https://a.test/page", "a.test", ScopePolicy::Host));
/// assert!(!in_scope("https://b.test/page", "a.test", ScopePolicy::Host));
/// assert!(in_scope("https://blog.a.test/", "a.test", ScopePolicy::Domain));
/// ```
pub fn in_scope(url: &str, base_host: &str, policy: ScopePolicy) -> bool {
    Url::parse(url).is_ok_and(|parsed| url_in_scope(&parsed, base_host, policy))
}

/// Same as [`in_scope`] for an already-parsed URL
pub fn url_in_scope(url: &Url, base_host: &str, policy: ScopePolicy) -> bool {
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    let Some(host) = extract_host(url) else {
        return false;
    };
    let base_host = base_host.to_lowercase();

    match policy {
        ScopePolicy::Host => host == base_host,
        ScopePolicy::Domain => matches_domain(&base_host, &host),
        ScopePolicy::Unrestricted => true,
    }
}

/// Matches the base domain itself or any subdomain of it
///
/// A leading `www.` on the base is ignored so that a seed of
/// `www.example.com` still covers `blog.example.com`.
fn matches_domain(base: &str, candidate: &str) -> bool {
    let base = base.strip_prefix("www.").unwrap_or(base);
    candidate == base || candidate.ends_with(&format!(".{}", base))
}
