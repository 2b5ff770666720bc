use crate::UrlError;
use url::Url;

/// Click-id query parameters removed when tracking-parameter stripping is on
///
/// Any `utm_*` parameter is removed as well.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Options controlling how discovered links are canonicalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Drop the whole query string
    pub strip_query: bool,

    /// Drop `utm_*`, `fbclid`, `gclid` and `mc_eid` parameters
    pub strip_tracking_params: bool,
}

/// Canonicalizes a discovered link against the page it was found on
///
/// Uses the default [`NormalizeOptions`]. Returns `None` when the link
/// cannot be resolved, when the page URL itself does not parse, or when the
/// resolved scheme is not HTTP(S).
///
/// # Examples
///
/// ```
/// use keyword_crawler::url::normalize;
///
/// assert_eq!(
///     normalize("/about#team", "https://ex.test/index.html"),
///     Some("https://ex.test/about".to_string())
/// );
/// assert_eq!(normalize("mailto:a@b.com", "https://ex.test/"), None);
/// ```
pub fn normalize(raw_link: &str, page_url: &str) -> Option<String> {
    let page_url = Url::parse(page_url).ok()?;
    normalize_link(raw_link, &page_url, &NormalizeOptions::default()).map(String::from)
}

/// Canonicalizes a discovered link against an already-parsed page URL
///
/// # Normalization Steps
///
/// 1. Trim whitespace; reject empty links
/// 2. Resolve relative to `page_url`; reject if unresolvable
/// 3. Reject anything that is not `http` or `https` (mailto:, javascript:,
///    tel:, data:, ftp: ...) or that has no host
/// 4. Remove the fragment
/// 5. Remove the query string, or only tracking parameters, per `options`
/// 6. Remove an empty trailing `?`
pub fn normalize_link(raw_link: &str, page_url: &Url, options: &NormalizeOptions) -> Option<Url> {
    let raw_link = raw_link.trim();
    if raw_link.is_empty() {
        return None;
    }

    let mut url = page_url.join(raw_link).ok()?;

    if !is_http(&url) {
        return None;
    }

    if url.host_str().map_or(true, str::is_empty) {
        return None;
    }

    url.set_fragment(None);

    if options.strip_query {
        url.set_query(None);
    } else if options.strip_tracking_params {
        strip_tracking_params(&mut url);
    }

    if url.query() == Some("") {
        url.set_query(None);
    }

    Some(url)
}

/// Parses a seed URL, reporting why it is unusable
///
/// Seeds must be absolute HTTP(S) URLs with a host. The fragment is removed
/// so the seed matches its canonical visited-set key.
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if !is_http(&url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(seed.to_string()));
    }

    url.set_fragment(None);
    Ok(url)
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Removes tracking parameters while keeping the rest of the query verbatim
fn strip_tracking_params(url: &mut Url) {
    let Some(query) = url.query() else {
        return;
    };

    let kept = query
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !pair.is_empty() && !is_tracking_param(key)
        })
        .collect::<Vec<_>>()
        .join("&");

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&kept));
    }
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
