//! Robots.txt handling module
//!
//! Only consulted when `respect-robots` is enabled. Robots files are fetched
//! through the same session as pages; a missing or failing robots.txt means
//! everything is allowed.

mod parser;

pub use parser::ParsedRobots;

use crate::crawler::Fetch;
use url::Url;

/// Location of the robots.txt governing `url`, keyed by origin
///
/// Returns `None` for URLs without a host.
pub fn robots_url(url: &Url) -> Option<Url> {
    url.host_str()?;
    url.join("/robots.txt").ok()
}

/// Fetches and parses robots.txt for the origin of `url`
///
/// Never fails: any fetch error falls back to [`ParsedRobots::allow_all`].
pub async fn fetch_robots<F: Fetch>(fetcher: &F, url: &Url) -> ParsedRobots {
    let Some(location) = robots_url(url) else {
        return ParsedRobots::allow_all();
    };

    match fetcher.fetch(location.as_str()).await {
        Ok(page) => {
            tracing::debug!("Loaded robots.txt from {}", location);
            ParsedRobots::from_content(&page.body)
        }
        Err(e) => {
            tracing::debug!("No usable robots.txt at {} ({}), allowing all", location, e);
            ParsedRobots::allow_all()
        }
    }
}
