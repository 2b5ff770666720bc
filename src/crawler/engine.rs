//! Crawl engine - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the other components
//! together:
//! - Seeding the frontier and owning the visited set
//! - Dispatching fetches, up to `concurrency` at a time
//! - Matching keywords and extracting links from fetched pages
//! - Emitting match and broken-link records to a `ReportSink`
//!
//! Traversal is breadth-first. Only sink errors and state-machine
//! violations stop a crawl early; a page that fails to load becomes a
//! broken-link record and the crawl moves on.

use crate::config::{validate, Config, CrawlerConfig};
use crate::crawler::fetcher::{Fetch, FetchError, HttpFetcher, PageContent};
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::matcher::KeywordSet;
use crate::crawler::parser::{HtmlParser, PageParser};
use crate::output::{BrokenLink, CrawlStatistics, CsvReportSink, PageResult, ReportSink};
use crate::robots::{fetch_robots, ParsedRobots};
use crate::state::{PageState, VisitedSet};
use crate::url::{extract_host, normalize_link, parse_seed, url_in_scope};
use crate::{ConfigError, CrawlError, UrlError};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashMap;
use std::time::Instant;
use url::Url;

/// Robots.txt lookup shared by every target on one origin
type SharedRobots<'a> = Shared<LocalBoxFuture<'a, ParsedRobots>>;

/// A finished unit of in-flight work
enum Step {
    RobotsChecked {
        target: CrawlTarget,
        allowed: bool,
    },
    Fetched {
        target: CrawlTarget,
        result: Result<PageContent, FetchError>,
    },
}

/// Keyword crawler over a fetcher and a page parser
pub struct Crawler<F: Fetch, P: PageParser = HtmlParser> {
    config: CrawlerConfig,
    keywords: KeywordSet,
    fetcher: F,
    parser: P,
}

impl Crawler<HttpFetcher, HtmlParser> {
    /// Builds a crawler with a fresh HTTP session from a full configuration
    ///
    /// # Errors
    ///
    /// * `CrawlError::Config` - No usable keyword, or a timeout that is not a
    ///   positive, representable number of seconds
    /// * `CrawlError::Client` - The HTTP session could not be built
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let keywords = if config.matching.whole_words {
            KeywordSet::whole_words(&config.keywords)?
        } else {
            KeywordSet::new(&config.keywords)?
        };
        let fetcher = HttpFetcher::from_config(&config.crawler)?;

        Ok(Self::new(
            config.crawler.clone(),
            keywords,
            fetcher,
            HtmlParser::new(),
        ))
    }
}

impl<F: Fetch, P: PageParser> Crawler<F, P> {
    pub fn new(config: CrawlerConfig, keywords: KeywordSet, fetcher: F, parser: P) -> Self {
        Self {
            config,
            keywords,
            fetcher,
            parser,
        }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Crawls every seed in order, streaming records into `sink`
    ///
    /// All seeds are validated before the first request and canonicalized
    /// with the same query options as discovered links. Each seed anchors
    /// its own scope; whether seeds share a visited set is the
    /// `shared_visited` option.
    ///
    /// # Errors
    ///
    /// * `CrawlError::Config` - The seed list is empty
    /// * `CrawlError::Url` - A seed is not an absolute HTTP(S) URL
    /// * `CrawlError::Output` - The sink failed to record something
    /// * `CrawlError::InvalidTransition` - Internal state-machine violation
    pub async fn crawl(
        &self,
        seeds: &[String],
        sink: &mut dyn ReportSink,
    ) -> Result<CrawlStatistics, CrawlError> {
        if seeds.is_empty() {
            return Err(ConfigError::Validation("at least one base URL is required".to_string()).into());
        }

        let options = self.config.normalize_options();
        let seeds = seeds
            .iter()
            .map(|seed| -> Result<Url, UrlError> {
                let url = parse_seed(seed)?;
                Ok(normalize_link(url.as_str(), &url, &options).unwrap_or(url))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let start_time = Instant::now();
        let mut stats = CrawlStatistics::new();

        let outcome = match self.config.crawl_deadline()? {
            Some(deadline) => {
                let run = tokio::time::timeout(deadline, self.crawl_seeds(&seeds, sink, &mut stats)).await;
                match run {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::warn!(
                            "Crawl deadline of {:.1}s reached, stopping",
                            deadline.as_secs_f64()
                        );
                        stats.timed_out = true;
                        Ok(())
                    }
                }
            }
            None => self.crawl_seeds(&seeds, sink, &mut stats).await,
        };

        stats.elapsed = start_time.elapsed();
        outcome?;

        tracing::info!(
            "Crawl complete: {} pages fetched, {} matched, {} broken links in {:.2}s",
            stats.pages_fetched(),
            stats.count(PageState::Matched),
            stats.count(PageState::Failed),
            stats.elapsed.as_secs_f64()
        );

        Ok(stats)
    }

    async fn crawl_seeds(
        &self,
        seeds: &[Url],
        sink: &mut dyn ReportSink,
        stats: &mut CrawlStatistics,
    ) -> Result<(), CrawlError> {
        let mut visited = VisitedSet::new();

        for seed in seeds {
            if !self.config.shared_visited {
                visited = VisitedSet::new();
            }

            let base_host =
                extract_host(seed).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;

            stats.seeds += 1;
            tracing::info!("Starting crawl at: {}", seed);
            self.crawl_seed(seed, &base_host, &mut visited, sink, stats)
                .await?;
        }

        Ok(())
    }

    /// Runs the breadth-first loop for one seed until its frontier drains
    async fn crawl_seed(
        &self,
        seed: &Url,
        base_host: &str,
        visited: &mut VisitedSet,
        sink: &mut dyn ReportSink,
        stats: &mut CrawlStatistics,
    ) -> Result<(), CrawlError> {
        let mut frontier = Frontier::new();
        if !frontier.push_unseen(CrawlTarget::seed(seed.as_str(), base_host), visited) {
            tracing::info!("Seed {} was already visited, skipping", seed);
            return Ok(());
        }

        let concurrency = self.config.concurrency.max(1);
        let mut robots_cache: HashMap<String, SharedRobots<'_>> = HashMap::new();
        let mut in_flight: FuturesUnordered<LocalBoxFuture<'_, Step>> = FuturesUnordered::new();
        let mut pages_done: u64 = 0;
        let start_time = Instant::now();

        loop {
            // Nothing is awaited here; robots lookups run as in-flight steps
            while in_flight.len() < concurrency {
                let Some(target) = frontier.pop() else {
                    break;
                };

                let robots = if self.config.respect_robots {
                    self.robots_for(&target.url, &mut robots_cache)
                } else {
                    None
                };

                match robots {
                    Some(robots) => {
                        let user_agent = self.config.user_agent.as_str();
                        in_flight.push(
                            async move {
                                let allowed = robots.await.is_allowed(&target.url, user_agent);
                                Step::RobotsChecked { target, allowed }
                            }
                            .boxed_local(),
                        );
                    }
                    None => in_flight.push(self.start_fetch(target, visited)?),
                }
            }

            let Some(step) = in_flight.next().await else {
                break;
            };

            let (target, result) = match step {
                Step::RobotsChecked { target, allowed: true } => {
                    in_flight.push(self.start_fetch(target, visited)?);
                    continue;
                }
                Step::RobotsChecked { target, allowed: false } => {
                    tracing::debug!("Skipping {} (disallowed by robots.txt)", target.url);
                    visited.advance(&target.url, PageState::Disallowed)?;
                    stats.record_state(PageState::Disallowed);
                    continue;
                }
                Step::Fetched { target, result } => (target, result),
            };

            match result {
                Ok(page) => self.handle_page(&target, page, visited, &mut frontier, sink, stats)?,
                Err(error) => self.handle_failure(&target, error, visited, sink, stats)?,
            }

            pages_done += 1;
            if pages_done % 10 == 0 {
                let rate = pages_done as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages fetched, {} in frontier, {:.2} pages/sec",
                    pages_done,
                    frontier.len(),
                    rate
                );
            }
        }

        tracing::info!("Finished crawl at {}: {} pages fetched", seed, pages_done);
        Ok(())
    }

    /// Marks `target` as fetching and returns the step that fetches it
    fn start_fetch<'a>(
        &'a self,
        target: CrawlTarget,
        visited: &mut VisitedSet,
    ) -> Result<LocalBoxFuture<'a, Step>, CrawlError> {
        visited.advance(&target.url, PageState::Fetching)?;
        tracing::info!("Crawling: {}", target.url);

        Ok(async move {
            let result = self.fetcher.fetch(&target.url).await;
            Step::Fetched { target, result }
        }
        .boxed_local())
    }

    /// Robots.txt for the origin of `url`, fetched at most once per origin
    ///
    /// Returns `None` when `url` does not parse, in which case it is fetched
    /// without a robots check.
    fn robots_for<'a>(
        &'a self,
        url: &str,
        cache: &mut HashMap<String, SharedRobots<'a>>,
    ) -> Option<SharedRobots<'a>> {
        let parsed = Url::parse(url).ok()?;
        let origin = parsed.origin().ascii_serialization();

        let robots = cache.entry(origin).or_insert_with(move || {
            async move { fetch_robots(&self.fetcher, &parsed).await }
                .boxed_local()
                .shared()
        });
        Some(robots.clone())
    }

    fn handle_page(
        &self,
        target: &CrawlTarget,
        page: PageContent,
        visited: &mut VisitedSet,
        frontier: &mut Frontier,
        sink: &mut dyn ReportSink,
        stats: &mut CrawlStatistics,
    ) -> Result<(), CrawlError> {
        let target_url = Url::parse(&target.url).map_err(|e| UrlError::Parse(format!("{}: {}", target.url, e)))?;
        let options = self.config.normalize_options();

        // Links resolve against where the page actually lives
        let page_url = normalize_link(&page.final_url, &target_url, &options).unwrap_or(target_url);

        // A redirect target counts as visited so it is not fetched again
        let redirect_claimed = page_url.as_str() != target.url && visited.insert(page_url.as_str());

        let state = if !page.is_textual() {
            tracing::debug!(
                "Not scanning {} ({})",
                target.url,
                page.content_type.as_deref().unwrap_or_default()
            );
            PageState::Unmatched
        } else {
            let follow_links = self.config.max_depth.map_or(true, |max| target.depth < max);
            let (text, links) = if follow_links {
                let parsed = self.parser.parse(&page.body);
                (parsed.text, parsed.links)
            } else {
                (self.parser.extract_visible_text(&page.body), Vec::new())
            };

            let matched_keywords = self.keywords.find_in(&text);
            let state = if matched_keywords.is_empty() {
                PageState::Unmatched
            } else {
                tracing::info!("Keywords found on {}: {:?}", target.url, matched_keywords);
                sink.record_match(&PageResult {
                    url: target.url.clone(),
                    matched_keywords,
                })?;
                PageState::Matched
            };

            self.enqueue_links(target, &page_url, &links, visited, frontier, stats);
            state
        };

        visited.advance(&target.url, state)?;
        stats.record_state(state);

        if redirect_claimed {
            visited.advance(page_url.as_str(), PageState::Fetching)?;
            visited.advance(page_url.as_str(), state)?;
        }

        Ok(())
    }

    fn handle_failure(
        &self,
        target: &CrawlTarget,
        error: FetchError,
        visited: &mut VisitedSet,
        sink: &mut dyn ReportSink,
        stats: &mut CrawlStatistics,
    ) -> Result<(), CrawlError> {
        let link = BrokenLink {
            referrer_url: target.referrer_or_self().to_string(),
            target_url: target.url.clone(),
            reason: error.reason(),
        };

        tracing::warn!(
            "Broken link found: {}. Referring page: {}. Reason: {}",
            link.target_url,
            link.referrer_url,
            link.reason
        );
        sink.record_broken(&link)?;

        visited.advance(&target.url, PageState::Failed)?;
        stats.record_state(PageState::Failed);
        Ok(())
    }

    fn enqueue_links(
        &self,
        target: &CrawlTarget,
        page_url: &Url,
        links: &[String],
        visited: &mut VisitedSet,
        frontier: &mut Frontier,
        stats: &mut CrawlStatistics,
    ) {
        let options = self.config.normalize_options();
        let policy = self.config.scope_policy();

        for raw_link in links {
            stats.links_discovered += 1;

            let Some(url) = normalize_link(raw_link, page_url, &options) else {
                tracing::debug!("Dropping link {:?} on {}", raw_link, target.url);
                stats.links_invalid += 1;
                continue;
            };

            if !url_in_scope(&url, &target.base_host, policy) {
                stats.links_out_of_scope += 1;
                continue;
            }

            frontier.push_unseen(target.child(String::from(url)), visited);
        }
    }
}

/// Crawls the configured seeds into the configured output files
///
/// The configuration is validated first. The output files are flushed even
/// when the crawl stops with an error.
pub async fn run_crawl(config: &Config) -> Result<CrawlStatistics, CrawlError> {
    validate(config)?;

    let crawler = Crawler::from_config(config)?;
    let mut sink = CsvReportSink::create(&config.output)?;

    let result = crawler.crawl(&config.base_urls, &mut sink).await;
    sink.finish()?;

    result
}
