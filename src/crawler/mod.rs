//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching through a shared session
//! - HTML parsing for links and visible text
//! - Keyword matching
//! - The breadth-first frontier and the crawl engine that drives it

mod engine;
mod fetcher;
mod frontier;
mod matcher;
mod parser;

pub use engine::{run_crawl, Crawler};
pub use fetcher::{build_http_client, fetch_url, Fetch, FetchError, HttpFetcher, PageContent};
pub use frontier::{CrawlTarget, Frontier};
pub use matcher::{match_keywords, KeywordSet};
pub use parser::{HtmlParser, PageParser, ParsedPage};
