//! Crawl frontier
//!
//! A FIFO queue of pending targets. Pushing goes through the visited set, so
//! a URL already seen is never queued a second time and traversal is
//! breadth-first.

use crate::state::VisitedSet;
use std::collections::VecDeque;

/// One unit of pending work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Canonical URL to fetch
    pub url: String,

    /// Host of the seed this target was reached from
    pub base_host: String,

    /// Link distance from the seed (seeds are depth 0)
    pub depth: u32,

    /// Canonical URL of the page that linked here; `None` for seeds
    pub referrer: Option<String>,
}

impl CrawlTarget {
    /// Creates a depth-0 target for a seed
    pub fn seed(url: impl Into<String>, base_host: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            base_host: base_host.into(),
            depth: 0,
            referrer: None,
        }
    }

    /// Creates a target for a link found on this page
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            base_host: self.base_host.clone(),
            depth: self.depth + 1,
            referrer: Some(self.url.clone()),
        }
    }

    /// The page to blame when this target fails to load
    pub fn referrer_or_self(&self) -> &str {
        self.referrer.as_deref().unwrap_or(&self.url)
    }
}

/// FIFO queue of targets awaiting fetch
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CrawlTarget>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `target` unless its URL is already in `visited`
    ///
    /// Returns `true` if the target was enqueued.
    pub fn push_unseen(&mut self, target: CrawlTarget, visited: &mut VisitedSet) -> bool {
        if !visited.insert(&target.url) {
            return false;
        }
        self.queue.push_back(target);
        true
    }

    /// Takes the oldest pending target
    pub fn pop(&mut self) -> Option<CrawlTarget> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
