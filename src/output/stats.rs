//! Crawl statistics
//!
//! Counters collected while the engine runs, and a plain-text printer for
//! the end-of-run summary.

use crate::state::PageState;
use std::collections::HashMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Number of seeds crawled
    pub seeds: u64,

    /// Count of URLs by terminal state
    pub pages_by_state: HashMap<PageState, u64>,

    /// Raw links returned by the link extractor
    pub links_discovered: u64,

    /// Links dropped because they could not be normalized
    pub links_invalid: u64,

    /// Links dropped by the scope filter
    pub links_out_of_scope: u64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,

    /// Whether the overall crawl deadline stopped the run early
    pub timed_out: bool,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one URL reaching `state`
    pub fn record_state(&mut self, state: PageState) {
        *self.pages_by_state.entry(state).or_insert(0) += 1;
    }

    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Number of URLs for which a request was completed
    pub fn pages_fetched(&self) -> u64 {
        self.count(PageState::Matched) + self.count(PageState::Unmatched) + self.count(PageState::Failed)
    }
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Seeds crawled: {}", stats.seeds);
    println!("Pages fetched: {}", stats.pages_fetched());
    println!("Elapsed: {:.2}s", stats.elapsed.as_secs_f64());
    if stats.timed_out {
        println!("Stopped early: crawl deadline reached");
    }

    println!("\nPages by State:");
    for state in PageState::terminal_states() {
        println!("  {:12} {:>8}", format!("{}:", state), stats.count(state));
    }

    println!("\nLinks:");
    println!("  discovered:   {:>8}", stats.links_discovered);
    println!("  invalid:      {:>8}", stats.links_invalid);
    println!("  out of scope: {:>8}", stats.links_out_of_scope);
}
