//! Report records and the sink trait
//!
//! The crawl engine hands every record to a [`ReportSink`] as soon as it is
//! produced and keeps no copy of it.

use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A fetched page whose text mentioned at least one keyword
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageResult {
    /// Canonical URL of the page
    pub url: String,

    /// Keywords found, in their configured spelling
    pub matched_keywords: BTreeSet<String>,
}

impl PageResult {
    /// Joins the matched keywords with `delimiter`, in sorted order
    pub fn keywords_joined(&self, delimiter: &str) -> String {
        self.matched_keywords
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}

/// A link whose fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrokenLink {
    /// Page that linked to the target (the target itself for a seed)
    pub referrer_url: String,

    /// The URL that failed to load
    pub target_url: String,

    /// Short failure classification, e.g. `HttpStatus(404)` or `Timeout`
    pub reason: String,
}

/// Consumer of the two record streams a crawl produces
pub trait ReportSink {
    /// Records a page where at least one keyword matched
    fn record_match(&mut self, result: &PageResult) -> OutputResult<()>;

    /// Records a link that failed to load
    fn record_broken(&mut self, link: &BrokenLink) -> OutputResult<()>;

    /// Flushes anything buffered; called once after the crawl
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
