//! Output module for crawl records
//!
//! This module handles:
//! - The `PageResult` and `BrokenLink` records and the `ReportSink` trait
//! - A CSV results file plus error log sink
//! - An in-memory sink
//! - End-of-run statistics

mod csv_sink;
mod memory;
pub mod stats;
mod traits;

pub use csv_sink::CsvReportSink;
pub use memory::MemorySink;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{BrokenLink, OutputError, OutputResult, PageResult, ReportSink};
