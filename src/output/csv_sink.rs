//! File-backed report sink
//!
//! Matching pages go to a CSV file with a `url,keywords` header; broken
//! links are appended to a plain-text error log, one timestamped line each.

use crate::config::OutputConfig;
use crate::output::traits::{BrokenLink, OutputResult, PageResult, ReportSink};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes results as CSV rows and broken links as log lines
pub struct CsvReportSink<R: Write, E: Write> {
    results: csv::Writer<R>,
    error_log: E,
    delimiter: String,
}

impl CsvReportSink<File, BufWriter<File>> {
    /// Opens the files named in the output configuration
    ///
    /// The results file is truncated; the error log is appended to, so
    /// failures from earlier runs are kept.
    pub fn create(config: &OutputConfig) -> OutputResult<Self> {
        let results = File::create(Path::new(&config.results_path))?;
        let error_log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(Path::new(&config.error_log_path))?;

        Self::new(results, BufWriter::new(error_log), &config.keyword_delimiter)
    }
}

impl<R: Write, E: Write> CsvReportSink<R, E> {
    /// Wraps arbitrary writers and writes the CSV header
    pub fn new(results: R, error_log: E, delimiter: &str) -> OutputResult<Self> {
        let mut results = csv::Writer::from_writer(results);
        results.write_record(["url", "keywords"])?;

        Ok(Self {
            results,
            error_log,
            delimiter: delimiter.to_string(),
        })
    }
}

impl<R: Write, E: Write> ReportSink for CsvReportSink<R, E> {
    fn record_match(&mut self, result: &PageResult) -> OutputResult<()> {
        let keywords = result.keywords_joined(&self.delimiter);
        self.results
            .write_record([result.url.as_str(), keywords.as_str()])?;
        Ok(())
    }

    fn record_broken(&mut self, link: &BrokenLink) -> OutputResult<()> {
        writeln!(
            self.error_log,
            "{} - ERROR - Broken link found: {}. Referring page: {}. Reason: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            link.target_url,
            link.referrer_url,
            link.reason
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.results.flush()?;
        self.error_log.flush()?;
        Ok(())
    }
}
