use crate::output::traits::{BrokenLink, OutputResult, PageResult, ReportSink};

/// Sink that keeps every record in memory, in emission order
///
/// Handy for library callers that post-process results, and for tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub matches: Vec<PageResult>,
    pub broken: Vec<BrokenLink>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for MemorySink {
    fn record_match(&mut self, result: &PageResult) -> OutputResult<()> {
        self.matches.push(result.clone());
        Ok(())
    }

    fn record_broken(&mut self, link: &BrokenLink) -> OutputResult<()> {
        self.broken.push(link.clone());
        Ok(())
    }
}
