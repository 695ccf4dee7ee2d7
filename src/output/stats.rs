//! Run statistics
//!
//! Counters collected by the coordinator during one run and printed once the
//! run is over.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Summary of one stitch run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// When the crawl phase started
    pub started_at: DateTime<Utc>,

    /// Fetches attempted (one per discovered URL)
    pub attempted: usize,

    /// Fetches that returned usable content
    pub succeeded: usize,

    /// Fetches that failed, errored or came back empty
    pub failed: usize,

    /// Failed fetches that answered but had no usable content
    pub processing_failures: usize,

    /// Number of batches run
    pub batches: usize,

    /// Highest resident memory observed, if it could be read
    pub peak_memory_bytes: Option<u64>,

    /// Wall time of the crawl and finalize phases
    pub elapsed: Duration,

    /// Where the combined document was written
    pub document_path: PathBuf,
}

impl RunSummary {
    pub fn new(document_path: PathBuf) -> Self {
        Self {
            started_at: Utc::now(),
            attempted: 0,
            succeeded: 0,
            failed: 0,
            processing_failures: 0,
            batches: 0,
            peak_memory_bytes: None,
            elapsed: Duration::ZERO,
            document_path,
        }
    }

    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.attempted += 1;
        self.failed += 1;
    }

    /// Records a page that answered but had nothing to extract
    ///
    /// Counted as a failure; `processing_failures` is a subset of `failed`.
    pub fn record_processing_failure(&mut self) {
        self.record_failure();
        self.processing_failures += 1;
    }

    /// Pages that made it into the document
    pub fn pages_written(&self) -> usize {
        self.succeeded
    }

    /// Percentage of attempted fetches that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.attempted as f64) * 100.0
        }
    }

    pub fn peak_memory_mb(&self) -> Option<u64> {
        self.peak_memory_bytes.map(|b| b / BYTES_PER_MB)
    }
}

/// Formats a summary as human-readable text
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let secs = summary.elapsed.as_secs_f64();

    out.push_str("Summary:\n");
    out.push_str(&format!("  - Started: {}\n", summary.started_at.to_rfc3339()));
    out.push_str(&format!("  - Attempted: {}\n", summary.attempted));
    out.push_str(&format!("  - Successfully crawled: {}\n", summary.succeeded));
    out.push_str(&format!("  - Failed: {}\n", summary.failed));
    if summary.processing_failures > 0 {
        out.push_str(&format!(
            "    (no content extracted: {})\n",
            summary.processing_failures
        ));
    }
    out.push_str(&format!("  - Success rate: {:.1}%\n", summary.success_rate()));
    out.push_str(&format!("  - Batches: {}\n", summary.batches));
    out.push_str(&format!(
        "  - Document: {}\n",
        summary.document_path.display()
    ));
    out.push_str(&format!(
        "\nTotal execution time: {:.2} seconds ({:.2} minutes)\n",
        secs,
        secs / 60.0
    ));
    match summary.peak_memory_mb() {
        Some(mb) => out.push_str(&format!("Peak memory usage (MB): {}\n", mb)),
        None => out.push_str("Peak memory usage (MB): unavailable\n"),
    }

    out
}

/// Prints a summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", format_summary(summary));
}
