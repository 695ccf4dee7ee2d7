//! Process memory monitoring
//!
//! Samples the resident set size of the current process and keeps the peak
//! seen so far. Purely observational: nothing in the run depends on it.

use sysinfo::{Pid, System};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Tracks current and peak resident memory of this process
#[derive(Debug)]
pub struct MemoryMonitor {
    system: System,
    pid: Option<Pid>,
    peak_bytes: u64,
}

/// One memory reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySample {
    /// Resident memory at the time of the sample
    pub current_bytes: u64,
    /// Highest resident memory seen so far, including this sample
    pub peak_bytes: u64,
}

impl MemoryMonitor {
    /// Creates a monitor with no samples recorded
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::debug!("Memory sampling unavailable: {}", e);
                None
            }
        };

        Self {
            system: System::new(),
            pid,
            peak_bytes: 0,
        }
    }

    /// Reads current memory, updates the peak and logs both
    ///
    /// Returns `None` when resident memory cannot be read on this platform.
    pub fn sample(&mut self, label: &str) -> Option<MemorySample> {
        let current = self.current_rss_bytes()?;
        let sample = self.record(current);
        tracing::info!(
            "{} Current Memory: {} MB, Peak: {} MB",
            label,
            sample.current_bytes / BYTES_PER_MB,
            sample.peak_bytes / BYTES_PER_MB
        );
        Some(sample)
    }

    /// Folds a reading into the running peak
    pub fn record(&mut self, current_bytes: u64) -> MemorySample {
        self.peak_bytes = self.peak_bytes.max(current_bytes);
        MemorySample {
            current_bytes,
            peak_bytes: self.peak_bytes,
        }
    }

    /// Peak resident memory in bytes, or `None` if nothing was sampled
    pub fn peak_bytes(&self) -> Option<u64> {
        (self.peak_bytes > 0).then_some(self.peak_bytes)
    }

    /// Refreshes and reads the resident set size of this process in bytes
    fn current_rss_bytes(&mut self) -> Option<u64> {
        let pid = self.pid?;
        if !self.system.refresh_process(pid) {
            return None;
        }
        self.system
            .process(pid)
            .map(|process| process.memory())
            .filter(|&bytes| bytes > 0)
    }
}

impl Default for MemoryMonitor {
    fn default() -> Self {
        Self::new()
    }
}
