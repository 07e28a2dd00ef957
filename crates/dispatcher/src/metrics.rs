//! Sink metrics for observability

/// Metrics for a single sink
#[derive(Debug, Default, Clone)]
pub struct SinkMetrics {
    /// Total successful writes
    write_count: u64,
    /// Total write or flush failures
    failure_count: u64,
    /// Records handed to the sink by successful writes
    records_written: u64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Record a successful write of `records` records
    pub fn record_write(&mut self, records: usize) {
        self.write_count += 1;
        self.records_written += records as u64;
    }

    pub fn record_failure(&mut self) {
        self.failure_count += 1;
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            write_count: self.write_count,
            failure_count: self.failure_count,
            records_written: self.records_written,
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub write_count: u64,
    pub failure_count: u64,
    pub records_written: u64,
}
