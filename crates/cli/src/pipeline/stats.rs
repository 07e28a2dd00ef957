//! Pipeline statistics and run summary output.

use std::time::Duration;

use contracts::{RunReport, RunStatus};
use dispatcher::MetricsSnapshot;
use observability::RunSummary;

/// Statistics from a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Diagnostics from the merge engine
    pub report: RunReport,

    /// Aggregated view of the merged records
    pub summary: RunSummary,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Per-sink delivery metrics
    pub sink_metrics: Vec<(String, MetricsSnapshot)>,
}

impl PipelineStats {
    pub fn status(&self) -> RunStatus {
        self.report.status
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!();
        print!("{}", self.summary);
        println!("Duration: {:.3}s", self.duration.as_secs_f64());

        if self.report.total_rejected() > 0 {
            println!("\nSkipped entries:");
            for rejection in self.report.rejections() {
                println!("  - {rejection}");
            }
        }

        if !self.sink_metrics.is_empty() {
            println!("\nSinks:");
            for (name, snapshot) in &self.sink_metrics {
                println!(
                    "  - {name}: {} records written, {} failures",
                    snapshot.records_written, snapshot.failure_count
                );
            }
        }

        println!();
    }
}
