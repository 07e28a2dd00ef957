//! Main merge engine implementation.

use contracts::{
    ConcatOrder, ConverterBlueprint, MergeConfig, Record, RunReport, RunStatus, SourceBatch,
    SourceReport, ValidationConfig,
};
use tracing::{info, instrument};

use crate::merger::merge_sorted;
use crate::validation::Validator;

/// Result of one run: the ordered records plus diagnostics
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub records: Vec<Record>,
    pub report: RunReport,
}

/// Validation + merge over the two adapter batches
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    validator: Validator,
    order: ConcatOrder,
}

impl MergeEngine {
    /// Create a merge engine from its two config sections
    pub fn new(validation: &ValidationConfig, merge: &MergeConfig) -> Self {
        Self {
            validator: Validator::new(validation.duplicates),
            order: merge.order,
        }
    }

    pub fn from_blueprint(blueprint: &ConverterBlueprint) -> Self {
        Self::new(&blueprint.validation, &blueprint.merge)
    }

    /// Validate, concatenate in configured order and stable-sort.
    ///
    /// Never fails; everything that was dropped is listed in the report.
    #[instrument(
        name = "merge_run",
        skip_all,
        fields(order = ?self.order, a = first.entries_seen, b = second.entries_seen)
    )]
    pub fn run(&self, first: SourceBatch, second: SourceBatch) -> MergeOutcome {
        let mut batches = vec![first, second];
        let sources = self.order.sources();
        // unknown positions sort last, keeping caller order
        batches.sort_by_key(|b| sources.iter().position(|s| *s == b.source).unwrap_or(usize::MAX));

        let batches = self.validator.validate(batches);

        let mut reports = Vec::with_capacity(batches.len());
        let mut lists = Vec::with_capacity(batches.len());
        for batch in batches {
            reports.push(SourceReport {
                source: batch.source,
                entries_seen: batch.entries_seen,
                accepted: batch.records.len(),
                rejections: batch.rejections,
            });
            lists.push(batch.records.into_iter().map(|(_, r)| r).collect::<Vec<_>>());
        }

        let records = merge_sorted(lists);
        let report = RunReport {
            status: status_for(records.len(), &reports),
            merged: records.len(),
            sources: reports,
        };

        metrics::counter!("sensor_merge_records_merged_total").increment(records.len() as u64);
        info!(
            merged = report.merged,
            rejected = report.total_rejected(),
            status = ?report.status,
            "merge finished"
        );

        MergeOutcome { records, report }
    }
}

fn status_for(merged: usize, reports: &[SourceReport]) -> RunStatus {
    if merged == 0 {
        RunStatus::NoRecords
    } else if reports.iter().any(|r| !r.rejections.is_empty()) {
        RunStatus::Partial
    } else {
        RunStatus::Complete
    }
}
