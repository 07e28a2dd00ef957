//! 校验层
//!
//! 对适配器产出的记录再次执行准入检查，并按配置处理重复读数。
//! 批次必须按拼接顺序传入，重复判定以先出现者为准。

use std::collections::HashMap;

use contracts::{
    DuplicatePolicy, Record, Rejection, RejectionReason, SensorId, SourceBatch, SourceFormat,
};
use tracing::warn;

/// First record seen for a `(sensor_id, timestamp_ms)` key
struct FirstSeen {
    source: SourceFormat,
    index: usize,
    record: Record,
}

/// Validation layer between the adapters and the merger
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    duplicates: DuplicatePolicy,
}

impl Validator {
    pub fn new(duplicates: DuplicatePolicy) -> Self {
        Self { duplicates }
    }

    /// Filter each batch in place order, moving failures into its rejections.
    ///
    /// Rejections of every returned batch are sorted by entry index.
    pub fn validate(&self, batches: Vec<SourceBatch>) -> Vec<SourceBatch> {
        let mut seen: HashMap<(SensorId, i64), FirstSeen> = HashMap::new();

        batches
            .into_iter()
            .map(|batch| self.validate_batch(batch, &mut seen))
            .collect()
    }

    fn validate_batch(
        &self,
        batch: SourceBatch,
        seen: &mut HashMap<(SensorId, i64), FirstSeen>,
    ) -> SourceBatch {
        let SourceBatch {
            source,
            entries_seen,
            records,
            mut rejections,
        } = batch;

        let mut accepted = Vec::with_capacity(records.len());
        for (index, record) in records {
            match self.check(source, index, &record, seen) {
                Ok(()) => accepted.push((index, record)),
                Err(reason) => {
                    warn!(
                        source = %source,
                        index,
                        kind = reason.kind(),
                        "Skipping entry at index {index} due to error: {reason}"
                    );
                    metrics::counter!(
                        "sensor_merge_rejections_total",
                        "source" => source.as_str(),
                        "reason" => reason.kind()
                    )
                    .increment(1);
                    rejections.push(Rejection::new(source, index, reason));
                }
            }
        }

        rejections.sort_by_key(|r| r.index);

        SourceBatch {
            source,
            entries_seen,
            records: accepted,
            rejections,
        }
    }

    fn check(
        &self,
        source: SourceFormat,
        index: usize,
        record: &Record,
        seen: &mut HashMap<(SensorId, i64), FirstSeen>,
    ) -> Result<(), RejectionReason> {
        record.check()?;

        if self.duplicates == DuplicatePolicy::Keep {
            return Ok(());
        }

        let key = (record.sensor_id().clone(), record.timestamp_ms());
        match seen.get(&key) {
            Some(first) if !first.record.same_reading(record) => {
                Err(RejectionReason::ConflictingDuplicate {
                    sensor_id: key.0,
                    timestamp_ms: key.1,
                    first_source: first.source,
                    first_index: first.index,
                })
            }
            Some(_) => Ok(()),
            None => {
                seen.insert(
                    key,
                    FirstSeen {
                        source,
                        index,
                        record: record.clone(),
                    },
                );
                Ok(())
            }
        }
    }
}
