//! 记录适配器 trait

use contracts::{
    AdapterParseError, FieldMapping, Record, Rejection, RejectionReason, SourceBatch, SourceFormat,
};
use metrics::counter;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::adapters::common;

/// Record adapter trait
///
/// Implemented once per source schema. Implementors supply the field
/// mapping and the timestamp conversion; entry extraction and batch
/// bookkeeping are shared.
pub trait RecordAdapter {
    /// Tag stamped on every record this adapter produces
    fn source_format(&self) -> SourceFormat;

    /// Field names used to read an entry
    fn fields(&self) -> &FieldMapping;

    /// Convert the raw timestamp value into milliseconds since epoch
    fn timestamp_ms(&self, raw: &Value) -> Result<i64, AdapterParseError>;

    /// Convert one raw entry into a record
    fn adapt_entry(&self, entry: &Value) -> Result<Record, RejectionReason> {
        let fields = self.fields();
        let obj = common::as_object(entry)?;

        let sensor_id = common::required_str(obj, &fields.id_field)?;
        let timestamp_ms = self.timestamp_ms(common::required(obj, &fields.time_field)?)?;
        let value = common::required_number(obj, &fields.value_field)?;
        let unit = common::optional_str(obj, fields.unit_field.as_deref())?;

        Ok(Record::new(
            sensor_id,
            timestamp_ms,
            value,
            unit,
            self.source_format(),
        )?)
    }

    /// Convert a whole batch, collecting per-entry failures instead of aborting
    #[instrument(level = "debug", skip_all, fields(source = %self.source_format()))]
    fn adapt(&self, entries: &[Value]) -> SourceBatch {
        let source = self.source_format();
        let mut batch = SourceBatch::empty(source);
        batch.entries_seen = entries.len();

        debug!(source = %source, entries = entries.len(), "converting entries");

        for (index, entry) in entries.iter().enumerate() {
            match self.adapt_entry(entry) {
                Ok(record) => batch.records.push((index, record)),
                Err(reason) => {
                    warn!(
                        source = %source,
                        index,
                        kind = reason.kind(),
                        "Skipping entry at index {index} due to error: {reason}"
                    );
                    counter!(
                        "sensor_merge_rejections_total",
                        "source" => source.as_str(),
                        "reason" => reason.kind()
                    )
                    .increment(1);
                    batch.rejections.push(Rejection::new(source, index, reason));
                }
            }
        }

        counter!("sensor_merge_entries_total", "source" => source.as_str(), "status" => "accepted")
            .increment(batch.records.len() as u64);
        counter!("sensor_merge_entries_total", "source" => source.as_str(), "status" => "rejected")
            .increment(batch.rejections.len() as u64);

        debug!(
            source = %source,
            accepted = batch.records.len(),
            rejected = batch.rejections.len(),
            "conversion finished"
        );

        batch
    }
}
