//! LogSink - logs the run summary via tracing

use chrono::{DateTime, SecondsFormat, Utc};
use contracts::{ContractError, Record, RecordSink, RunReport};
use tracing::{debug, info, instrument};

/// Sink that logs a summary instead of writing records anywhere
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_summary(&self, records: &[Record], report: &RunReport) {
        for source in &report.sources {
            info!(
                sink = %self.name,
                source = %source.source,
                entries = source.entries_seen,
                accepted = source.accepted,
                rejected = source.rejected(),
                "source summary"
            );
        }

        info!(
            sink = %self.name,
            merged = report.merged,
            status = ?report.status,
            first = %format_ms(records.first()),
            last = %format_ms(records.last()),
            "merged records"
        );

        for record in records {
            debug!(
                sink = %self.name,
                sensor_id = %record.sensor_id(),
                timestamp_ms = record.timestamp_ms(),
                value = record.value(),
                source_format = %record.source_format(),
                "record"
            );
        }
    }
}

/// Render a record's timestamp as RFC 3339, `-` when absent
fn format_ms(record: Option<&Record>) -> String {
    record
        .and_then(|r| DateTime::<Utc>::from_timestamp_millis(r.timestamp_ms()))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| "-".to_string())
}

impl RecordSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, records, report),
        fields(sink = %self.name, records = records.len())
    )]
    fn write(&mut self, records: &[Record], report: &RunReport) -> Result<(), ContractError> {
        self.log_summary(records, report);
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log sink
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{RunStatus, SourceFormat};

    #[test]
    fn test_log_sink_write() {
        let mut sink = LogSink::new("test_log");
        let records = vec![Record::new("t1", 0, 1.0, None, SourceFormat::A).unwrap()];
        let report = RunReport {
            sources: Vec::new(),
            merged: 1,
            status: RunStatus::Complete,
        };

        assert!(sink.write(&records, &report).is_ok());
        assert!(sink.flush().is_ok());
    }

    #[test]
    fn test_log_sink_name() {
        let sink = LogSink::new("my_logger");
        assert_eq!(sink.name(), "my_logger");
    }

    #[test]
    fn test_format_ms() {
        let record = Record::new("t1", 1_704_067_200_000, 1.0, None, SourceFormat::A).unwrap();
        assert_eq!(format_ms(Some(&record)), "2024-01-01T00:00:00.000Z");
        assert_eq!(format_ms(None), "-");
    }
}
