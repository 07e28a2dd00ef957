//! SinkHandle - wraps a sink with its own metrics and failure isolation

use tracing::{debug, error, instrument};

use contracts::{ContractError, Record, RecordSink, RunReport};

use crate::metrics::SinkMetrics;

/// Handle to one configured sink
pub struct SinkHandle {
    /// Sink name
    name: String,
    sink: Box<dyn RecordSink + Send>,
    metrics: SinkMetrics,
}

impl SinkHandle {
    pub fn new<S: RecordSink + Send + 'static>(sink: S) -> Self {
        Self::from_boxed(Box::new(sink))
    }

    pub fn from_boxed(sink: Box<dyn RecordSink + Send>) -> Self {
        Self {
            name: sink.name().to_string(),
            sink,
            metrics: SinkMetrics::new(),
        }
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get current metrics
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Write then flush; a failure is logged and counted, never propagated past the caller
    #[instrument(name = "sink_handle_deliver", skip_all, fields(sink = %self.name))]
    pub fn deliver(&mut self, records: &[Record], report: &RunReport) -> Result<(), ContractError> {
        let result = self
            .sink
            .write(records, report)
            .and_then(|()| self.sink.flush());

        match &result {
            Ok(()) => {
                self.metrics.record_write(records.len());
                debug!(sink = %self.name, records = records.len(), "Sink delivered");
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(sink = %self.name, error = %e, "Sink failed");
            }
        }
        result
    }
}
