//! Dispatcher - fan-out of the merged records to every sink

use tracing::{info, instrument, warn};

use contracts::{Record, RunReport, SinkConfig, SinkType};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{JsonFileSink, LogSink};

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Sink configurations
    pub sinks: Vec<SinkConfig>,
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(config: DispatcherConfig) -> Self {
        Self { config }
    }

    /// Build the dispatcher, creating every sink up front
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(sink_count = self.config.sinks.len())
    )]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let handles = self
            .config
            .sinks
            .iter()
            .map(create_sink_handle)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Dispatcher { handles })
    }
}

/// Create a SinkHandle from configuration
#[instrument(
    name = "dispatcher_create_sink_handle",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
fn create_sink_handle(config: &SinkConfig) -> Result<SinkHandle, DispatcherError> {
    match config.sink_type {
        SinkType::Log => Ok(SinkHandle::new(LogSink::new(&config.name))),
        SinkType::File => Ok(SinkHandle::new(JsonFileSink::from_sink_config(config)?)),
    }
}

/// The main Dispatcher that fans out records to sinks
pub struct Dispatcher {
    handles: Vec<SinkHandle>,
}

impl Dispatcher {
    /// Create a dispatcher with custom sink handles (for testing)
    pub fn with_handles(handles: Vec<SinkHandle>) -> Self {
        Self { handles }
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.handles.iter().map(SinkHandle::name).collect()
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Deliver the records to every sink.
    ///
    /// A failing sink does not stop the others; all failures are reported
    /// together afterwards.
    #[instrument(name = "dispatcher_dispatch", skip_all, fields(records = records.len()))]
    pub fn dispatch(&mut self, records: &[Record], report: &RunReport) -> Result<(), DispatcherError> {
        info!(sinks = self.handles.len(), "Dispatching merged records");

        let failed: Vec<String> = self
            .handles
            .iter_mut()
            .filter_map(|handle| {
                handle
                    .deliver(records, report)
                    .err()
                    .map(|_| handle.name().to_string())
            })
            .collect();

        if failed.is_empty() {
            return Ok(());
        }

        warn!(failed = failed.len(), total = self.handles.len(), "Some sinks failed");
        Err(DispatcherError::SinksFailed {
            failed,
            total: self.handles.len(),
        })
    }
}

/// Convenience function to create a dispatcher from sink configs
#[instrument(name = "dispatcher_create", skip(sink_configs))]
pub fn create_dispatcher(sink_configs: Vec<SinkConfig>) -> Result<Dispatcher, DispatcherError> {
    let config = DispatcherConfig {
        sinks: sink_configs,
    };
    DispatcherBuilder::new(config).build()
}
