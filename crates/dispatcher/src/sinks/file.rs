//! JsonFileSink - writes the merged records as one JSON array

use contracts::{ContractError, Record, RecordSink, RunReport, SinkConfig, SourceFormat};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

use crate::error::DispatcherError;

/// Configuration for JsonFileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output file path
    pub path: PathBuf,
    /// Two-space indented output
    pub pretty: bool,
    /// Emit the `source_format` tag on every object
    pub include_source_format: bool,
}

impl FileSinkConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
            include_source_format: false,
        }
    }

    /// Create config from a sink entry of the blueprint
    pub fn from_sink_config(config: &SinkConfig) -> Result<Self, DispatcherError> {
        let path = config
            .path
            .clone()
            .ok_or_else(|| DispatcherError::sink_creation(&config.name, "file sink requires a path"))?;

        Ok(Self {
            path,
            pretty: config.pretty,
            include_source_format: config.include_source_format,
        })
    }
}

/// Output view of one record
#[derive(Serialize)]
struct OutputRecord<'a> {
    sensor_id: &'a str,
    timestamp_ms: i64,
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_format: Option<SourceFormat>,
}

impl<'a> OutputRecord<'a> {
    fn new(record: &'a Record, include_source_format: bool) -> Self {
        Self {
            sensor_id: record.sensor_id().as_str(),
            timestamp_ms: record.timestamp_ms(),
            value: record.value(),
            unit: record.unit(),
            source_format: include_source_format.then(|| record.source_format()),
        }
    }
}

/// Sink that writes the merged records to a JSON file
pub struct JsonFileSink {
    name: String,
    config: FileSinkConfig,
    writer: Option<BufWriter<File>>,
}

impl JsonFileSink {
    /// Create a new JsonFileSink; the file itself is created on first write
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> Self {
        Self {
            name: name.into(),
            config,
            writer: None,
        }
    }

    pub fn from_sink_config(config: &SinkConfig) -> Result<Self, DispatcherError> {
        Ok(Self::new(
            &config.name,
            FileSinkConfig::from_sink_config(config)?,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn write_records(&mut self, records: &[Record]) -> std::io::Result<()> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let view: Vec<OutputRecord<'_>> = records
            .iter()
            .map(|r| OutputRecord::new(r, self.config.include_source_format))
            .collect();

        let mut writer = BufWriter::new(File::create(&self.config.path)?);
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut writer, &view)
        } else {
            serde_json::to_writer(&mut writer, &view)
        }
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        self.writer = Some(writer);
        Ok(())
    }

    fn sink_error(&self, e: std::io::Error) -> ContractError {
        error!(sink = %self.name, path = %self.config.path.display(), error = %e, "Write failed");
        ContractError::sink_write(&self.name, format!("{}: {e}", self.config.path.display()))
    }
}

impl RecordSink for JsonFileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_write",
        skip(self, records, _report),
        fields(sink = %self.name, records = records.len())
    )]
    fn write(&mut self, records: &[Record], _report: &RunReport) -> Result<(), ContractError> {
        self.write_records(records).map_err(|e| self.sink_error(e))?;
        info!(
            sink = %self.name,
            path = %self.config.path.display(),
            records = records.len(),
            "Wrote merged records"
        );
        Ok(())
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    fn flush(&mut self) -> Result<(), ContractError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| self.sink_error(e))?;
            debug!(sink = %self.name, "JsonFileSink flushed");
        }
        Ok(())
    }
}
