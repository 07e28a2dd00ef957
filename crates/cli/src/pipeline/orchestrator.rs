//! Pipeline orchestrator - coordinates all components.
//!
//! Inputs are read concurrently; conversion, merge and dispatch run on the
//! loaded buffers.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use contracts::{ContractError, ConverterBlueprint, SourceFormat};
use ingestion::{EpochTimestampAdapter, IsoTimestampAdapter, RawSource, RecordAdapter};
use merge_engine::MergeEngine;
use observability::{record_run_metrics, record_sink_dispatched, record_source_loaded, RunSummary};
use tracing::{info, instrument, warn};

use super::PipelineStats;
use crate::error::Result;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The validated run configuration
    pub blueprint: ConverterBlueprint,

    /// Missing input files become empty sources
    pub allow_missing: bool,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;
        let allow_missing = self.config.allow_missing;

        let (raw_a, raw_b) = tokio::try_join!(
            load_source(SourceFormat::A, &blueprint.format_a.path, allow_missing),
            load_source(SourceFormat::B, &blueprint.format_b.path, allow_missing),
        )?;

        info!("Converting {} entries", SourceFormat::A);
        let batch_a = IsoTimestampAdapter::from_config(&blueprint.format_a).adapt(raw_a.entries());

        info!("Converting {} entries", SourceFormat::B);
        let batch_b =
            EpochTimestampAdapter::from_config(&blueprint.format_b).adapt(raw_b.entries());

        let outcome = MergeEngine::from_blueprint(blueprint).run(batch_a, batch_b);
        record_run_metrics(&outcome.report);

        let mut dispatcher = dispatcher::create_dispatcher(blueprint.sinks.clone())?;
        let dispatched = dispatcher.dispatch(&outcome.records, &outcome.report);

        let sink_metrics = dispatcher.metrics();
        for (name, snapshot) in &sink_metrics {
            record_sink_dispatched(name, snapshot.failure_count == 0);
        }
        dispatched?;

        Ok(PipelineStats {
            summary: RunSummary::from_run(&outcome.records, &outcome.report),
            report: outcome.report,
            duration: start_time.elapsed(),
            sink_metrics,
        })
    }
}

/// Read one input document.
///
/// A missing file fails the run unless `allow_missing` is set, in which case
/// the source contributes zero entries.
#[instrument(name = "load_source", skip(path), fields(path = %path.display()))]
pub async fn load_source(
    source: SourceFormat,
    path: &Path,
    allow_missing: bool,
) -> Result<RawSource> {
    let name = path.display().to_string();

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound && allow_missing => {
            warn!(source = %source, path = %name, "Input file not found, treating as empty");
            return Ok(RawSource::empty(name));
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(
                ContractError::source_unavailable(source.as_str(), path, "input file not found")
                    .into(),
            );
        }
        Err(e) => {
            return Err(ContractError::source_unavailable(source.as_str(), path, e.to_string()).into());
        }
    };

    record_source_loaded(source, bytes.len());
    let raw = RawSource::from_slice(name, &bytes)?;
    info!(source = %source, entries = raw.len(), "Loaded {} entries from {}", raw.len(), raw.name());
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use contracts::RunStatus;
    use std::fs;

    fn blueprint_in(dir: &Path) -> ConverterBlueprint {
        let mut blueprint = ConverterBlueprint::default();
        blueprint.format_a.path = dir.join("data-1.json");
        blueprint.format_b.path = dir.join("data-2.json");
        blueprint.sinks[0].path = Some(dir.join("output.json"));
        blueprint
    }

    #[tokio::test]
    async fn test_load_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load_source(SourceFormat::A, &path, false).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::Contract(ContractError::SourceUnavailable { .. })
        ));

        let raw = load_source(SourceFormat::A, &path, true).await.unwrap();
        assert!(raw.is_empty());
    }

    #[tokio::test]
    async fn test_load_source_rejects_object_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"id":"x"}"#).unwrap();

        let err = load_source(SourceFormat::B, &path, false).await.unwrap_err();
        assert!(matches!(err, CliError::Ingestion(_)));
    }

    #[tokio::test]
    async fn test_pipeline_default_layout() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("data-1.json"),
            r#"[{"id":"t1","timestamp":"2024-01-01T00:00:00Z","value":21.5}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("data-2.json"),
            r#"[{"deviceId":"t2","time":1704067260000,"reading":22.0}]"#,
        )
        .unwrap();

        let stats = Pipeline::new(PipelineConfig {
            blueprint: blueprint_in(dir.path()),
            allow_missing: false,
        })
        .run()
        .await
        .unwrap();

        assert_eq!(stats.report.status, RunStatus::Complete);
        assert_eq!(stats.report.merged, 2);

        let output: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("output.json")).unwrap())
                .unwrap();
        assert_eq!(output[0]["sensor_id"], "t1");
        assert_eq!(output[1]["timestamp_ms"], 1_704_067_260_000i64);
    }

    #[tokio::test]
    async fn test_pipeline_with_missing_inputs_allowed() {
        let dir = tempfile::tempdir().unwrap();

        let stats = Pipeline::new(PipelineConfig {
            blueprint: blueprint_in(dir.path()),
            allow_missing: true,
        })
        .run()
        .await
        .unwrap();

        assert_eq!(stats.report.status, RunStatus::NoRecords);
        assert_eq!(
            fs::read_to_string(dir.path().join("output.json")).unwrap(),
            "[]"
        );
    }
}
