//! `run` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{ConverterBlueprint, RunStatus, SinkConfig, SinkType};
use tracing::{info, warn};

use super::load_blueprint;
use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let (mut blueprint, _) =
        load_blueprint(args.config.as_deref()).context("Failed to load configuration")?;

    apply_overrides(&mut blueprint, args);
    ConfigLoader::validate(&blueprint).context("Configuration is invalid after CLI overrides")?;

    info!(
        input_a = %blueprint.format_a.path.display(),
        input_b = %blueprint.format_b.path.display(),
        timestamp_unit = ?blueprint.format_b.timestamp_unit,
        sinks = blueprint.sinks.len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let pipeline = Pipeline::new(PipelineConfig {
        blueprint,
        allow_missing: args.allow_missing,
    });

    let stats = pipeline.run().await.context("Pipeline execution failed")?;

    info!(
        merged = stats.report.merged,
        rejected = stats.report.total_rejected(),
        duration_secs = stats.duration.as_secs_f64(),
        "Pipeline completed"
    );

    if args.json {
        let json =
            serde_json::to_string_pretty(&stats.report).context("Failed to serialize run report")?;
        println!("{json}");
    } else {
        stats.print_summary();
    }

    if stats.status() == RunStatus::NoRecords {
        warn!("No records were produced");
        if args.fail_on_empty {
            return Err(CliError::NoRecords {
                rejected: stats.report.total_rejected(),
            }
            .into());
        }
    }

    info!("Sensor merge finished");
    Ok(())
}

/// Apply `--input-a`, `--input-b` and `--output` on top of the loaded configuration
fn apply_overrides(blueprint: &mut ConverterBlueprint, args: &RunArgs) {
    if let Some(ref path) = args.input_a {
        info!(path = %path.display(), "Overriding format A input from CLI");
        blueprint.format_a.path = path.clone();
    }
    if let Some(ref path) = args.input_b {
        info!(path = %path.display(), "Overriding format B input from CLI");
        blueprint.format_b.path = path.clone();
    }
    if let Some(ref path) = args.output {
        info!(path = %path.display(), "Overriding output path from CLI");
        match blueprint
            .sinks
            .iter_mut()
            .find(|s| s.sink_type == SinkType::File)
        {
            Some(sink) => sink.path = Some(path.clone()),
            None => blueprint.sinks.push(SinkConfig::file("output", path)),
        }
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &ConverterBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Format A (ISO-8601):");
    println!("  Input: {}", blueprint.format_a.path.display());
    println!(
        "  Fields: id={}, time={}, value={}",
        blueprint.format_a.id_field, blueprint.format_a.time_field, blueprint.format_a.value_field
    );
    println!("Format B (epoch, {:?}):", blueprint.format_b.timestamp_unit);
    println!("  Input: {}", blueprint.format_b.path.display());
    println!(
        "  Fields: id={}, time={}, value={}",
        blueprint.format_b.id_field, blueprint.format_b.time_field, blueprint.format_b.value_field
    );
    println!("\nDuplicates: {:?}", blueprint.validation.duplicates);
    println!("Merge order: {:?}", blueprint.merge.order);

    println!("\nSinks ({}):", blueprint.sinks.len());
    for sink in &blueprint.sinks {
        match &sink.path {
            Some(path) => println!("  - {} ({:?}) -> {}", sink.name, sink.sink_type, path.display()),
            None => println!("  - {} ({:?})", sink.name, sink.sink_type),
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_overrides_replace_paths() {
        let mut blueprint = ConverterBlueprint::default();
        let args = RunArgs {
            input_a: Some(PathBuf::from("a.json")),
            input_b: Some(PathBuf::from("b.json")),
            output: Some(PathBuf::from("merged.json")),
            ..Default::default()
        };

        apply_overrides(&mut blueprint, &args);
        assert_eq!(blueprint.format_a.path, PathBuf::from("a.json"));
        assert_eq!(blueprint.format_b.path, PathBuf::from("b.json"));
        assert_eq!(blueprint.sinks.len(), 1);
        assert_eq!(blueprint.sinks[0].path, Some(PathBuf::from("merged.json")));
    }

    #[test]
    fn test_output_override_adds_file_sink_when_none() {
        let mut blueprint = ConverterBlueprint::default();
        blueprint.sinks = vec![SinkConfig {
            name: "log".to_string(),
            sink_type: SinkType::Log,
            path: None,
            pretty: true,
            include_source_format: false,
        }];
        let args = RunArgs {
            output: Some(PathBuf::from("merged.json")),
            ..Default::default()
        };

        apply_overrides(&mut blueprint, &args);
        assert_eq!(blueprint.sinks.len(), 2);
        assert_eq!(blueprint.sinks[1].sink_type, SinkType::File);
    }

    #[tokio::test]
    async fn test_fail_on_empty() {
        let dir = tempfile::tempdir().unwrap();
        let args = RunArgs {
            input_a: Some(dir.path().join("a.json")),
            input_b: Some(dir.path().join("b.json")),
            output: Some(dir.path().join("out.json")),
            allow_missing: true,
            fail_on_empty: true,
            ..Default::default()
        };

        let err = run_pipeline(&args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::NoRecords { rejected: 0 })
        ));

        let lenient = RunArgs {
            fail_on_empty: false,
            ..args
        };
        run_pipeline(&lenient).await.unwrap();
    }
}
