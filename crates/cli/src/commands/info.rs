//! `info` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{ConverterBlueprint, FieldMapping};
use tracing::info;

use super::load_blueprint;
use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let (blueprint, path) =
        load_blueprint(args.config.as_deref()).context("Failed to load configuration")?;

    info!(
        config = %path.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "<defaults>".to_string()),
        "Loading configuration info"
    );

    if args.json {
        println!("{}", ConfigLoader::to_json(&blueprint)?);
    } else if args.toml {
        print!("{}", ConfigLoader::to_toml(&blueprint)?);
    } else {
        print_config_info(&blueprint, path.is_none());
    }

    Ok(())
}

fn field_line(fields: &FieldMapping) -> String {
    let mut line = format!(
        "id={}, time={}, value={}",
        fields.id_field, fields.time_field, fields.value_field
    );
    if let Some(ref unit) = fields.unit_field {
        line.push_str(&format!(", unit={unit}"));
    }
    line
}

fn print_config_info(blueprint: &ConverterBlueprint, defaults: bool) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Sensor Merge Configuration                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    if defaults {
        println!("(no configuration file, showing built-in defaults)\n");
    }

    println!("📥 Sources");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ A (ISO-8601): {}", blueprint.format_a.path.display());
    println!("   │  └─ {}", field_line(&blueprint.format_a.fields()));
    println!(
        "   └─ B (epoch {:?}): {}",
        blueprint.format_b.timestamp_unit,
        blueprint.format_b.path.display()
    );
    println!("      └─ {}", field_line(&blueprint.format_b.fields()));

    println!("\n⚙️  Merge Settings");
    println!("   ├─ Duplicates: {:?}", blueprint.validation.duplicates);
    println!("   └─ Order: {:?}", blueprint.merge.order);

    println!("\n📤 Sinks ({})", blueprint.sinks.len());
    for (i, sink) in blueprint.sinks.iter().enumerate() {
        let is_last = i == blueprint.sinks.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        match &sink.path {
            Some(path) => println!(
                "   {} {} ({:?}) -> {}{}",
                prefix,
                sink.name,
                sink.sink_type,
                path.display(),
                if sink.pretty { " [pretty]" } else { "" }
            ),
            None => println!("   {} {} ({:?})", prefix, sink.name, sink.sink_type),
        }
    }

    println!();
}
