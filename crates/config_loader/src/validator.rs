//! Blueprint validation
//!
//! Rules:
//! - source paths non-empty
//! - field names non-empty and distinct within one source
//! - at least one sink, sink names non-empty and unique
//! - file sinks have a path

use std::collections::HashSet;
use std::path::Path;

use contracts::{ContractError, ConverterBlueprint, SinkType};

/// Validate a ConverterBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &ConverterBlueprint) -> Result<(), ContractError> {
    let a = &blueprint.format_a;
    validate_path("format_a.path", &a.path)?;
    validate_fields(
        "format_a",
        &a.id_field,
        &a.time_field,
        &a.value_field,
        a.unit_field.as_deref(),
    )?;

    let b = &blueprint.format_b;
    validate_path("format_b.path", &b.path)?;
    validate_fields(
        "format_b",
        &b.id_field,
        &b.time_field,
        &b.value_field,
        b.unit_field.as_deref(),
    )?;

    validate_sinks(blueprint)?;
    Ok(())
}

fn validate_path(field: &str, path: &Path) -> Result<(), ContractError> {
    if path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(field, "path cannot be empty"));
    }
    Ok(())
}

fn validate_fields(
    section: &str,
    id_field: &str,
    time_field: &str,
    value_field: &str,
    unit_field: Option<&str>,
) -> Result<(), ContractError> {
    let mut named = vec![
        ("id_field", id_field),
        ("time_field", time_field),
        ("value_field", value_field),
    ];
    if let Some(unit) = unit_field {
        named.push(("unit_field", unit));
    }

    let mut seen = HashSet::new();
    for (key, name) in named {
        if name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("{section}.{key}"),
                "field name cannot be empty",
            ));
        }
        if !seen.insert(name) {
            return Err(ContractError::config_validation(
                format!("{section}.{key}"),
                format!("field name '{name}' is mapped more than once"),
            ));
        }
    }
    Ok(())
}

fn validate_sinks(blueprint: &ConverterBlueprint) -> Result<(), ContractError> {
    if blueprint.sinks.is_empty() {
        return Err(ContractError::config_validation(
            "sinks",
            "at least one sink is required",
        ));
    }

    let mut names = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !names.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.sink_type == SinkType::File {
            match &sink.path {
                Some(path) => validate_path(&format!("sinks[{}].path", sink.name), path)?,
                None => {
                    return Err(ContractError::config_validation(
                        format!("sinks[{}].path", sink.name),
                        "file sink requires a path",
                    ))
                }
            }
        }
    }
    Ok(())
}
