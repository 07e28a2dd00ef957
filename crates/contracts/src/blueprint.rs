//! ConverterBlueprint - Config Loader output
//!
//! Describes one complete run: where each source lives, how its fields map
//! onto a `Record`, how records are validated and merged, and where the
//! merged document goes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::SourceFormat;

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete run configuration
///
/// Every section has a default, so an empty document yields the classic
/// `data-1.json` + `data-2.json` → `output.json` conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// ISO-8601 timestamp source
    #[serde(default)]
    pub format_a: IsoSourceConfig,

    /// Numeric epoch timestamp source
    #[serde(default)]
    pub format_b: EpochSourceConfig,

    /// Record admission settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Merge settings
    #[serde(default)]
    pub merge: MergeConfig,

    /// Output routing
    #[serde(default = "default_sinks")]
    pub sinks: Vec<SinkConfig>,
}

impl Default for ConverterBlueprint {
    fn default() -> Self {
        Self {
            version: ConfigVersion::V1,
            format_a: IsoSourceConfig::default(),
            format_b: EpochSourceConfig::default(),
            validation: ValidationConfig::default(),
            merge: MergeConfig::default(),
            sinks: default_sinks(),
        }
    }
}

/// Field names for one source schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub id_field: String,
    pub time_field: String,
    pub value_field: String,
    pub unit_field: Option<String>,
}

impl FieldMapping {
    pub fn new(
        id_field: impl Into<String>,
        time_field: impl Into<String>,
        value_field: impl Into<String>,
    ) -> Self {
        Self {
            id_field: id_field.into(),
            time_field: time_field.into(),
            value_field: value_field.into(),
            unit_field: None,
        }
    }

    pub fn with_unit_field(mut self, unit_field: impl Into<String>) -> Self {
        self.unit_field = Some(unit_field.into());
        self
    }
}

/// Format A source: ISO-8601 string timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsoSourceConfig {
    pub path: PathBuf,
    pub id_field: String,
    pub time_field: String,
    pub value_field: String,
    pub unit_field: Option<String>,
}

impl Default for IsoSourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data-1.json"),
            id_field: "id".to_string(),
            time_field: "timestamp".to_string(),
            value_field: "value".to_string(),
            unit_field: None,
        }
    }
}

impl IsoSourceConfig {
    pub fn fields(&self) -> FieldMapping {
        FieldMapping {
            id_field: self.id_field.clone(),
            time_field: self.time_field.clone(),
            value_field: self.value_field.clone(),
            unit_field: self.unit_field.clone(),
        }
    }
}

/// Format B source: numeric timestamps in a declared unit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochSourceConfig {
    pub path: PathBuf,
    pub id_field: String,
    pub time_field: String,
    pub value_field: String,
    pub unit_field: Option<String>,
    pub timestamp_unit: TimestampUnit,
}

impl Default for EpochSourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data-2.json"),
            id_field: "deviceId".to_string(),
            time_field: "time".to_string(),
            value_field: "reading".to_string(),
            unit_field: None,
            timestamp_unit: TimestampUnit::Milliseconds,
        }
    }
}

impl EpochSourceConfig {
    pub fn fields(&self) -> FieldMapping {
        FieldMapping {
            id_field: self.id_field.clone(),
            time_field: self.time_field.clone(),
            value_field: self.value_field.clone(),
            unit_field: self.unit_field.clone(),
        }
    }
}

/// Unit of a numeric source timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampUnit {
    Seconds,
    #[default]
    Milliseconds,
}

impl TimestampUnit {
    /// Multiplier converting this unit into milliseconds
    pub fn scale(&self) -> i64 {
        match self {
            TimestampUnit::Seconds => 1000,
            TimestampUnit::Milliseconds => 1,
        }
    }
}

/// Record admission settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

/// Handling of records sharing `(sensor_id, timestamp_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep every record
    #[default]
    Keep,
    /// Reject a later record whose value or unit differs from the first one seen
    RejectConflicting,
}

/// Merge settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub order: ConcatOrder,
}

/// Concatenation order before the stable sort; decides ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatOrder {
    #[default]
    AThenB,
    BThenA,
}

impl ConcatOrder {
    pub fn sources(&self) -> [SourceFormat; 2] {
        match self {
            ConcatOrder::AThenB => [SourceFormat::A, SourceFormat::B],
            ConcatOrder::BThenA => [SourceFormat::B, SourceFormat::A],
        }
    }
}

/// Sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name (used in logs and errors)
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Output path (file sinks)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Pretty-print with two-space indentation
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Emit `source_format` on every output object
    #[serde(default)]
    pub include_source_format: bool,
}

impl SinkConfig {
    /// JSON file sink with the default layout
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            sink_type: SinkType::File,
            path: Some(path.into()),
            pretty: true,
            include_source_format: false,
        }
    }
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// JSON array written to a file
    File,
    /// Run summary via tracing
    Log,
}

fn default_pretty() -> bool {
    true
}

fn default_sinks() -> Vec<SinkConfig> {
    vec![SinkConfig::file("output", "output.json")]
}
