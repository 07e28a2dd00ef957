//! Format A adapter: ISO-8601 string timestamps

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use contracts::{AdapterParseError, FieldMapping, IsoSourceConfig, SourceFormat};
use serde_json::Value;

use crate::adapter::RecordAdapter;
use crate::adapters::common::json_type_name;

/// Explicit-offset layouts tried after RFC 3339.
///
/// `%#z` takes `Z`, `±hh`, `±hhmm` and `±hh:mm`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Offset-less layouts, read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Adapter for sources whose timestamps are ISO-8601 strings
#[derive(Debug, Clone)]
pub struct IsoTimestampAdapter {
    fields: FieldMapping,
}

impl IsoTimestampAdapter {
    pub fn new(fields: FieldMapping) -> Self {
        Self { fields }
    }

    pub fn from_config(config: &IsoSourceConfig) -> Self {
        Self::new(config.fields())
    }
}

impl RecordAdapter for IsoTimestampAdapter {
    fn source_format(&self) -> SourceFormat {
        SourceFormat::A
    }

    fn fields(&self) -> &FieldMapping {
        &self.fields
    }

    fn timestamp_ms(&self, raw: &Value) -> Result<i64, AdapterParseError> {
        let field = &self.fields.time_field;
        let text = raw.as_str().ok_or_else(|| {
            AdapterParseError::wrong_type(field.as_str(), "ISO-8601 string", json_type_name(raw))
        })?;

        parse_iso8601_ms(text).ok_or_else(|| AdapterParseError::InvalidTimestamp {
            field: field.clone(),
            raw: text.to_string(),
            message: "expected ISO-8601 date-time such as 2024-01-01T00:00:00Z".to_string(),
        })
    }
}

/// Parse an ISO-8601 date-time into milliseconds since epoch, UTC.
///
/// Explicit offsets are normalized to UTC; strings without one are taken as
/// UTC. Sub-millisecond precision is floored.
pub fn parse_iso8601_ms(text: &str) -> Option<i64> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.timestamp_millis());
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}
