//! Format B adapter: numeric epoch timestamps

use contracts::{AdapterParseError, EpochSourceConfig, FieldMapping, SourceFormat, TimestampUnit};
use serde_json::{Number, Value};

use crate::adapter::RecordAdapter;
use crate::adapters::common::json_type_name;

/// 2^63 as f64, the first value past `i64::MAX`
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Adapter for sources whose timestamps are numbers in a fixed unit
#[derive(Debug, Clone)]
pub struct EpochTimestampAdapter {
    fields: FieldMapping,
    unit: TimestampUnit,
}

impl EpochTimestampAdapter {
    pub fn new(fields: FieldMapping, unit: TimestampUnit) -> Self {
        Self { fields, unit }
    }

    pub fn from_config(config: &EpochSourceConfig) -> Self {
        Self::new(config.fields(), config.timestamp_unit)
    }

    fn out_of_range(&self, raw: &Number) -> AdapterParseError {
        AdapterParseError::TimestampOutOfRange {
            field: self.fields.time_field.clone(),
            raw: raw.to_string(),
        }
    }
}

impl RecordAdapter for EpochTimestampAdapter {
    fn source_format(&self) -> SourceFormat {
        SourceFormat::B
    }

    fn fields(&self) -> &FieldMapping {
        &self.fields
    }

    fn timestamp_ms(&self, raw: &Value) -> Result<i64, AdapterParseError> {
        let Value::Number(number) = raw else {
            return Err(AdapterParseError::wrong_type(
                self.fields.time_field.as_str(),
                "number",
                json_type_name(raw),
            ));
        };

        let scale = self.unit.scale();

        // Integers stay exact
        if let Some(int) = number.as_i64() {
            return int
                .checked_mul(scale)
                .ok_or_else(|| self.out_of_range(number));
        }
        if number.is_u64() {
            return Err(self.out_of_range(number));
        }

        let scaled = number
            .as_f64()
            .map(|f| (f * scale as f64).round())
            .filter(|f| f.is_finite() && (-I64_BOUND..I64_BOUND).contains(f))
            .ok_or_else(|| self.out_of_range(number))?;

        Ok(scaled as i64)
    }
}
