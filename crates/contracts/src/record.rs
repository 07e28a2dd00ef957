//! Record - the canonical sensor reading
//!
//! Every adapter converts its native entries into `Record`s. Fields are
//! private so a record can only exist in a state that passed [`Record::new`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{InvalidRecordError, SensorId};

/// Which adapter produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceFormat {
    /// ISO-8601 timestamp schema
    #[serde(rename = "A", alias = "a")]
    A,
    /// Numeric epoch timestamp schema
    #[serde(rename = "B", alias = "b")]
    B,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::A => "A",
            SourceFormat::B => "B",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical sensor reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    sensor_id: SensorId,
    timestamp_ms: i64,
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    source_format: SourceFormat,
}

impl Record {
    /// Build a record, enforcing the canonical invariants.
    ///
    /// # Errors
    /// - `EmptySensorId` if the id is empty or whitespace only
    /// - `NegativeTimestamp` if `timestamp_ms < 0`
    /// - `NonFiniteValue` if `value` is NaN or infinite
    pub fn new(
        sensor_id: impl Into<SensorId>,
        timestamp_ms: i64,
        value: f64,
        unit: Option<String>,
        source_format: SourceFormat,
    ) -> Result<Self, InvalidRecordError> {
        let record = Self {
            sensor_id: sensor_id.into(),
            timestamp_ms,
            value,
            unit,
            source_format,
        };
        record.check()?;
        Ok(record)
    }

    /// Re-run the admission rules applied by [`Record::new`].
    pub fn check(&self) -> Result<(), InvalidRecordError> {
        if self.sensor_id.is_blank() {
            return Err(InvalidRecordError::EmptySensorId);
        }
        if self.timestamp_ms < 0 {
            return Err(InvalidRecordError::NegativeTimestamp {
                timestamp_ms: self.timestamp_ms,
            });
        }
        if !self.value.is_finite() {
            return Err(InvalidRecordError::NonFiniteValue { value: self.value });
        }
        Ok(())
    }

    #[inline]
    pub fn sensor_id(&self) -> &SensorId {
        &self.sensor_id
    }

    /// Milliseconds since the Unix epoch, UTC
    #[inline]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    #[inline]
    pub fn source_format(&self) -> SourceFormat {
        self.source_format
    }

    /// Same reading as `other` apart from provenance.
    pub fn same_reading(&self, other: &Record) -> bool {
        self.sensor_id == other.sensor_id
            && self.timestamp_ms == other.timestamp_ms
            && self.value == other.value
            && self.unit == other.unit
    }
}
