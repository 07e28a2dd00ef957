//! Batch and run reporting types
//!
//! `SourceBatch` is the ingestion output: records plus every entry that
//! could not become one. `RunReport` is what the merge engine hands back to
//! the caller for rendering.

use std::fmt;

use serde::Serialize;

use crate::{AdapterParseError, InvalidRecordError, Record, SensorId, SourceFormat};

/// Why a single entry was dropped
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Required field missing, wrong type or unparsable timestamp
    Parse(AdapterParseError),
    /// Fields extracted but the record violated an invariant
    Invalid(InvalidRecordError),
    /// Same `(sensor_id, timestamp_ms)` as an earlier record with a different reading
    ConflictingDuplicate {
        sensor_id: SensorId,
        timestamp_ms: i64,
        first_source: SourceFormat,
        first_index: usize,
    },
}

impl RejectionReason {
    /// Short stable label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            RejectionReason::Parse(_) => "parse",
            RejectionReason::Invalid(_) => "invalid",
            RejectionReason::ConflictingDuplicate { .. } => "conflicting_duplicate",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Parse(err) => write!(f, "{err}"),
            RejectionReason::Invalid(err) => write!(f, "{err}"),
            RejectionReason::ConflictingDuplicate {
                sensor_id,
                timestamp_ms,
                first_source,
                first_index,
            } => write!(
                f,
                "conflicting duplicate of {sensor_id}@{timestamp_ms} (first seen in source {first_source} at index {first_index})"
            ),
        }
    }
}

impl From<AdapterParseError> for RejectionReason {
    fn from(err: AdapterParseError) -> Self {
        RejectionReason::Parse(err)
    }
}

impl From<InvalidRecordError> for RejectionReason {
    fn from(err: InvalidRecordError) -> Self {
        RejectionReason::Invalid(err)
    }
}

/// One dropped entry
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub source: SourceFormat,
    /// Position of the entry in its source array
    pub index: usize,
    pub reason: RejectionReason,
}

impl Rejection {
    pub fn new(source: SourceFormat, index: usize, reason: impl Into<RejectionReason>) -> Self {
        Self {
            source,
            index,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "source {} entry {}: {}",
            self.source, self.index, self.reason
        )
    }
}

impl Serialize for Rejection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Rejection", 4)?;
        state.serialize_field("source", &self.source)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("kind", self.reason.kind())?;
        state.serialize_field("message", &self.reason.to_string())?;
        state.end()
    }
}

/// Records and rejections from one source, in input order
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub source: SourceFormat,
    /// Number of raw entries the adapter looked at
    pub entries_seen: usize,
    /// Accepted records with the index of the entry each came from
    pub records: Vec<(usize, Record)>,
    pub rejections: Vec<Rejection>,
}

impl SourceBatch {
    /// Batch for a source that supplied no entries
    pub fn empty(source: SourceFormat) -> Self {
        Self {
            source,
            entries_seen: 0,
            records: Vec::new(),
            rejections: Vec::new(),
        }
    }
}

/// Terminal status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every entry became an output record
    Complete,
    /// Some entries were rejected, at least one record was merged
    Partial,
    /// Zero records merged
    NoRecords,
}

/// Per-source diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: SourceFormat,
    pub entries_seen: usize,
    pub accepted: usize,
    pub rejections: Vec<Rejection>,
}

impl SourceReport {
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }
}

/// Diagnostics for one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub sources: Vec<SourceReport>,
    pub merged: usize,
    pub status: RunStatus,
}

impl RunReport {
    pub fn source(&self, source: SourceFormat) -> Option<&SourceReport> {
        self.sources.iter().find(|s| s.source == source)
    }

    pub fn total_rejected(&self) -> usize {
        self.sources.iter().map(SourceReport::rejected).sum()
    }

    pub fn rejections(&self) -> impl Iterator<Item = &Rejection> {
        self.sources.iter().flat_map(|s| s.rejections.iter())
    }
}
