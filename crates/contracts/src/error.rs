//! Layered error definitions
//!
//! Categorized by scope: run-level (config / source / sink) and entry-level
//! (record invariants / adapter parsing).

use std::path::PathBuf;

use thiserror::Error;

/// Unified run-level error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Source Errors =====
    /// Input source missing or unreadable
    #[error("source '{source_name}' unavailable at {}: {message}", .path.display())]
    SourceUnavailable {
        source_name: String,
        path: PathBuf,
        message: String,
    },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create source unavailable error
    pub fn source_unavailable(
        source_name: impl Into<String>,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}

/// A constructed record violates a canonical invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidRecordError {
    #[error("sensor_id must not be empty")]
    EmptySensorId,

    #[error("timestamp_ms must be non-negative, got {timestamp_ms}")]
    NegativeTimestamp { timestamp_ms: i64 },

    #[error("value must be a finite number, got {value}")]
    NonFiniteValue { value: f64 },
}

/// An adapter could not extract a record from one raw entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterParseError {
    #[error("entry is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },

    #[error("missing field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' expected {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{field}' has invalid timestamp '{raw}': {message}")]
    InvalidTimestamp {
        field: String,
        raw: String,
        message: String,
    },

    #[error("field '{field}' timestamp {raw} does not fit in milliseconds since epoch")]
    TimestampOutOfRange { field: String, raw: String },
}

impl AdapterParseError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
            found,
        }
    }
}
