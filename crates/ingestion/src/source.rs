//! 原始数据源
//!
//! 一个数据源是顶层为 JSON 数组的文档，数组中的每个元素是一条待转换的条目。

use serde_json::Value;

use crate::adapters::common::json_type_name;
use crate::error::{IngestionError, Result};

/// Raw entries read from one input document
#[derive(Debug, Clone, Default)]
pub struct RawSource {
    name: String,
    entries: Vec<Value>,
}

impl RawSource {
    /// Parse a JSON document whose top level must be an array
    pub fn from_slice(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| IngestionError::InvalidJson {
                source_name: name.clone(),
                message: e.to_string(),
            })?;
        Self::from_value(name, value)
    }

    /// Wrap an already-parsed document
    pub fn from_value(name: impl Into<String>, value: Value) -> Result<Self> {
        let name = name.into();
        match value {
            Value::Array(entries) => Ok(Self { name, entries }),
            other => Err(IngestionError::NotAnArray {
                source_name: name,
                found: json_type_name(&other),
            }),
        }
    }

    /// A source with no entries, used when an input is allowed to be absent
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let source = RawSource::from_slice("a", br#"[{"x":1},{"x":2}]"#).unwrap();
        assert_eq!(source.name(), "a");
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn test_empty_array_is_valid() {
        let source = RawSource::from_slice("a", b"[]").unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn test_object_top_level_rejected() {
        let err = RawSource::from_slice("b", br#"{"x":1}"#).unwrap_err();
        assert!(matches!(
            err,
            IngestionError::NotAnArray { found: "object", .. }
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = RawSource::from_slice("b", b"[{").unwrap_err();
        assert!(matches!(err, IngestionError::InvalidJson { .. }));
        assert!(err.to_string().contains("source 'b'"));
    }
}
