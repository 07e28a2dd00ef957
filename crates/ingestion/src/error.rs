//! Ingestion 错误类型

use thiserror::Error;

/// Ingestion 错误 (整个数据源级别)
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 数据源不是合法 JSON
    #[error("source '{source_name}' is not valid JSON: {message}")]
    InvalidJson {
        /// 数据源名称
        source_name: String,
        /// 错误消息
        message: String,
    },

    /// 数据源顶层不是数组
    #[error("source '{source_name}' must be a JSON array, found {found}")]
    NotAnArray {
        /// 数据源名称
        source_name: String,
        /// 实际的 JSON 类型
        found: &'static str,
    },
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
