//! # Merge Engine
//!
//! 双数据源记录合并引擎。
//!
//! 负责：
//! - 校验层：重新执行记录准入检查，按配置处理冲突的重复读数
//! - 按配置的拼接顺序合并两个批次
//! - 按 `timestamp_ms` 稳定排序
//! - 生成 `RunReport`
//!
//! ## 使用示例
//!
//! ```
//! use contracts::{Record, SourceBatch, SourceFormat, RunStatus};
//! use merge_engine::MergeEngine;
//!
//! let mut a = SourceBatch::empty(SourceFormat::A);
//! a.entries_seen = 1;
//! a.records.push((0, Record::new("t1", 1_704_067_200_000, 21.5, None, SourceFormat::A).unwrap()));
//!
//! let outcome = MergeEngine::default().run(a, SourceBatch::empty(SourceFormat::B));
//! assert_eq!(outcome.report.status, RunStatus::Complete);
//! assert_eq!(outcome.records.len(), 1);
//! ```

mod engine;
mod merger;
mod validation;

// Re-exports
pub use contracts::{ConcatOrder, DuplicatePolicy, MergeConfig, ValidationConfig};
pub use engine::{MergeEngine, MergeOutcome};
pub use merger::merge_sorted;
pub use validation::Validator;

// Re-export contracts types
pub use contracts::{Record, RunReport, RunStatus, SourceBatch};
