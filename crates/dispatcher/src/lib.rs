//! # Dispatcher
//!
//! 数据分发模块。
//!
//! 负责：
//! - 消费合并后的 `Record` 序列与 `RunReport`
//! - Fan-out 到多个 sinks
//! - 隔离失败的 sink，不影响其余输出

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{Record, RecordSink, RunReport};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{FileSinkConfig, JsonFileSink, LogSink};
