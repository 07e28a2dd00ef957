//! Sink implementations
//!
//! Contains JsonFileSink and LogSink.

mod file;
mod log;

pub use self::file::{FileSinkConfig, JsonFileSink};
pub use self::log::LogSink;
