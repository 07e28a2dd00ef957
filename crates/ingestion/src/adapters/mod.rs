//! 数据源适配器模块
//!
//! 每个适配器负责将一种 JSON 数据源的条目转换为统一的 `Record`。

pub mod common;
mod epoch;
mod iso;

pub use epoch::EpochTimestampAdapter;
pub use iso::{parse_iso8601_ms, IsoTimestampAdapter};
