//! 运行指标模块
//!
//! 基于 RunReport 记录和汇总一次合并运行的指标。

use std::collections::BTreeSet;
use std::fmt;

use contracts::{Record, RunReport, RunStatus, SourceFormat};
use metrics::{counter, gauge, histogram};

/// 从 RunReport 记录指标
///
/// 每次运行结束时调用一次。
pub fn record_run_metrics(report: &RunReport) {
    let status = match report.status {
        RunStatus::Complete => "complete",
        RunStatus::Partial => "partial",
        RunStatus::NoRecords => "no_records",
    };
    counter!("sensor_merge_runs_total", "status" => status).increment(1);

    gauge!("sensor_merge_last_run_merged").set(report.merged as f64);

    for source in &report.sources {
        gauge!(
            "sensor_merge_last_run_rejected",
            "source" => source.source.as_str()
        )
        .set(source.rejected() as f64);
    }
}

/// 记录数据源加载
pub fn record_source_loaded(source: SourceFormat, bytes: usize) {
    histogram!("sensor_merge_source_bytes", "source" => source.as_str()).record(bytes as f64);
}

/// 记录 sink 分发结果
pub fn record_sink_dispatched(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "sensor_merge_sink_dispatch_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// 单个数据源的摘要行
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub source: SourceFormat,
    pub entries_seen: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// 运行摘要
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub status: RunStatus,
    pub merged: usize,
    pub sources: Vec<SourceLine>,
    /// 不同 sensor_id 的数量
    pub distinct_sensors: usize,
    /// 首尾记录的 timestamp_ms
    pub time_span_ms: Option<(i64, i64)>,
    /// 读数统计
    pub values: StatsSummary,
}

impl RunSummary {
    /// 由合并结果生成摘要；`records` 需按时间排序
    pub fn from_run(records: &[Record], report: &RunReport) -> Self {
        let mut values = RunningStats::default();
        let mut sensors = BTreeSet::new();
        for record in records {
            values.push(record.value());
            sensors.insert(record.sensor_id().as_str());
        }

        Self {
            status: report.status,
            merged: report.merged,
            sources: report
                .sources
                .iter()
                .map(|s| SourceLine {
                    source: s.source,
                    entries_seen: s.entries_seen,
                    accepted: s.accepted,
                    rejected: s.rejected(),
                })
                .collect(),
            distinct_sensors: sensors.len(),
            time_span_ms: records
                .first()
                .zip(records.last())
                .map(|(first, last)| (first.timestamp_ms(), last.timestamp_ms())),
            values: StatsSummary::from(&values),
        }
    }

    pub fn total_rejected(&self) -> usize {
        self.sources.iter().map(|s| s.rejected).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Sensor Merge Summary ===")?;
        writeln!(f, "Status: {:?}", self.status)?;
        for line in &self.sources {
            writeln!(
                f,
                "Source {}: {} entries, {} accepted, {} rejected",
                line.source, line.entries_seen, line.accepted, line.rejected
            )?;
        }
        writeln!(f, "Merged records: {}", self.merged)?;
        writeln!(f, "Distinct sensors: {}", self.distinct_sensors)?;
        match self.time_span_ms {
            Some((first, last)) => writeln!(f, "Time span (ms): {first} .. {last}")?,
            None => writeln!(f, "Time span (ms): N/A")?,
        }
        writeln!(f, "Values: {}", self.values)
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
