//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> 适配器 -> 合并引擎 -> sink 的端到端测试
//! - 排序稳定性与幂等性

#[cfg(test)]
mod contract_tests {
    use contracts::{ConverterBlueprint, Record, Rejection, SourceFormat, AdapterParseError};

    #[test]
    fn test_default_blueprint_snapshot() {
        let bp = ConverterBlueprint::default();
        let toml = config_loader::ConfigLoader::to_toml(&bp).unwrap();

        for expected in [
            "path = \"data-1.json\"",
            "path = \"data-2.json\"",
            "time_field = \"timestamp\"",
            "id_field = \"deviceId\"",
            "timestamp_unit = \"milliseconds\"",
            "path = \"output.json\"",
        ] {
            assert!(toml.contains(expected), "missing `{expected}` in:\n{toml}");
        }
    }

    #[test]
    fn test_record_serialization_snapshot() {
        let record = Record::new("t1", 1_704_067_200_000, 21.5, None, SourceFormat::A).unwrap();
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"sensor_id":"t1","timestamp_ms":1704067200000,"value":21.5,"source_format":"A"}"#
        );
    }

    #[test]
    fn test_rejection_serialization_snapshot() {
        let rejection = Rejection::new(SourceFormat::B, 4, AdapterParseError::missing("time"));
        let json = serde_json::to_value(&rejection).unwrap();
        assert_eq!(json["source"], "B");
        assert_eq!(json["index"], 4);
        assert_eq!(json["kind"], "parse");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        AdapterParseError, ConverterBlueprint, Record, RejectionReason, RunReport, RunStatus,
        SourceFormat,
    };
    use dispatcher::create_dispatcher;
    use ingestion::{EpochTimestampAdapter, IsoTimestampAdapter, RawSource, RecordAdapter};
    use merge_engine::MergeEngine;
    use serde_json::{json, Value};

    const EXAMPLE_CONFIG: &str = r#"
[format_a]
path = "data-1.json"
id_field = "sensor"
time_field = "time"
value_field = "val"

[format_b]
path = "data-2.json"
id_field = "id"
time_field = "ts_sec"
value_field = "reading"
timestamp_unit = "seconds"

[[sinks]]
name = "output"
sink_type = "file"
path = "output.json"

[[sinks]]
name = "summary"
sink_type = "log"
"#;

    /// Config with every relative path resolved under `dir`
    fn example_blueprint(dir: &Path) -> ConverterBlueprint {
        let mut bp = ConfigLoader::load_from_str(EXAMPLE_CONFIG, ConfigFormat::Toml).unwrap();
        bp.format_a.path = dir.join(&bp.format_a.path);
        bp.format_b.path = dir.join(&bp.format_b.path);
        for sink in &mut bp.sinks {
            sink.path = sink.path.as_ref().map(|p| dir.join(p));
        }
        bp
    }

    fn write_json(path: &Path, value: &Value) {
        fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
    }

    /// Full run over the files named by the blueprint
    fn run(bp: &ConverterBlueprint) -> (Vec<Record>, RunReport) {
        let raw_a =
            RawSource::from_slice("a", &fs::read(&bp.format_a.path).unwrap()).unwrap();
        let raw_b =
            RawSource::from_slice("b", &fs::read(&bp.format_b.path).unwrap()).unwrap();

        let batch_a = IsoTimestampAdapter::from_config(&bp.format_a).adapt(raw_a.entries());
        let batch_b = EpochTimestampAdapter::from_config(&bp.format_b).adapt(raw_b.entries());

        let outcome = MergeEngine::from_blueprint(bp).run(batch_a, batch_b);

        let mut dispatcher = create_dispatcher(bp.sinks.clone()).unwrap();
        dispatcher
            .dispatch(&outcome.records, &outcome.report)
            .unwrap();

        (outcome.records, outcome.report)
    }

    fn output_path(bp: &ConverterBlueprint) -> &Path {
        bp.sinks[0].path.as_deref().unwrap()
    }

    /// The two example entries end up in one sorted output
    #[test]
    fn test_example_entries() {
        let dir = tempfile::tempdir().unwrap();
        let bp = example_blueprint(dir.path());
        write_json(
            &bp.format_a.path,
            &json!([{"sensor":"t1","time":"2024-01-01T00:00:00Z","val":21.5}]),
        );
        write_json(
            &bp.format_b.path,
            &json!([{"id":"t2","ts_sec":1704067260,"reading":22.0}]),
        );

        let (records, report) = run(&bp);
        assert_eq!(report.status, RunStatus::Complete);

        let t1 = &records[0];
        assert_eq!(t1.sensor_id(), "t1");
        assert_eq!(t1.timestamp_ms(), 1_704_067_200_000);
        assert_eq!(t1.value(), 21.5);
        assert_eq!(t1.source_format(), SourceFormat::A);

        let t2 = &records[1];
        assert_eq!(t2.sensor_id(), "t2");
        assert_eq!(t2.timestamp_ms(), 1_704_067_260_000);
        assert_eq!(t2.value(), 22.0);
        assert_eq!(t2.source_format(), SourceFormat::B);

        let output: Value =
            serde_json::from_str(&fs::read_to_string(output_path(&bp)).unwrap()).unwrap();
        assert_eq!(
            output,
            json!([
                {"sensor_id":"t1","timestamp_ms":1_704_067_200_000i64,"value":21.5},
                {"sensor_id":"t2","timestamp_ms":1_704_067_260_000i64,"value":22.0}
            ])
        );
    }

    /// Byte-identical inputs give byte-identical output
    #[test]
    fn test_idempotent_output() {
        let dir = tempfile::tempdir().unwrap();
        let bp = example_blueprint(dir.path());
        write_json(
            &bp.format_a.path,
            &json!([
                {"sensor":"t1","time":"2024-01-01T00:00:05Z","val":1.0},
                {"sensor":"t1","time":"2024-01-01T00:00:00Z","val":2.0},
                {"sensor":"t3","time":"2024-01-01T00:00:05Z","val":3.0}
            ]),
        );
        write_json(
            &bp.format_b.path,
            &json!([
                {"id":"t2","ts_sec":1704067205,"reading":4.0},
                {"id":"t2","ts_sec":1704067200,"reading":5.0}
            ]),
        );

        run(&bp);
        let first = fs::read(output_path(&bp)).unwrap();
        run(&bp);
        let second = fs::read(output_path(&bp)).unwrap();
        assert_eq!(first, second);

        // ties at :00 and :05 resolve A before B, then by input position
        let output: Value = serde_json::from_slice(&first).unwrap();
        let ids: Vec<&str> = output
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["sensor_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["t1", "t2", "t1", "t3", "t2"]);
    }

    /// 10 entries with 2 malformed timestamps give 8 records and 2 parse rejections
    #[test]
    fn test_partial_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bp = example_blueprint(dir.path());

        let entries: Vec<Value> = (0..10)
            .map(|i| {
                let time = match i {
                    2 => json!("2024-02-30T00:00:00Z"),
                    6 => json!("soon"),
                    _ => json!(format!("2024-01-01T00:00:{i:02}Z")),
                };
                json!({"sensor": "t1", "time": time, "val": i})
            })
            .collect();
        write_json(&bp.format_a.path, &Value::Array(entries));
        write_json(&bp.format_b.path, &json!([]));

        let (records, report) = run(&bp);
        assert_eq!(records.len(), 8);
        assert_eq!(report.status, RunStatus::Partial);

        let source_a = report.source(SourceFormat::A).unwrap();
        assert_eq!(source_a.entries_seen, 10);
        assert_eq!(source_a.accepted, 8);
        let indices: Vec<usize> = source_a.rejections.iter().map(|r| r.index).collect();
        assert_eq!(indices, [2, 6]);
        assert!(source_a.rejections.iter().all(|r| matches!(
            r.reason,
            RejectionReason::Parse(AdapterParseError::InvalidTimestamp { .. })
        )));
    }

    /// Empty arrays are legal and yield an empty output array
    #[test]
    fn test_empty_sources() {
        let dir = tempfile::tempdir().unwrap();
        let bp = example_blueprint(dir.path());
        write_json(&bp.format_a.path, &json!([]));
        write_json(&bp.format_b.path, &json!([]));

        let (records, report) = run(&bp);
        assert!(records.is_empty());
        assert_eq!(report.status, RunStatus::NoRecords);
        assert_eq!(fs::read_to_string(output_path(&bp)).unwrap(), "[]");
    }

    /// Mixed failures across both sources, including conflicting duplicates
    #[test]
    fn test_reject_conflicting_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut bp = example_blueprint(dir.path());
        bp.validation.duplicates = contracts::DuplicatePolicy::RejectConflicting;
        bp.sinks[0].include_source_format = true;

        write_json(
            &bp.format_a.path,
            &json!([
                {"sensor":"t1","time":"2024-01-01T00:00:00Z","val":21.5},
                {"sensor":"","time":"2024-01-01T00:00:00Z","val":1.0}
            ]),
        );
        write_json(
            &bp.format_b.path,
            &json!([
                {"id":"t1","ts_sec":1704067200,"reading":99.0},
                {"id":"t1","ts_sec":1704067200,"reading":21.5},
                {"id":"t2","ts_sec":"1704067200","reading":1.0}
            ]),
        );

        let (records, report) = run(&bp);
        assert_eq!(records.len(), 2);
        assert_eq!(report.total_rejected(), 3);

        let kinds: Vec<&str> = report.rejections().map(|r| r.reason.kind()).collect();
        assert_eq!(kinds, ["invalid", "conflicting_duplicate", "parse"]);

        let output: Value =
            serde_json::from_str(&fs::read_to_string(output_path(&bp)).unwrap()).unwrap();
        assert_eq!(output[0]["source_format"], "A");
        assert_eq!(output[1]["source_format"], "B");
    }

    /// Inputs are read concurrently the same way the CLI reads them
    #[tokio::test]
    async fn test_concurrent_source_loading() {
        let dir = tempfile::tempdir().unwrap();
        let bp = example_blueprint(dir.path());
        write_json(&bp.format_a.path, &json!([{"sensor":"a","time":"2024-01-01","val":1}]));
        write_json(&bp.format_b.path, &json!([{"id":"b","ts_sec":0,"reading":2}]));

        let (a, b) = tokio::try_join!(
            tokio::fs::read(&bp.format_a.path),
            tokio::fs::read(&bp.format_b.path)
        )
        .unwrap();

        let raw_a = RawSource::from_slice("a", &a).unwrap();
        let raw_b = RawSource::from_slice("b", &b).unwrap();
        let outcome = MergeEngine::default().run(
            IsoTimestampAdapter::from_config(&bp.format_a).adapt(raw_a.entries()),
            EpochTimestampAdapter::from_config(&bp.format_b).adapt(raw_b.entries()),
        );

        assert_eq!(outcome.records[0].sensor_id(), "b");
        assert_eq!(outcome.records[1].sensor_id(), "a");
        assert_eq!(outcome.report.status, RunStatus::Complete);
    }

    /// Summary aggregation over a real run
    #[test]
    fn test_run_summary() {
        let dir = tempfile::tempdir().unwrap();
        let bp = example_blueprint(dir.path());
        write_json(
            &bp.format_a.path,
            &json!([{"sensor":"t1","time":"2024-01-01T00:00:00Z","val":10.0}]),
        );
        write_json(
            &bp.format_b.path,
            &json!([{"id":"t2","ts_sec":1704067260,"reading":20.0}, {"id":"t2"}]),
        );

        let (records, report) = run(&bp);
        let summary = observability::RunSummary::from_run(&records, &report);
        assert_eq!(summary.distinct_sensors, 2);
        assert_eq!(summary.total_rejected(), 1);
        assert_eq!(
            summary.time_span_ms,
            Some((1_704_067_200_000, 1_704_067_260_000))
        );
        assert!((summary.values.mean - 15.0).abs() < 1e-10);
    }
}

#[cfg(test)]
mod property_tests {
    use contracts::{FieldMapping, RunStatus, TimestampUnit};
    use ingestion::{EpochTimestampAdapter, IsoTimestampAdapter, RecordAdapter};
    use merge_engine::MergeEngine;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::{json, Value};

    fn iso(ms: i64) -> String {
        let secs = ms / 1000;
        let millis = ms % 1000;
        let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
        format!("1970-01-01T{h:02}:{m:02}:{s:02}.{millis:03}Z")
    }

    /// Random entries on both sides: output is sorted, stable, and every entry is accounted for
    #[test]
    fn test_random_sources_merge_sorted_and_stable() {
        let mut rng = StdRng::seed_from_u64(0xA11CE);
        let adapter_a = IsoTimestampAdapter::new(FieldMapping::new("id", "t", "v"));
        let adapter_b = EpochTimestampAdapter::new(
            FieldMapping::new("id", "t", "v"),
            TimestampUnit::Milliseconds,
        );

        for _ in 0..25 {
            let len_a = rng.random_range(0..50);
            let len_b = rng.random_range(0..50);

            // within one day so the ISO helper stays valid; narrow spread forces ties
            let a: Vec<Value> = (0..len_a)
                .map(|i| json!({"id": format!("a{i:02}"), "t": iso(rng.random_range(0..20) * 500), "v": 1.0}))
                .collect();
            let b: Vec<Value> = (0..len_b)
                .map(|i| json!({"id": format!("b{i:02}"), "t": rng.random_range(0..20) * 500, "v": 2.0}))
                .collect();

            let outcome = MergeEngine::default().run(adapter_a.adapt(&a), adapter_b.adapt(&b));
            assert_eq!(outcome.records.len(), len_a + len_b);
            assert_eq!(outcome.report.merged, len_a + len_b);
            if len_a + len_b == 0 {
                assert_eq!(outcome.report.status, RunStatus::NoRecords);
            }

            for pair in outcome.records.windows(2) {
                assert!(pair[0].timestamp_ms() <= pair[1].timestamp_ms());
                if pair[0].timestamp_ms() == pair[1].timestamp_ms() {
                    // "a.." < "b..", and ids within a source follow input order
                    assert!(pair[0].sensor_id().as_str() < pair[1].sensor_id().as_str());
                }
            }
        }
    }
}
