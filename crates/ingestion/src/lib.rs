//! # Ingestion
//!
//! Source ingestion module.
//!
//! Responsibilities:
//! - Read a raw JSON document into a list of entries (`RawSource`)
//! - Convert entries into `Record`s per source schema (`RecordAdapter`)
//! - Collect per-entry failures as `Rejection`s without aborting the batch
//!
//! ## Usage Example
//!
//! ```
//! use contracts::{FieldMapping, TimestampUnit};
//! use ingestion::{EpochTimestampAdapter, RawSource, RecordAdapter};
//!
//! let source = RawSource::from_slice(
//!     "data-2.json",
//!     br#"[{"id":"t2","ts_sec":1704067260,"reading":22.0}]"#,
//! )
//! .unwrap();
//!
//! let adapter = EpochTimestampAdapter::new(
//!     FieldMapping::new("id", "ts_sec", "reading"),
//!     TimestampUnit::Seconds,
//! );
//! let batch = adapter.adapt(source.entries());
//! assert_eq!(batch.records[0].1.timestamp_ms(), 1_704_067_260_000);
//! ```

mod adapter;
mod adapters;
mod error;
mod source;

// Re-exports
pub use adapter::RecordAdapter;
pub use adapters::{parse_iso8601_ms, EpochTimestampAdapter, IsoTimestampAdapter};
pub use error::{IngestionError, Result};
pub use source::RawSource;

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{FieldMapping, SourceFormat};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::{json, Value};

    fn random_entry(rng: &mut StdRng) -> (Value, bool) {
        let ts = rng.random_range(0..2_000_000_000i64);
        match rng.random_range(0..5) {
            0 => (json!({"sensor": "s", "time": ts}), false),
            1 => (json!({"sensor": "", "time": ts, "val": 1.0}), false),
            2 => (json!("not an object"), false),
            _ => (
                json!({"sensor": format!("s{}", ts % 7), "time": ts, "val": rng.random::<f64>()}),
                true,
            ),
        }
    }

    #[test]
    fn test_every_entry_accounted_for() {
        let adapter = EpochTimestampAdapter::new(
            FieldMapping::new("sensor", "time", "val"),
            contracts::TimestampUnit::Milliseconds,
        );
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..20 {
            let len = rng.random_range(0..200);
            let (entries, valid): (Vec<_>, Vec<_>) =
                (0..len).map(|_| random_entry(&mut rng)).unzip();

            let batch = adapter.adapt(&entries);
            assert_eq!(batch.entries_seen, len);
            assert_eq!(batch.records.len() + batch.rejections.len(), len);

            let accepted: Vec<usize> = batch.records.iter().map(|(i, _)| *i).collect();
            let expected: Vec<usize> = valid
                .iter()
                .enumerate()
                .filter_map(|(i, ok)| ok.then_some(i))
                .collect();
            assert_eq!(accepted, expected);
            assert!(batch
                .records
                .iter()
                .all(|(_, r)| r.source_format() == SourceFormat::B));
        }
    }

    #[test]
    fn test_empty_source_yields_empty_batch() {
        let adapter = IsoTimestampAdapter::new(FieldMapping::new("id", "timestamp", "value"));
        let batch = adapter.adapt(RawSource::empty("a").entries());
        assert_eq!(batch.entries_seen, 0);
        assert!(batch.records.is_empty());
        assert!(batch.rejections.is_empty());
    }
}
