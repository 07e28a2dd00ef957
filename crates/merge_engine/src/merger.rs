//! Stable timestamp merge

use contracts::Record;
use tracing::info;

/// Concatenate record lists in the given order, then stable-sort by timestamp.
///
/// Records with equal timestamps keep their concatenation order.
pub fn merge_sorted<I>(lists: I) -> Vec<Record>
where
    I: IntoIterator<Item = Vec<Record>>,
{
    let mut combined: Vec<Record> = lists.into_iter().flatten().collect();
    info!(
        entries = combined.len(),
        "Combined dataset contains {} entries",
        combined.len()
    );

    info!("Sorting combined dataset by timestamp");
    combined.sort_by_key(Record::timestamp_ms);
    combined
}
