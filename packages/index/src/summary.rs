//! Aggregate statistics for the summary panels.
//!
//! Unlike the region index, these count every record, including ones whose
//! address could not be resolved to a map region.

use std::collections::BTreeMap;

use wildfire_map_classify::classify_record;
use wildfire_map_fire_models::{IncidentRecord, SummaryStats};
use wildfire_map_region::resolve;

/// Summarizes a batch of incident records.
///
/// `average_percentage` is the mean parsed percentage rounded half up; an
/// empty batch yields all zeros.
#[must_use]
pub fn summarize(records: &[IncidentRecord]) -> SummaryStats {
    let mut stats = SummaryStats::default();
    let mut percentage_sum = 0u64;

    for record in records {
        let classified = classify_record(record);

        *stats.by_level.entry(classified.severity).or_insert(0) += 1;
        if classified.completion.is_complete() {
            stats.completed_count += 1;
        } else {
            stats.in_progress_count += 1;
        }
        percentage_sum += u64::from(classified.percentage);
        stats.total += 1;
    }

    stats.average_percentage = rounded_mean(percentage_sum, stats.total);
    stats
}

/// Counts records per province (first address token).
///
/// Records with an empty address are left out.
#[must_use]
pub fn province_counts(records: &[IncidentRecord]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();

    for record in records {
        let province = resolve(&record.raw_address).province;
        if province.is_empty() {
            continue;
        }
        *counts.entry(province).or_insert(0) += 1;
    }

    counts
}

/// Integer mean rounded half up. Zero when `count` is zero.
fn rounded_mean(sum: u64, count: u64) -> u8 {
    if count == 0 {
        return 0;
    }
    let mean = (sum * 2 + count) / (count * 2);
    u8::try_from(mean).unwrap_or(u8::MAX)
}
