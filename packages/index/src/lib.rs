#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region-keyed index over classified wildfire incidents.
//!
//! Every map view needs the same thing from a batch of incidents: given a
//! boundary feature name, find the classified record for that region. The
//! [`RegionDataIndex`] is rebuilt in full from each feed snapshot and holds
//! no state across refreshes. Aggregate statistics for the summary panels
//! live in [`summary`].

pub mod summary;

use std::collections::BTreeMap;

use serde::Serialize;
use wildfire_map_classify::classify_record;
use wildfire_map_fire_models::{ClassifiedRecord, IncidentRecord};
use wildfire_map_region::{ResolvedAddress, resolve};

pub use summary::{province_counts, summarize};

/// Mapping from region key to the classified incident for that region.
///
/// Iteration is ordered by region key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegionDataIndex {
    entries: BTreeMap<String, ClassifiedRecord>,
}

impl RegionDataIndex {
    /// Builds an index from `records` in input order.
    ///
    /// Records whose address does not resolve to a region key are skipped.
    /// When two records share a key the later one replaces the earlier.
    #[must_use]
    pub fn build(records: &[IncidentRecord]) -> Self {
        let mut entries = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            let resolved = resolve(&record.raw_address);
            if !resolved.is_indexable() {
                log::debug!(
                    "Skipping unresolvable address {:?} from region index",
                    record.raw_address
                );
                skipped += 1;
                continue;
            }
            let classified = classify_resolved(record, resolved);
            entries.insert(classified.region_key.clone(), classified);
        }

        log::info!(
            "Built region index: {} regions from {} records ({skipped} unresolvable)",
            entries.len(),
            records.len(),
        );

        Self { entries }
    }

    /// Looks up the record for a region key or boundary feature name.
    ///
    /// A missing entry is the normal outcome for regions without an active
    /// incident.
    #[must_use]
    pub fn get(&self, region_key: &str) -> Option<&ClassifiedRecord> {
        self.entries.get(region_key)
    }

    /// Number of indexed regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no region is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(region_key, record)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassifiedRecord)> {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }

    /// Iterates over region keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over classified records in key order.
    pub fn records(&self) -> impl Iterator<Item = &ClassifiedRecord> {
        self.entries.values()
    }
}

/// Builds a [`RegionDataIndex`] from a feed snapshot.
#[must_use]
pub fn build_index(records: &[IncidentRecord]) -> RegionDataIndex {
    RegionDataIndex::build(records)
}

/// Resolves and classifies a single record.
///
/// The returned record has an empty `region_key` when the address is
/// unresolvable; it is still fully classified.
#[must_use]
pub fn classify_incident(record: &IncidentRecord) -> ClassifiedRecord {
    classify_resolved(record, resolve(&record.raw_address))
}

fn classify_resolved(record: &IncidentRecord, resolved: ResolvedAddress) -> ClassifiedRecord {
    let classified = classify_record(record);

    ClassifiedRecord {
        region_key: resolved.region_key,
        province: resolved.province,
        severity: classified.severity,
        color: classified.color().to_string(),
        percentage: classified.percentage,
        completion: classified.completion,
        location: record.raw_address.clone(),
        date: record.date.clone(),
    }
}
