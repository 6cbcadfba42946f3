//! Plain-text rendering for the `regions` and `summary` commands.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use wildfire_map_fire_models::{DisplayMode, SeverityLevel, SummaryStats};
use wildfire_map_index::RegionDataIndex;

/// Writes the index as a fixed-width table, one region per line.
pub fn write_regions_table(
    out: &mut impl Write,
    index: &RegionDataIndex,
    mode: DisplayMode,
) -> fmt::Result {
    writeln!(
        out,
        "{:<12} {:<16} {:<8} {:>5} {:<12} {:<8} DATE",
        "REGION", "PROVINCE", "STAGE", "PCT", "COMPLETION", "COLOR"
    )?;
    writeln!(out, "{}", "-".repeat(80))?;

    for record in index.records() {
        writeln!(
            out,
            "{:<12} {:<16} {:<8} {:>4}% {:<12} {:<8} {}",
            record.region_key,
            record.province,
            record.severity.label(),
            record.percentage,
            record.completion,
            record.display_color(mode),
            record.date,
        )?;
    }

    writeln!(out, "{} regions", index.len())
}

/// Writes summary statistics and per-province counts.
pub fn write_summary(
    out: &mut impl Write,
    stats: &SummaryStats,
    provinces: &BTreeMap<String, u64>,
) -> fmt::Result {
    writeln!(out, "Total incidents:   {}", stats.total)?;
    writeln!(out, "Completed:         {}", stats.completed_count)?;
    writeln!(out, "In progress:       {}", stats.in_progress_count)?;
    writeln!(out, "Average progress:  {}%", stats.average_percentage)?;

    writeln!(out)?;
    writeln!(out, "By stage:")?;
    for level in SeverityLevel::all() {
        writeln!(out, "  {:<8} {}", level.label(), stats.level_count(*level))?;
    }

    if !provinces.is_empty() {
        writeln!(out)?;
        writeln!(out, "By province:")?;
        for (province, count) in provinces {
            writeln!(out, "  {province:<16} {count}")?;
        }
    }

    Ok(())
}
