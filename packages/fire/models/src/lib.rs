#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wildfire incident record types, severity taxonomy, and display colors.
//!
//! This crate defines the shared vocabulary used across the wildfire-map
//! system: the raw [`IncidentRecord`] handed over by the upstream feed, the
//! closed [`SeverityLevel`] taxonomy with its fixed palette, and the
//! [`ClassifiedRecord`] that every map view and summary panel consumes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Fill color used when a record is fully extinguished and the consumer
/// applies the completion-priority display rule.
pub const COMPLETE_COLOR: &str = "#4CAF50";

/// Fill color for map features that have no matching incident.
pub const UNCLASSIFIED_COLOR: &str = "#eeeeee";

/// Response stage of a wildfire, from `Unknown` (unrecognized label) to
/// `Level3` (highest escalation).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityLevel {
    /// Stage label could not be recognized
    Unknown = 0,
    /// Initial response (초기대응), before any numbered level is declared
    InitialResponse = 1,
    /// Level 1 response (1단계)
    Level1 = 2,
    /// Level 2 response (2단계)
    Level2 = 3,
    /// Level 3 response (3단계), the highest escalation
    Level3 = 4,
}

impl SeverityLevel {
    /// Returns the numeric rank of this level (0 = unknown, 4 = level 3).
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Returns the fixed display color for this level.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Level3 => "#ff4d4d",
            Self::Level2 => "#ffa500",
            Self::Level1 => "#ffff66",
            Self::InitialResponse => "#cce5ff",
            Self::Unknown => UNCLASSIFIED_COLOR,
        }
    }

    /// Returns the Korean legend label shown in the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Level3 => "3단계",
            Self::Level2 => "2단계",
            Self::Level1 => "1단계",
            Self::InitialResponse => "초기대응",
            Self::Unknown => "미분류",
        }
    }

    /// Returns all variants, highest severity first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Level3,
            Self::Level2,
            Self::Level1,
            Self::InitialResponse,
            Self::Unknown,
        ]
    }
}

/// Whether a fire has been fully extinguished.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionState {
    /// Suppression is still under way
    InProgress,
    /// Fully extinguished
    Complete,
}

impl CompletionState {
    /// Returns `true` for [`CompletionState::Complete`].
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// How a map view picks the fill color of a classified region.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DisplayMode {
    /// Always use the severity color.
    Severity,
    /// Use [`COMPLETE_COLOR`] for completed fires, severity color otherwise.
    #[default]
    CompletionPriority,
}

/// Resolves the fill color for a severity/completion pair under `mode`.
///
/// Severity and completion are independent axes; the completion override is
/// applied after the severity lookup.
#[must_use]
pub const fn display_color(
    severity: SeverityLevel,
    completion: CompletionState,
    mode: DisplayMode,
) -> &'static str {
    match (mode, completion) {
        (DisplayMode::CompletionPriority, CompletionState::Complete) => COMPLETE_COLOR,
        _ => severity.color(),
    }
}

/// A completion percentage as supplied by the feed: either a bare number or
/// a string such as `"85%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPercentage {
    /// Numeric percentage.
    Number(f64),
    /// Textual percentage, possibly with `%` characters.
    Text(String),
}

impl From<&str> for RawPercentage {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for RawPercentage {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One wildfire event as handed over by the upstream feed collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Space-delimited administrative address, e.g. `"강원도 강릉시 성산면"`.
    pub raw_address: String,
    /// Response stage label, e.g. `"2단계"` or `"초기대응"`.
    pub raw_stage: String,
    /// Progress status label, e.g. `"진화중"` or `"진화완료"`.
    pub raw_status: String,
    /// Completion percentage, if the feed supplied one.
    pub raw_percentage: Option<RawPercentage>,
    /// Occurrence date as `YYYYMMDD`.
    pub date: String,
}

impl IncidentRecord {
    /// Parses [`Self::date`] as a calendar date.
    ///
    /// Returns `None` when the value is not an 8-digit `YYYYMMDD` date.
    #[must_use]
    pub fn occurred_on(&self) -> Option<NaiveDate> {
        parse_compact_date(&self.date)
    }
}

/// Parses an 8-digit `YYYYMMDD` date. Returns `None` for anything else.
#[must_use]
pub fn parse_compact_date(date: &str) -> Option<NaiveDate> {
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y%m%d").ok()
}

/// Output of the severity classifier for a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedSeverity {
    /// Severity derived from the stage label.
    pub severity: SeverityLevel,
    /// Completion percentage clamped to `0..=100`.
    pub percentage: u8,
    /// Completion derived from the status label and percentage.
    pub completion: CompletionState,
}

impl ClassifiedSeverity {
    /// Severity color, without the completion override.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        self.severity.color()
    }
}

/// A classified incident keyed by the map region it resolves to.
///
/// Rebuilt from scratch on every refresh of the incident feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedRecord {
    /// District-level lookup key (empty when the address is unresolvable).
    pub region_key: String,
    /// First address token.
    pub province: String,
    /// Response stage.
    pub severity: SeverityLevel,
    /// Severity color (completion override not applied).
    pub color: String,
    /// Completion percentage, `0..=100`.
    pub percentage: u8,
    /// Whether the fire is fully extinguished.
    pub completion: CompletionState,
    /// Original address string.
    pub location: String,
    /// Occurrence date as `YYYYMMDD`.
    pub date: String,
}

impl ClassifiedRecord {
    /// Returns the fill color for this record under `mode`.
    #[must_use]
    pub const fn display_color(&self, mode: DisplayMode) -> &'static str {
        display_color(self.severity, self.completion, mode)
    }

    /// Parses [`Self::date`] as a calendar date.
    #[must_use]
    pub fn occurred_on(&self) -> Option<NaiveDate> {
        parse_compact_date(&self.date)
    }
}

/// Aggregate statistics over a batch of incident records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Number of records, including ones that could not be indexed.
    pub total: u64,
    /// Record count per severity level. Every level is present.
    pub by_level: BTreeMap<SeverityLevel, u64>,
    /// Records whose completion state is `Complete`.
    pub completed_count: u64,
    /// Records whose completion state is `InProgress`.
    pub in_progress_count: u64,
    /// Mean parsed percentage, rounded to the nearest integer.
    pub average_percentage: u8,
}

impl SummaryStats {
    /// Returns the count for `level`, zero when absent.
    #[must_use]
    pub fn level_count(&self, level: SeverityLevel) -> u64 {
        self.by_level.get(&level).copied().unwrap_or(0)
    }
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self {
            total: 0,
            by_level: SeverityLevel::all().iter().map(|level| (*level, 0)).collect(),
            completed_count: 0,
            in_progress_count: 0,
            average_percentage: 0,
        }
    }
}
