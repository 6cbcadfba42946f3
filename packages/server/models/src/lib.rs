#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the wildfire map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the classification types so the API contract can evolve
//! independently.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wildfire_map_fire_models::{
    ClassifiedRecord, CompletionState, DisplayMode, SeverityLevel, SummaryStats,
};

/// A classified incident as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegion {
    /// District-level region key (empty for unresolvable addresses).
    pub region_key: String,
    /// Province (first address token).
    pub province: String,
    /// Response stage.
    pub severity: SeverityLevel,
    /// Korean legend label for the stage.
    pub severity_label: String,
    /// Severity color without the completion override.
    pub severity_color: String,
    /// Fill color under the requested display mode.
    pub color: String,
    /// Completion percentage (0-100).
    pub percentage: u8,
    /// Whether the fire is fully extinguished.
    pub completion: CompletionState,
    /// Original address.
    pub location: String,
    /// Occurrence date as `YYYYMMDD`.
    pub date: String,
    /// Occurrence date (ISO 8601), when the raw date is well-formed.
    pub occurred_on: Option<NaiveDate>,
}

impl ApiRegion {
    /// Builds the API view of `record` with colors resolved under `mode`.
    #[must_use]
    pub fn new(record: &ClassifiedRecord, mode: DisplayMode) -> Self {
        Self {
            region_key: record.region_key.clone(),
            province: record.province.clone(),
            severity: record.severity,
            severity_label: record.severity.label().to_string(),
            severity_color: record.color.clone(),
            color: record.display_color(mode).to_string(),
            percentage: record.percentage,
            completion: record.completion,
            location: record.location.clone(),
            date: record.date.clone(),
            occurred_on: record.occurred_on(),
        }
    }
}

/// A severity level entry in the legend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSeverityLevel {
    /// Level name.
    pub name: SeverityLevel,
    /// Korean legend label.
    pub label: String,
    /// Fill color.
    pub color: String,
    /// Numeric rank (0 = unknown, 4 = level 3).
    pub rank: u8,
}

impl From<SeverityLevel> for ApiSeverityLevel {
    fn from(level: SeverityLevel) -> Self {
        Self {
            name: level,
            label: level.label().to_string(),
            color: level.color().to_string(),
            rank: level.rank(),
        }
    }
}

/// Summary panel response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    /// Aggregate statistics over every record in the snapshot.
    #[serde(flatten)]
    pub stats: SummaryStats,
    /// Incident count per province.
    pub provinces: BTreeMap<String, u64>,
}

/// Query parameters for endpoints that resolve display colors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayQueryParams {
    /// Display color rule; the server default applies when absent.
    pub mode: Option<DisplayMode>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
