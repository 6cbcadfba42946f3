//! Config-driven feed definitions.
//!
//! A [`FeedDefinition`] describes where the record array sits inside a feed
//! response and which JSON keys carry each [`IncidentRecord`] field. One
//! generic normalizer handles every feed layout.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use wildfire_map_fire_models::{IncidentRecord, RawPercentage};

// ── Top-level feed definition ────────────────────────────────────────────

/// A complete, config-driven feed definition.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedDefinition {
    /// Unique identifier (e.g., `"forest_service"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Object keys leading from the response root to the record array.
    /// Empty means the root itself holds the records.
    #[serde(default)]
    pub records_path: Vec<String>,
    /// Fixed query parameters sent with every request.
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    /// Field name mappings for normalization.
    pub fields: FieldMapping,
}

/// Maps feed-specific JSON keys to [`IncidentRecord`] fields.
///
/// Each list is tried in order; the first key holding a non-empty value
/// wins.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    /// Keys for the administrative address.
    pub address: Vec<String>,
    /// Keys for the response-stage label.
    pub stage: Vec<String>,
    /// Keys for the progress-status label.
    pub status: Vec<String>,
    /// Keys for the completion percentage.
    pub percentage: Vec<String>,
    /// Keys for the occurrence date.
    pub date: Vec<String>,
}

impl FeedDefinition {
    /// Returns the raw record objects contained in a feed response.
    ///
    /// Follows [`Self::records_path`]. A single object at the end of the
    /// path is treated as a one-element batch; anything else (including the
    /// empty string some portals return for zero results) yields nothing.
    /// When the path does not resolve but the root is an array, the root
    /// is used, so plain record dumps load without a custom definition.
    #[must_use]
    pub fn extract_records<'a>(&self, body: &'a Value) -> Vec<&'a Value> {
        let target = self
            .records_path
            .iter()
            .try_fold(body, |node, key| node.get(key));

        match (target, body) {
            (Some(Value::Array(items)), _) | (None, Value::Array(items)) => items.iter().collect(),
            (Some(item @ Value::Object(_)), _) => vec![item],
            (Some(_), _) => Vec::new(),
            (None, _) => {
                log::warn!(
                    "{}: records path {:?} not found in response",
                    self.id,
                    self.records_path
                );
                Vec::new()
            }
        }
    }

    /// Normalizes a feed response into incident records.
    ///
    /// Records are ordered by date ascending (stable), so that the region
    /// index, which keeps the last record per region, holds the most recent
    /// one.
    #[must_use]
    pub fn normalize(&self, body: &Value) -> Vec<IncidentRecord> {
        let raw = self.extract_records(body);
        let raw_count = raw.len();

        let mut records: Vec<IncidentRecord> = raw
            .into_iter()
            .filter_map(|record| self.normalize_record(record))
            .collect();
        records.sort_by(|a, b| a.date.cmp(&b.date));

        if records.len() < raw_count {
            log::warn!(
                "{}: skipped {} non-object records",
                self.id,
                raw_count - records.len()
            );
        }

        records
    }

    /// Normalizes a single raw record. Returns `None` for non-objects.
    ///
    /// Missing fields become empty strings (or `None` for the percentage);
    /// classification downstream degrades them to defaults.
    #[must_use]
    pub fn normalize_record(&self, record: &Value) -> Option<IncidentRecord> {
        if !record.is_object() {
            return None;
        }

        let fields = &self.fields;

        Some(IncidentRecord {
            raw_address: first_text(record, &fields.address).unwrap_or_default(),
            raw_stage: first_text(record, &fields.stage).unwrap_or_default(),
            raw_status: first_text(record, &fields.status).unwrap_or_default(),
            raw_percentage: first_percentage(record, &fields.percentage),
            date: first_text(record, &fields.date)
                .map(|date| date.chars().filter(char::is_ascii_digit).collect())
                .unwrap_or_default(),
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

/// Returns the first non-empty value among `keys` as trimmed text.
/// Numbers are rendered with their JSON formatting.
fn first_text(record: &Value, keys: &[String]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Returns the first non-empty percentage among `keys`.
fn first_percentage(record: &Value, keys: &[String]) -> Option<RawPercentage> {
    keys.iter().find_map(|key| match record.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(RawPercentage::Text(s.trim().to_string())),
        Value::Number(n) => n.as_f64().map(RawPercentage::Number),
        _ => None,
    })
}

/// Parses a [`FeedDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_feed_toml(toml_str: &str) -> Result<FeedDefinition, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::feed_by_id;

    fn forest_service() -> FeedDefinition {
        feed_by_id("forest_service").unwrap()
    }

    #[test]
    fn parses_forest_service_toml() {
        let feed = forest_service();
        assert_eq!(feed.id, "forest_service");
        assert_eq!(feed.records_path, vec!["response", "body", "items", "item"]);
        assert_eq!(feed.query.get("_type").map(String::as_str), Some("json"));
        assert_eq!(feed.fields.address.first().map(String::as_str), Some("소재지"));
    }

    #[test]
    fn normalizes_korean_field_names() {
        let body = serde_json::json!({
            "response": { "body": { "items": { "item": [
                {
                    "소재지": "강원도 강릉시 성산면",
                    "대응단계": "2단계",
                    "진화상태": "진화중",
                    "진화율": "85%",
                    "발생일자": "20250322"
                },
                {
                    "소재지": " 경기도 가평군 설악면 ",
                    "대응단계": "3단계",
                    "진화상태": "진화완료",
                    "진화율": 60,
                    "발생일자": "2025-03-21"
                }
            ]}}}
        });

        let records = forest_service().normalize(&body);
        assert_eq!(records.len(), 2);

        // Sorted oldest first.
        assert_eq!(records[0].raw_address, "경기도 가평군 설악면");
        assert_eq!(records[0].date, "20250321");
        assert_eq!(records[0].raw_percentage, Some(RawPercentage::Number(60.0)));

        assert_eq!(records[1].raw_address, "강원도 강릉시 성산면");
        assert_eq!(records[1].raw_stage, "2단계");
        assert_eq!(records[1].raw_status, "진화중");
        assert_eq!(records[1].raw_percentage, Some(RawPercentage::from("85%")));
    }

    #[test]
    fn single_item_object_is_one_record() {
        let body = serde_json::json!({
            "response": { "body": { "items": { "item": {
                "소재지": "경상북도 의성군 단촌면",
                "대응단계": "1단계"
            }}}}
        });

        let records = forest_service().normalize(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raw_address, "경상북도 의성군 단촌면");
        assert_eq!(records[0].raw_status, "");
        assert_eq!(records[0].raw_percentage, None);
    }

    #[test]
    fn empty_items_yield_no_records() {
        let body = serde_json::json!({
            "response": { "body": { "items": "", "totalCount": 0 } }
        });
        assert!(forest_service().normalize(&body).is_empty());
    }

    #[test]
    fn missing_path_yields_no_records() {
        let body = serde_json::json!({ "error": "SERVICE_KEY_IS_NOT_REGISTERED_ERROR" });
        assert!(forest_service().normalize(&body).is_empty());
    }

    #[test]
    fn root_array_falls_back_to_english_keys() {
        let body = serde_json::json!([
            {
                "address": "강원도 강릉시 성산면",
                "stageLabel": "2단계",
                "statusLabel": "진화중",
                "completionPercentage": "85%",
                "date": 20_250_322
            },
            "not an object",
            42
        ]);

        let records = forest_service().normalize(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raw_stage, "2단계");
        assert_eq!(records[0].date, "20250322");
    }

    #[test]
    fn first_non_empty_key_wins() {
        let record = serde_json::json!({
            "소재지": "   ",
            "address": "경기도 가평군 설악면",
            "진화율": "",
            "completionPercentage": "40%"
        });
        let normalized = forest_service().normalize_record(&record).unwrap();
        assert_eq!(normalized.raw_address, "경기도 가평군 설악면");
        assert_eq!(normalized.raw_percentage, Some(RawPercentage::from("40%")));
    }

    #[test]
    fn sorting_is_stable_for_equal_dates() {
        let body = serde_json::json!([
            { "address": "a 가시", "date": "20250322" },
            { "address": "b 나시", "date": "20250322" },
            { "address": "c 다시", "date": "20250301" }
        ]);
        let addresses: Vec<String> = forest_service()
            .normalize(&body)
            .into_iter()
            .map(|r| r.raw_address)
            .collect();
        assert_eq!(addresses, vec!["c 다시", "a 가시", "b 나시"]);
    }

    #[test]
    fn rejects_incomplete_toml() {
        assert!(parse_feed_toml("id = \"x\"").is_err());
    }
}
