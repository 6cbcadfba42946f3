#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Severity and completion classification for wildfire status labels.
//!
//! Stage labels come from the upstream feed as free Korean text (`"3단계"`,
//! `"초기대응"`, ...). Classification is keyword containment evaluated in a
//! fixed order, first match wins. The branch order is part of the contract
//! with the feed's labelling conventions and must not be reordered.

use wildfire_map_fire_models::{
    ClassifiedSeverity, CompletionState, IncidentRecord, RawPercentage, SeverityLevel,
};

/// Markers for a level 3 response (digit or Sino-Korean numeral).
const LEVEL3_MARKERS: &[&str] = &["3", "세"];

/// Markers for a level 2 response.
const LEVEL2_MARKERS: &[&str] = &["2", "이"];

/// Markers for a level 1 response.
const LEVEL1_MARKERS: &[&str] = &["1", "일"];

/// Markers for the initial-response stage.
const INITIAL_RESPONSE_MARKERS: &[&str] = &["초기", "대응"];

/// Substring of a status label meaning "fully extinguished".
pub const COMPLETE_MARKER: &str = "완료";

/// Upper bound of a completion percentage.
const MAX_PERCENTAGE: u8 = 100;

/// Classifies a response-stage label into a [`SeverityLevel`].
///
/// Case-sensitive substring containment, checked from the highest level
/// down. Returns [`SeverityLevel::Unknown`] when nothing matches, including
/// for an empty label.
#[must_use]
pub fn classify_stage(raw_stage: &str) -> SeverityLevel {
    if contains_any(raw_stage, LEVEL3_MARKERS) {
        return SeverityLevel::Level3;
    }
    if contains_any(raw_stage, LEVEL2_MARKERS) {
        return SeverityLevel::Level2;
    }
    if contains_any(raw_stage, LEVEL1_MARKERS) {
        return SeverityLevel::Level1;
    }
    if contains_any(raw_stage, INITIAL_RESPONSE_MARKERS) {
        return SeverityLevel::InitialResponse;
    }

    SeverityLevel::Unknown
}

/// Derives the completion state from a status label and parsed percentage.
///
/// Complete when the status contains [`COMPLETE_MARKER`] or the percentage
/// is exactly 100. Either condition alone is sufficient.
#[must_use]
pub fn classify_completion(raw_status: &str, percentage: u8) -> CompletionState {
    if raw_status.contains(COMPLETE_MARKER) || percentage == MAX_PERCENTAGE {
        CompletionState::Complete
    } else {
        CompletionState::InProgress
    }
}

/// Parses a completion percentage, clamped to `0..=100`.
///
/// Strings have every `%` removed and their leading integer parsed
/// (`"85%"` → 85, `"72.5"` → 72). Numbers are truncated toward zero.
/// Missing or unparseable input yields 0.
#[must_use]
pub fn parse_percentage(raw: Option<&RawPercentage>) -> u8 {
    match raw {
        None => 0,
        Some(RawPercentage::Text(text)) => {
            let stripped = text.replace('%', "");
            leading_integer(&stripped).map_or(0, clamp_percentage)
        }
        Some(RawPercentage::Number(value)) => clamp_float_percentage(*value),
    }
}

/// Classifies stage, status, and percentage in one pass.
#[must_use]
pub fn classify(
    raw_stage: &str,
    raw_status: &str,
    raw_percentage: Option<&RawPercentage>,
) -> ClassifiedSeverity {
    let percentage = parse_percentage(raw_percentage);

    ClassifiedSeverity {
        severity: classify_stage(raw_stage),
        percentage,
        completion: classify_completion(raw_status, percentage),
    }
}

/// Classifies an [`IncidentRecord`].
#[must_use]
pub fn classify_record(record: &IncidentRecord) -> ClassifiedSeverity {
    classify(
        &record.raw_stage,
        &record.raw_status,
        record.raw_percentage.as_ref(),
    )
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Parses the leading (optionally signed) integer of `text`, ignoring
/// leading whitespace and anything after the digits. Saturates on overflow.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let digits: Vec<u32> = rest.chars().map_while(|c| c.to_digit(10)).collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.iter().fold(0i64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(i64::from(*digit))
    });

    Some(if negative { -magnitude } else { magnitude })
}

fn clamp_percentage(value: i64) -> u8 {
    u8::try_from(value.clamp(0, i64::from(MAX_PERCENTAGE))).unwrap_or(0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_float_percentage(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, f64::from(MAX_PERCENTAGE)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_numbered_stages() {
        assert_eq!(classify_stage("3단계"), SeverityLevel::Level3);
        assert_eq!(classify_stage("2단계"), SeverityLevel::Level2);
        assert_eq!(classify_stage("1단계"), SeverityLevel::Level1);
    }

    #[test]
    fn classifies_sino_korean_numerals() {
        assert_eq!(classify_stage("대응세단계"), SeverityLevel::Level3);
        assert_eq!(classify_stage("이단계"), SeverityLevel::Level2);
        assert_eq!(classify_stage("일단계"), SeverityLevel::Level1);
    }

    #[test]
    fn classifies_initial_response() {
        assert_eq!(classify_stage("초기대응"), SeverityLevel::InitialResponse);
        assert_eq!(classify_stage("초기"), SeverityLevel::InitialResponse);
        assert_eq!(classify_stage("대응중"), SeverityLevel::InitialResponse);
    }

    #[test]
    fn higher_level_wins_when_markers_overlap() {
        // Contains both "3" and "1": level 3 is checked first.
        assert_eq!(classify_stage("1→3단계"), SeverityLevel::Level3);
        // Numbered markers take precedence over "대응".
        assert_eq!(classify_stage("대응 2단계"), SeverityLevel::Level2);
    }

    #[test]
    fn unknown_fallback() {
        assert_eq!(classify_stage(""), SeverityLevel::Unknown);
        assert_eq!(classify_stage("단계"), SeverityLevel::Unknown);
        assert_eq!(classify_stage("stage four"), SeverityLevel::Unknown);
    }

    #[test]
    fn completion_from_status_or_percentage() {
        assert_eq!(
            classify_completion("진화완료", 60),
            CompletionState::Complete
        );
        assert_eq!(classify_completion("진화중", 100), CompletionState::Complete);
        assert_eq!(
            classify_completion("진화중", 85),
            CompletionState::InProgress
        );
        assert_eq!(classify_completion("", 99), CompletionState::InProgress);
        assert_eq!(classify_completion("", 100), CompletionState::Complete);
    }

    #[test]
    fn parses_percentages() {
        assert_eq!(parse_percentage(Some(&RawPercentage::from("85%"))), 85);
        assert_eq!(parse_percentage(Some(&RawPercentage::from(95.0))), 95);
        assert_eq!(parse_percentage(None), 0);
        assert_eq!(parse_percentage(Some(&RawPercentage::from("abc"))), 0);
        assert_eq!(parse_percentage(Some(&RawPercentage::from(""))), 0);
    }

    #[test]
    fn percentage_strings_are_lenient() {
        assert_eq!(parse_percentage(Some(&RawPercentage::from("%85%"))), 85);
        assert_eq!(parse_percentage(Some(&RawPercentage::from(" 40 %"))), 40);
        assert_eq!(parse_percentage(Some(&RawPercentage::from("72.5%"))), 72);
        assert_eq!(parse_percentage(Some(&RawPercentage::from("+7"))), 7);
    }

    #[test]
    fn percentages_are_clamped() {
        assert_eq!(parse_percentage(Some(&RawPercentage::from("150%"))), 100);
        assert_eq!(parse_percentage(Some(&RawPercentage::from("-20"))), 0);
        assert_eq!(
            parse_percentage(Some(&RawPercentage::from("99999999999999999999999"))),
            100
        );
        assert_eq!(parse_percentage(Some(&RawPercentage::from(250.0))), 100);
        assert_eq!(parse_percentage(Some(&RawPercentage::from(-1.5))), 0);
        assert_eq!(parse_percentage(Some(&RawPercentage::from(f64::NAN))), 0);
        assert_eq!(parse_percentage(Some(&RawPercentage::from(99.9))), 99);
    }

    #[test]
    fn clamped_overflow_counts_as_complete() {
        let classified = classify("1단계", "진화중", Some(&RawPercentage::from("120%")));
        assert_eq!(classified.percentage, 100);
        assert_eq!(classified.completion, CompletionState::Complete);
    }

    #[test]
    fn severity_and_completion_are_independent() {
        let classified = classify("3단계", "진화완료", Some(&RawPercentage::from("60%")));
        assert_eq!(classified.severity, SeverityLevel::Level3);
        assert_eq!(classified.completion, CompletionState::Complete);
        assert_eq!(classified.percentage, 60);
        assert_eq!(classified.color(), "#ff4d4d");
    }

    #[test]
    fn classifies_records() {
        let record = IncidentRecord {
            raw_address: "강원도 강릉시 성산면".to_string(),
            raw_stage: "초기대응".to_string(),
            raw_status: "진화중".to_string(),
            raw_percentage: None,
            date: "20250322".to_string(),
        };
        let classified = classify_record(&record);
        assert_eq!(classified.severity, SeverityLevel::InitialResponse);
        assert_eq!(classified.percentage, 0);
        assert_eq!(classified.completion, CompletionState::InProgress);
    }
}
