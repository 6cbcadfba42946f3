#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address-to-region resolution for Korean administrative addresses.
//!
//! Incident addresses arrive as a space-delimited hierarchy:
//! - `"강원도 강릉시 성산면"` (province, city, township)
//! - `"경기도 가평군 설악면"` (province, county, township)
//! - `"서울특별시 중구 ..."` (metropolitan city, district)
//!
//! The district token is the join key against map boundary feature names.
//! Province names also end in `시`, so the first token is never considered
//! a district.

use serde::{Deserialize, Serialize};

/// Suffixes marking a district-level unit (city, county, district).
pub const DISTRICT_SUFFIXES: &[char] = &['시', '군', '구'];

/// Fallback token index used when no district suffix is found.
const FALLBACK_TOKEN_INDEX: usize = 2;

/// Result of resolving a raw address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAddress {
    /// First address token, empty if the address is empty.
    pub province: String,
    /// District-level lookup key, empty when the address is unresolvable.
    pub region_key: String,
}

impl ResolvedAddress {
    /// Returns `true` if a region key was found.
    #[must_use]
    pub fn is_indexable(&self) -> bool {
        !self.region_key.is_empty()
    }
}

/// Resolves a raw address into a province and region key.
///
/// Tokens are split on single spaces. The region key is:
/// 1. the first token after the province whose last character is `시`,
///    `군`, or `구`;
/// 2. otherwise the third token, if present;
/// 3. otherwise empty.
///
/// Never fails. An empty address resolves to empty strings.
#[must_use]
pub fn resolve(raw_address: &str) -> ResolvedAddress {
    let tokens: Vec<&str> = raw_address.split(' ').collect();

    let province = tokens.first().copied().unwrap_or_default();

    let region_key = tokens
        .iter()
        .skip(1)
        .find(|token| is_district(token))
        .or_else(|| tokens.get(FALLBACK_TOKEN_INDEX))
        .copied()
        .unwrap_or_default();

    ResolvedAddress {
        province: province.to_string(),
        region_key: region_key.to_string(),
    }
}

/// Returns `true` if `token` ends in a district-level suffix.
///
/// This is a plain suffix check: `"중구"` matches, `"중동"` does not.
#[must_use]
pub fn is_district(token: &str) -> bool {
    token.ends_with(DISTRICT_SUFFIXES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> String {
        resolve(raw).region_key
    }

    #[test]
    fn picks_city_after_province() {
        let resolved = resolve("강원도 강릉시 성산면");
        assert_eq!(resolved.province, "강원도");
        assert_eq!(resolved.region_key, "강릉시");
        assert!(resolved.is_indexable());
    }

    #[test]
    fn picks_county_and_district() {
        assert_eq!(key("경기도 가평군 설악면"), "가평군");
        assert_eq!(key("서울특별시 중구 을지로"), "중구");
    }

    #[test]
    fn skips_province_even_with_district_suffix() {
        // "부산광역시" ends in 시 but is token 0.
        assert_eq!(key("부산광역시 해운대구 우동"), "해운대구");
        assert_eq!(resolve("부산광역시").region_key, "");
    }

    #[test]
    fn first_district_token_wins() {
        assert_eq!(key("경상북도 포항시 남구 대송면"), "포항시");
    }

    #[test]
    fn district_may_appear_after_index_two() {
        assert_eq!(key("경상남도 산청 시천면 중산리 산청군"), "산청군");
    }

    #[test]
    fn falls_back_to_third_token() {
        assert_eq!(key("세종특별자치시 조치원읍 신흥리"), "신흥리");
        assert_eq!(key("세종특별자치시 조치원읍 X"), "X");
    }

    #[test]
    fn two_tokens_without_suffix_is_unresolvable() {
        let resolved = resolve("세종특별자치시 조치원읍");
        assert_eq!(resolved.province, "세종특별자치시");
        assert_eq!(resolved.region_key, "");
        assert!(!resolved.is_indexable());
    }

    #[test]
    fn single_token_is_unresolvable() {
        let resolved = resolve("강원도");
        assert_eq!(resolved.province, "강원도");
        assert_eq!(resolved.region_key, "");
    }

    #[test]
    fn empty_address_resolves_to_empty() {
        assert_eq!(resolve(""), ResolvedAddress::default());
    }

    #[test]
    fn suffix_check_is_literal() {
        assert!(is_district("중구"));
        assert!(is_district("강릉시"));
        assert!(is_district("가평군"));
        assert!(!is_district("중동"));
        assert!(!is_district("성산면"));
        assert!(!is_district(""));
    }
}
