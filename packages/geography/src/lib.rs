#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary data loading and choropleth map views.
//!
//! Boundary data is a `GeoJSON` `FeatureCollection` of administrative
//! polygons (for example the Korean `SIG` district boundaries). Each
//! feature's name property is the probe key into a
//! [`wildfire_map_index::RegionDataIndex`]. This crate never validates the
//! geometry itself; it only reads names and writes style properties.

pub mod map_view;

use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson};
use thiserror::Error;

pub use map_view::{MapView, MapViewSlot, RenderedMap};

/// Property keys checked, in order, for a feature's region name.
pub const DEFAULT_NAME_PROPERTIES: &[&str] = &["SIG_KOR_NM", "name", "NAME", "CTP_KOR_NM"];

/// Errors that can occur while loading boundary data.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// Reading the boundary file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid `GeoJSON`.
    #[error("GeoJSON parse error: {0}")]
    Parse(#[from] geojson::Error),

    /// The document parsed but is not a `FeatureCollection`.
    #[error("Expected a GeoJSON FeatureCollection, found a {kind}")]
    NotFeatureCollection {
        /// The top-level `GeoJSON` object type that was found.
        kind: &'static str,
    },
}

/// Parses boundary data from a `GeoJSON` string.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the string is not valid `GeoJSON` or is not a
/// `FeatureCollection`.
pub fn parse_boundaries(geojson_str: &str) -> Result<FeatureCollection, BoundaryError> {
    match geojson_str.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(BoundaryError::NotFeatureCollection { kind: "Feature" }),
        GeoJson::Geometry(_) => Err(BoundaryError::NotFeatureCollection { kind: "Geometry" }),
    }
}

/// Loads boundary data from a `GeoJSON` file.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the file cannot be read or parsed.
pub fn load_boundaries(path: &Path) -> Result<FeatureCollection, BoundaryError> {
    let contents = std::fs::read_to_string(path)?;
    let collection = parse_boundaries(&contents)?;
    log::info!(
        "Loaded {} boundary features from {}",
        collection.features.len(),
        path.display()
    );
    Ok(collection)
}

/// Returns the first non-empty string property of `feature` among
/// `name_properties`.
#[must_use]
pub fn feature_name<'a, S: AsRef<str>>(
    feature: &'a Feature,
    name_properties: &[S],
) -> Option<&'a str> {
    name_properties.iter().find_map(|key| {
        feature
            .property(key.as_ref())
            .and_then(|value| value.as_str())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "SIG_KOR_NM": "강릉시", "SIG_CD": "42150" },
                "geometry": { "type": "Polygon", "coordinates": [[[128.8, 37.7], [128.9, 37.7], [128.9, 37.8], [128.8, 37.7]]] }
            },
            {
                "type": "Feature",
                "properties": { "SIG_KOR_NM": "가평군", "SIG_CD": "41820" },
                "geometry": { "type": "Polygon", "coordinates": [[[127.4, 37.8], [127.5, 37.8], [127.5, 37.9], [127.4, 37.8]]] }
            },
            {
                "type": "Feature",
                "properties": { "name": "속초시" },
                "geometry": { "type": "Polygon", "coordinates": [[[128.5, 38.2], [128.6, 38.2], [128.6, 38.3], [128.5, 38.2]]] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": null
            }
        ]
    }"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feature_collection() {
        let collection = parse_boundaries(fixtures::BOUNDARIES).unwrap();
        assert_eq!(collection.features.len(), 4);
    }

    #[test]
    fn rejects_bare_geometry() {
        let err = parse_boundaries(r#"{"type": "Point", "coordinates": [127.0, 37.5]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            BoundaryError::NotFeatureCollection { kind: "Geometry" }
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            parse_boundaries("not geojson"),
            Err(BoundaryError::Parse(_))
        ));
    }

    #[test]
    fn reads_names_in_priority_order() {
        let collection = parse_boundaries(fixtures::BOUNDARIES).unwrap();
        let names: Vec<Option<&str>> = collection
            .features
            .iter()
            .map(|feature| feature_name(feature, DEFAULT_NAME_PROPERTIES))
            .collect();
        assert_eq!(
            names,
            vec![Some("강릉시"), Some("가평군"), Some("속초시"), None]
        );
    }

    #[test]
    fn custom_name_properties() {
        let collection = parse_boundaries(fixtures::BOUNDARIES).unwrap();
        assert_eq!(feature_name(&collection.features[0], &["SIG_CD"]), Some("42150"));
        assert_eq!(feature_name(&collection.features[2], &["SIG_CD"]), None);
    }
}
