//! Owned choropleth map views.
//!
//! A [`MapView`] binds a set of boundary features to a display container.
//! Each render pass styles every feature from a [`RegionDataIndex`]
//! snapshot. Views are explicit handles: whoever creates one disposes it,
//! and [`MapViewSlot`] keeps at most one live view per container.

use std::sync::Arc;

use geojson::FeatureCollection;
use serde_json::Value;
use wildfire_map_fire_models::{DisplayMode, UNCLASSIFIED_COLOR};
use wildfire_map_index::RegionDataIndex;

use crate::{DEFAULT_NAME_PROPERTIES, feature_name};

/// Style property holding the fill color.
pub const FILL_COLOR_PROPERTY: &str = "fillColor";

/// Style property marking whether a feature matched an incident.
pub const CLASSIFIED_PROPERTY: &str = "classified";

/// Output of a single render pass.
#[derive(Debug, Clone)]
pub struct RenderedMap {
    /// Boundary features with style and incident properties attached.
    pub features: FeatureCollection,
    /// Number of features that matched an indexed region.
    pub matched_features: usize,
    /// Indexed region keys that no boundary feature matched.
    pub unmatched_regions: Vec<String>,
}

/// A map view bound to one display container.
#[derive(Debug)]
pub struct MapView {
    container: String,
    boundaries: Arc<FeatureCollection>,
    name_properties: Vec<String>,
}

impl MapView {
    /// Creates a view for `container` over shared boundary data.
    #[must_use]
    pub fn create(container: impl Into<String>, boundaries: Arc<FeatureCollection>) -> Self {
        let container = container.into();
        log::debug!(
            "Creating map view for container {container:?} ({} features)",
            boundaries.features.len()
        );
        Self {
            container,
            boundaries,
            name_properties: DEFAULT_NAME_PROPERTIES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Overrides the feature property keys used to read region names.
    #[must_use]
    pub fn with_name_properties(mut self, name_properties: Vec<String>) -> Self {
        self.name_properties = name_properties;
        self
    }

    /// The container this view is bound to.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Styles every boundary feature from `index`.
    ///
    /// Matched features get the record's display color plus its severity,
    /// completion, percentage, location, and date. Unmatched features get the
    /// neutral fill and `classified: false`.
    #[must_use]
    pub fn render(&self, index: &RegionDataIndex, mode: DisplayMode) -> RenderedMap {
        let mut features = (*self.boundaries).clone();
        let mut matched_features = 0;
        let mut matched_keys: Vec<&str> = Vec::new();

        for feature in &mut features.features {
            let record = feature_name(feature, &self.name_properties)
                .and_then(|name| index.get(name));

            let Some(record) = record else {
                feature.set_property(FILL_COLOR_PROPERTY, UNCLASSIFIED_COLOR);
                feature.set_property(CLASSIFIED_PROPERTY, false);
                continue;
            };

            matched_features += 1;
            matched_keys.push(record.region_key.as_str());

            feature.set_property(FILL_COLOR_PROPERTY, record.display_color(mode));
            feature.set_property(CLASSIFIED_PROPERTY, true);
            feature.set_property("severity", record.severity.as_ref());
            feature.set_property("severityLabel", record.severity.label());
            feature.set_property("completion", record.completion.as_ref());
            feature.set_property("percentage", Value::from(record.percentage));
            feature.set_property("location", record.location.as_str());
            feature.set_property("date", record.date.as_str());
        }

        let unmatched_regions: Vec<String> = index
            .keys()
            .filter(|key| !matched_keys.contains(key))
            .map(ToString::to_string)
            .collect();

        if !unmatched_regions.is_empty() {
            log::debug!(
                "Map view {:?}: {} indexed regions have no boundary feature: {unmatched_regions:?}",
                self.container,
                unmatched_regions.len(),
            );
        }

        RenderedMap {
            features,
            matched_features,
            unmatched_regions,
        }
    }

    /// Tears down this view, releasing its hold on the boundary data.
    pub fn dispose(self) {
        log::debug!("Disposing map view for container {:?}", self.container);
    }
}

/// Holds at most one live [`MapView`] for a container.
#[derive(Debug, Default)]
pub struct MapViewSlot {
    current: Option<MapView>,
}

impl MapViewSlot {
    /// Installs `view`, disposing the previously mounted view first.
    pub fn mount(&mut self, view: MapView) -> &MapView {
        if let Some(previous) = self.current.take() {
            previous.dispose();
        }
        self.current.insert(view)
    }

    /// The currently mounted view, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&MapView> {
        self.current.as_ref()
    }

    /// Disposes the mounted view, if any.
    pub fn unmount(&mut self) {
        if let Some(view) = self.current.take() {
            view.dispose();
        }
    }
}
