//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use wildfire_map_fire_models::DisplayMode;
use wildfire_map_source::registry::DEFAULT_FEED_ID;
use wildfire_map_source::{
    IncidentSource, OpenDataFeed, SnapshotFile, SourceError, StaticSource,
};

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Where incident records come from.
    pub source: SourceConfig,
    /// `GeoJSON` boundary file for the `/api/map` endpoint.
    pub boundaries: Option<PathBuf>,
    /// Display color rule used when a request does not pick one.
    pub display_mode: DisplayMode,
}

/// Incident source selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Embedded feed definition id.
    pub feed: String,
    /// Upstream endpoint.
    pub feed_url: Option<String>,
    /// Open-data service key.
    pub service_key: Option<String>,
    /// Local JSON snapshot. Takes priority over `feed_url`.
    pub snapshot: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            source: SourceConfig::default(),
            boundaries: None,
            display_mode: DisplayMode::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            feed: DEFAULT_FEED_ID.to_string(),
            feed_url: None,
            service_key: None,
            snapshot: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BIND_ADDR` | Listener address | `127.0.0.1` |
    /// | `PORT` | Listener port | `8080` |
    /// | `WILDFIRE_MAP_FEED` | Embedded feed id | `forest_service` |
    /// | `WILDFIRE_MAP_FEED_URL` | Upstream endpoint | (none) |
    /// | `WILDFIRE_MAP_SERVICE_KEY` | Open-data service key | (none) |
    /// | `WILDFIRE_MAP_SNAPSHOT` | Local JSON snapshot | (none) |
    /// | `WILDFIRE_MAP_BOUNDARIES` | `GeoJSON` boundary file | (none) |
    /// | `WILDFIRE_MAP_DISPLAY_MODE` | `severity` or `completion_priority` | `completion_priority` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` or `WILDFIRE_MAP_DISPLAY_MODE` is
    /// set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            None => defaults.port,
        };

        let display_mode = match var("WILDFIRE_MAP_DISPLAY_MODE") {
            Some(mode) => mode
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidDisplayMode(mode))?,
            None => defaults.display_mode,
        };

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            source: SourceConfig {
                feed: var("WILDFIRE_MAP_FEED").unwrap_or(defaults.source.feed),
                feed_url: var("WILDFIRE_MAP_FEED_URL"),
                service_key: var("WILDFIRE_MAP_SERVICE_KEY"),
                snapshot: var("WILDFIRE_MAP_SNAPSHOT").map(PathBuf::from),
            },
            boundaries: var("WILDFIRE_MAP_BOUNDARIES").map(PathBuf::from),
            display_mode,
        })
    }
}

impl SourceConfig {
    /// Builds the configured incident source.
    ///
    /// A snapshot wins over a feed URL. With neither, the source is an empty
    /// in-memory batch, so the dashboard still renders.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the feed id is unknown or the HTTP client
    /// cannot be built.
    pub fn build(&self) -> Result<Arc<dyn IncidentSource>, SourceError> {
        if let Some(path) = &self.snapshot {
            log::info!("Reading incidents from snapshot {}", path.display());
            return Ok(Arc::new(SnapshotFile::new(&self.feed, path.clone())?));
        }

        if let Some(url) = &self.feed_url {
            if self.service_key.is_none() {
                log::warn!("No service key configured for {url}");
            }
            return Ok(Arc::new(OpenDataFeed::new(
                &self.feed,
                url.clone(),
                self.service_key.clone(),
            )?));
        }

        log::warn!("No snapshot or feed URL configured; serving an empty incident list");
        Ok(Arc::new(StaticSource::default()))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT: {0:?}")]
    InvalidPort(String),

    #[error("Invalid WILDFIRE_MAP_DISPLAY_MODE: {0:?} (expected severity or completion_priority)")]
    InvalidDisplayMode(String),
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.source.feed, "forest_service");
        assert_eq!(config.display_mode, DisplayMode::CompletionPriority);
    }

    #[test]
    fn reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "9000"),
            ("WILDFIRE_MAP_FEED_URL", "https://example.org/fires"),
            ("WILDFIRE_MAP_SERVICE_KEY", "abc"),
            ("WILDFIRE_MAP_SNAPSHOT", "data/fires.json"),
            ("WILDFIRE_MAP_BOUNDARIES", "data/sig.geojson"),
            ("WILDFIRE_MAP_DISPLAY_MODE", "severity"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.source.feed_url.as_deref(), Some("https://example.org/fires"));
        assert_eq!(config.source.service_key.as_deref(), Some("abc"));
        assert_eq!(config.source.snapshot, Some(PathBuf::from("data/fires.json")));
        assert_eq!(config.boundaries, Some(PathBuf::from("data/sig.geojson")));
        assert_eq!(config.display_mode, DisplayMode::Severity);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", " "), ("BIND_ADDR", "")])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr, "127.0.0.1");
    }

    #[test]
    fn rejects_bad_port() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidPort(p)) if p == "eighty"
        ));
    }

    #[test]
    fn rejects_bad_display_mode() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("WILDFIRE_MAP_DISPLAY_MODE", "rainbow")])),
            Err(ConfigError::InvalidDisplayMode(_))
        ));
    }

    #[test]
    fn snapshot_takes_priority_over_feed() {
        let source = SourceConfig {
            feed_url: Some("https://example.org/fires".to_string()),
            snapshot: Some(PathBuf::from("fires.json")),
            ..SourceConfig::default()
        };
        assert_eq!(source.build().unwrap().id(), "forest_service");

        let source = SourceConfig::default();
        assert_eq!(source.build().unwrap().id(), "static");
    }

    #[test]
    fn unknown_feed_fails_to_build() {
        let source = SourceConfig {
            feed: "nope".to_string(),
            snapshot: Some(PathBuf::from("fires.json")),
            ..SourceConfig::default()
        };
        assert!(matches!(source.build(), Err(SourceError::UnknownFeed { .. })));
    }
}
