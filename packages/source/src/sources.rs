//! [`IncidentSource`] implementations.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use wildfire_map_fire_models::IncidentRecord;

use crate::feed::FeedDefinition;
use crate::registry::feed_by_id;
use crate::{IncidentSource, SourceError, retry};

/// Per-request timeout for the upstream feed.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Query parameter carrying the open-data service key.
const SERVICE_KEY_PARAM: &str = "serviceKey";

/// Looks up an embedded feed definition by id.
fn definition(feed_id: &str) -> Result<FeedDefinition, SourceError> {
    feed_by_id(feed_id).ok_or_else(|| SourceError::UnknownFeed {
        id: feed_id.to_string(),
    })
}

/// Live upstream open-data feed.
pub struct OpenDataFeed {
    definition: FeedDefinition,
    url: String,
    service_key: Option<String>,
    client: reqwest::Client,
}

impl OpenDataFeed {
    /// Creates a client for the feed `feed_id` served at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the feed id is unknown or the HTTP client
    /// cannot be built.
    pub fn new(
        feed_id: &str,
        url: impl Into<String>,
        service_key: Option<String>,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            definition: definition(feed_id)?,
            url: url.into(),
            service_key,
            client,
        })
    }
}

#[async_trait]
impl IncidentSource for OpenDataFeed {
    fn id(&self) -> &str {
        &self.definition.id
    }

    async fn fetch(&self) -> Result<Vec<IncidentRecord>, SourceError> {
        log::info!("Fetching {} from {}", self.definition.name, self.url);

        let body = retry::send_json(|| {
            let request = self.client.get(&self.url).query(&self.definition.query);
            match &self.service_key {
                Some(key) => request.query(&[(SERVICE_KEY_PARAM, key)]),
                None => request,
            }
        })
        .await?;

        let records = self.definition.normalize(&body);
        log::info!("{}: {} records", self.definition.id, records.len());
        Ok(records)
    }
}

/// A JSON file holding a saved feed response or a plain array of records.
pub struct SnapshotFile {
    definition: FeedDefinition,
    path: PathBuf,
}

impl SnapshotFile {
    /// Creates a snapshot source read with the layout of `feed_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnknownFeed`] if the feed id is unknown.
    pub fn new(feed_id: &str, path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        Ok(Self {
            definition: definition(feed_id)?,
            path: path.into(),
        })
    }
}

#[async_trait]
impl IncidentSource for SnapshotFile {
    fn id(&self) -> &str {
        &self.definition.id
    }

    async fn fetch(&self) -> Result<Vec<IncidentRecord>, SourceError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let body: serde_json::Value = serde_json::from_str(&contents)?;
        Ok(self.definition.normalize(&body))
    }
}

/// An in-memory batch of records.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<IncidentRecord>,
}

impl StaticSource {
    /// Wraps an already-normalized batch.
    #[must_use]
    pub const fn new(records: Vec<IncidentRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl IncidentSource for StaticSource {
    fn id(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<IncidentRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DEFAULT_FEED_ID;

    #[test]
    fn unknown_feed_is_rejected() {
        assert!(matches!(
            SnapshotFile::new("nope", "snapshot.json"),
            Err(SourceError::UnknownFeed { id }) if id == "nope"
        ));
    }

    #[tokio::test]
    async fn reads_snapshot_file() {
        let path = std::env::temp_dir().join(format!(
            "wildfire_map_snapshot_{}.json",
            std::process::id()
        ));
        let body = serde_json::json!({
            "response": { "body": { "items": { "item": [
                { "소재지": "강원도 강릉시 성산면", "대응단계": "2단계", "진화율": "85%", "발생일자": "20250322" }
            ]}}}
        });
        tokio::fs::write(&path, body.to_string()).await.unwrap();

        let source = SnapshotFile::new(DEFAULT_FEED_ID, &path).unwrap();
        let records = source.fetch().await;
        tokio::fs::remove_file(&path).await.unwrap();

        let records = records.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raw_stage, "2단계");
    }

    #[tokio::test]
    async fn missing_snapshot_is_an_io_error() {
        let source = SnapshotFile::new(DEFAULT_FEED_ID, "/nonexistent/wildfire.json").unwrap();
        assert!(matches!(source.fetch().await, Err(SourceError::Io(_))));
    }
}
