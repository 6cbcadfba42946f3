#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wildfire open-data feed client and record normalization.
//!
//! Each provider of incident records implements the [`IncidentSource`]
//! trait. Feed layouts (where the record array lives in the response, and
//! which JSON keys hold the address, stage, status, percentage, and date)
//! are described by embedded TOML [`feed::FeedDefinition`]s.
//!
//! Consumers that must keep rendering when the feed is down call
//! [`fetch_or_empty`], which degrades any failure to an empty batch.

pub mod feed;
pub mod registry;
pub mod retry;
pub mod sources;

use async_trait::async_trait;
use wildfire_map_fire_models::IncidentRecord;

pub use sources::{OpenDataFeed, SnapshotFile, StaticSource};

/// Errors that can occur while fetching or normalizing incident records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (snapshot file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No embedded feed definition has the requested id.
    #[error("Unknown feed: {id}")]
    UnknownFeed {
        /// The requested feed id.
        id: String,
    },

    /// The upstream response could not be turned into records.
    #[error("Normalization error: {message}")]
    Normalization {
        /// Description of what went wrong.
        message: String,
    },
}

/// Trait that all incident record providers implement.
#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Returns a short identifier for this source (e.g. `"forest_service"`).
    fn id(&self) -> &str;

    /// Fetches the current batch of incident records.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the records cannot be fetched or parsed.
    async fn fetch(&self) -> Result<Vec<IncidentRecord>, SourceError>;
}

/// Fetches from `source`, returning an empty batch on any failure.
///
/// The failure is logged. An empty batch renders as a map with no active
/// incidents and zeroed summaries.
pub async fn fetch_or_empty(source: &dyn IncidentSource) -> Vec<IncidentRecord> {
    match source.fetch().await {
        Ok(records) => {
            log::debug!("Fetched {} records from {}", records.len(), source.id());
            records
        }
        Err(e) => {
            log::error!("Failed to fetch incidents from {}: {e}", source.id());
            Vec::new()
        }
    }
}
