//! Feed registry: loads all feed definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/feeds/` is baked into the binary at
//! compile time via [`include_str!`].

use crate::feed::{FeedDefinition, parse_feed_toml};

/// Feed id used when none is configured.
pub const DEFAULT_FEED_ID: &str = "forest_service";

/// TOML configs embedded at compile time.
const FEED_TOMLS: &[(&str, &str)] = &[(
    "forest_service",
    include_str!("../feeds/forest_service.toml"),
)];

/// Returns all configured feed definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so
/// this is caught by the registry tests).
#[must_use]
pub fn all_feeds() -> Vec<FeedDefinition> {
    FEED_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_feed_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the feed definition with the given id.
#[must_use]
pub fn feed_by_id(id: &str) -> Option<FeedDefinition> {
    all_feeds().into_iter().find(|feed| feed.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_feeds() {
        assert_eq!(all_feeds().len(), FEED_TOMLS.len());
    }

    #[test]
    fn feed_ids_match_file_names() {
        for ((name, _), feed) in FEED_TOMLS.iter().zip(all_feeds()) {
            assert_eq!(*name, feed.id);
        }
    }

    #[test]
    fn default_feed_exists() {
        assert!(feed_by_id(DEFAULT_FEED_ID).is_some());
        assert!(feed_by_id("nope").is_none());
    }

    #[test]
    fn all_feeds_have_field_keys() {
        for feed in &all_feeds() {
            assert!(!feed.name.is_empty(), "{}: name is empty", feed.id);
            assert!(!feed.fields.address.is_empty(), "{}: no address keys", feed.id);
            assert!(!feed.fields.stage.is_empty(), "{}: no stage keys", feed.id);
            assert!(!feed.fields.status.is_empty(), "{}: no status keys", feed.id);
            assert!(!feed.fields.date.is_empty(), "{}: no date keys", feed.id);
        }
    }
}
