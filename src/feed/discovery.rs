use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FeedKey, FeedPayload};

/// `gbfs.json`: the feeds published by the system, per language.
///
/// Language codes are the keys directly under `data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GbfsData {
    pub languages: BTreeMap<String, GbfsLanguage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GbfsLanguage {
    #[serde(default)]
    pub feeds: Vec<GbfsFeed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbfsFeed {
    /// Base file name of the feed, e.g. `station_information`.
    pub name: String,
    /// Actual endpoint. It need not follow the `name.json` pattern.
    pub url: String,
}

impl GbfsData {
    /// URLs published for `language`, keyed by feed. Names that are not
    /// canonical feed keys are skipped.
    pub fn feed_urls(&self, language: &str) -> Vec<(FeedKey, String)> {
        let Some(lang) = self.languages.get(language) else {
            return Vec::new();
        };

        lang.feeds
            .iter()
            .filter_map(|feed| match feed.name.parse::<FeedKey>() {
                Ok(key) => Some((key, feed.url.clone())),
                Err(_) => {
                    debug!(name = %feed.name, "Skipping non-canonical feed in auto-discovery");
                    None
                }
            })
            .collect()
    }
}

impl FeedPayload for GbfsData {
    const KEY: FeedKey = FeedKey::Gbfs;

    fn entity_count(&self) -> usize {
        self.languages.values().map(|l| l.feeds.len()).sum()
    }
}

/// `gbfs_versions.json`: every version of the feeds the system publishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GbfsVersionsData {
    /// Sorted by increasing major and minor version.
    #[serde(default)]
    pub versions: Vec<GbfsVersion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbfsVersion {
    /// `X.Y`
    pub version: String,
    /// The `gbfs.json` of that version.
    pub url: String,
}

impl FeedPayload for GbfsVersionsData {
    const KEY: FeedKey = FeedKey::GbfsVersions;

    fn entity_count(&self) -> usize {
        self.versions.len()
    }
}
