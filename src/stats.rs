//! One-row summary of a fetched feed, for logging and CSV export.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Error;
use crate::feed::{AnyFeed, Envelope, FeedKey};

#[derive(Debug, Default, Serialize)]
pub struct FeedSummary {
    pub fetched_at: DateTime<Utc>,
    pub feed: Option<FeedKey>,
    pub url: Option<String>,
    pub version: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub ttl: Option<i64>,
    pub expired: Option<bool>,
    pub entities: usize,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl FeedSummary {
    pub fn from_envelope(feed: &Envelope<AnyFeed>) -> Self {
        FeedSummary {
            fetched_at: Utc::now(),
            feed: Some(feed.data.key()),
            version: feed.version.clone(),
            last_updated: Some(feed.last_updated.to_datetime()),
            ttl: Some(feed.ttl),
            expired: Some(feed.is_expired()),
            entities: feed.data.entity_count(),
            ..Default::default()
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(key: FeedKey, error_type: &str, error_message: &str) -> Self {
        FeedSummary {
            fetched_at: Utc::now(),
            feed: Some(key),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    /// Error record labelled with [`Error::kind`].
    pub fn from_fetch_error(key: FeedKey, error: &Error) -> Self {
        Self::from_error(key, error.kind(), &error.to_string())
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}
