use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::{FeedPayload, Timestamp};
use crate::error::Result;

/// The wrapper common to every GBFS document.
///
/// `data` is feed specific. [`RawEnvelope`] keeps it undecoded so it can be
/// handed to the decoder of whatever feed was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Last time the data in the feed was updated.
    pub last_updated: Timestamp,
    /// Seconds before the data will be updated again. 0, or a negative value
    /// from a misbehaving publisher, means "always refetch".
    pub ttl: i64,
    /// GBFS version the feed conforms to. Absent before 1.1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub data: T,
}

pub type RawEnvelope = Envelope<Box<RawValue>>;

impl<T> Envelope<T> {
    /// Whether the feed should be fetched again, against the wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        if self.ttl <= 0 {
            return true;
        }

        now.timestamp() > self.last_updated.0.saturating_add(self.ttl)
    }

    /// When the publisher expects the next update. `None` when `ttl` is not
    /// positive or the deadline is out of `chrono`'s range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.ttl <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.last_updated.0.saturating_add(self.ttl), 0)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            last_updated: self.last_updated,
            ttl: self.ttl,
            version: self.version,
            data: f(self.data),
        }
    }
}

impl RawEnvelope {
    /// Decodes the payload as feed `T`.
    pub fn decode<T: FeedPayload>(&self) -> Result<Envelope<T>> {
        let data = serde_json::from_str(self.data.get())?;
        Ok(Envelope {
            last_updated: self.last_updated,
            ttl: self.ttl,
            version: self.version.clone(),
            data,
        })
    }
}
