use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// One of the canonical GBFS documents. The wire name is also the file name
/// (without `.json`) under the system's base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeedKey {
    /// `gbfs.json`, the auto-discovery document.
    Gbfs,
    GbfsVersions,
    SystemInformation,
    StationInformation,
    StationStatus,
    FreeBikeStatus,
    SystemHours,
    SystemCalendar,
    SystemRegions,
    SystemPricingPlans,
    SystemAlerts,
}

impl FeedKey {
    pub const ALL: [FeedKey; 11] = [
        FeedKey::Gbfs,
        FeedKey::GbfsVersions,
        FeedKey::SystemInformation,
        FeedKey::StationInformation,
        FeedKey::StationStatus,
        FeedKey::FreeBikeStatus,
        FeedKey::SystemHours,
        FeedKey::SystemCalendar,
        FeedKey::SystemRegions,
        FeedKey::SystemPricingPlans,
        FeedKey::SystemAlerts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedKey::Gbfs => "gbfs",
            FeedKey::GbfsVersions => "gbfs_versions",
            FeedKey::SystemInformation => "system_information",
            FeedKey::StationInformation => "station_information",
            FeedKey::StationStatus => "station_status",
            FeedKey::FreeBikeStatus => "free_bike_status",
            FeedKey::SystemHours => "system_hours",
            FeedKey::SystemCalendar => "system_calendar",
            FeedKey::SystemRegions => "system_regions",
            FeedKey::SystemPricingPlans => "system_pricing_plans",
            FeedKey::SystemAlerts => "system_alerts",
        }
    }

    /// File name used when composing the feed URL.
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownFeedKey(s.to_string()))
    }
}

impl Serialize for FeedKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FeedKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
