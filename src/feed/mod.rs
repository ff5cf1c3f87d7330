//! Typed model of the GBFS documents.
//!
//! Each feed's payload is a plain value type implementing [`FeedPayload`],
//! which ties it to its [`FeedKey`]. [`AnyFeed`] covers the case where the
//! key is only known at runtime.

mod discovery;
mod enums;
mod key;
mod metadata;
mod scalar;
mod serde_helpers;
mod station;
mod system;

pub use discovery::{GbfsData, GbfsFeed, GbfsLanguage, GbfsVersion, GbfsVersionsData};
pub use enums::{AlertType, Day, RentalMethod, UserType};
pub use key::FeedKey;
pub use metadata::{Envelope, RawEnvelope};
pub use scalar::{Boolean, DATE_FORMAT, Date, Price, Time, Timestamp};
pub use station::{
    FreeBikeStatus, FreeBikeStatusData, RentalUris, StationInformation, StationInformationData,
    StationStatus, StationStatusData,
};
pub use system::{
    Alert, AlertTime, Calendar, PricingPlan, Region, RentalApp, RentalApps, RentalHours,
    SystemAlertsData, SystemCalendarData, SystemHoursData, SystemInformationData,
    SystemPricingPlansData, SystemRegionsData,
};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use crate::error::Result;

/// The `data` payload of one feed.
pub trait FeedPayload: DeserializeOwned + Serialize {
    /// The feed this payload is published under.
    const KEY: FeedKey;

    /// Number of entities (stations, bikes, alerts...) in the payload.
    fn entity_count(&self) -> usize;
}

/// A payload of any feed, tagged by its key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyFeed {
    Gbfs(GbfsData),
    GbfsVersions(GbfsVersionsData),
    SystemInformation(SystemInformationData),
    StationInformation(StationInformationData),
    StationStatus(StationStatusData),
    FreeBikeStatus(FreeBikeStatusData),
    SystemHours(SystemHoursData),
    SystemCalendar(SystemCalendarData),
    SystemRegions(SystemRegionsData),
    SystemPricingPlans(SystemPricingPlansData),
    SystemAlerts(SystemAlertsData),
}

impl AnyFeed {
    /// Decodes `data` with the decoder registered for `key`.
    pub fn decode(key: FeedKey, data: &RawValue) -> Result<Self> {
        let json = data.get();
        let feed = match key {
            FeedKey::Gbfs => AnyFeed::Gbfs(serde_json::from_str(json)?),
            FeedKey::GbfsVersions => AnyFeed::GbfsVersions(serde_json::from_str(json)?),
            FeedKey::SystemInformation => AnyFeed::SystemInformation(serde_json::from_str(json)?),
            FeedKey::StationInformation => {
                AnyFeed::StationInformation(serde_json::from_str(json)?)
            }
            FeedKey::StationStatus => AnyFeed::StationStatus(serde_json::from_str(json)?),
            FeedKey::FreeBikeStatus => AnyFeed::FreeBikeStatus(serde_json::from_str(json)?),
            FeedKey::SystemHours => AnyFeed::SystemHours(serde_json::from_str(json)?),
            FeedKey::SystemCalendar => AnyFeed::SystemCalendar(serde_json::from_str(json)?),
            FeedKey::SystemRegions => AnyFeed::SystemRegions(serde_json::from_str(json)?),
            FeedKey::SystemPricingPlans => {
                AnyFeed::SystemPricingPlans(serde_json::from_str(json)?)
            }
            FeedKey::SystemAlerts => AnyFeed::SystemAlerts(serde_json::from_str(json)?),
        };
        Ok(feed)
    }

    pub fn key(&self) -> FeedKey {
        match self {
            AnyFeed::Gbfs(_) => FeedKey::Gbfs,
            AnyFeed::GbfsVersions(_) => FeedKey::GbfsVersions,
            AnyFeed::SystemInformation(_) => FeedKey::SystemInformation,
            AnyFeed::StationInformation(_) => FeedKey::StationInformation,
            AnyFeed::StationStatus(_) => FeedKey::StationStatus,
            AnyFeed::FreeBikeStatus(_) => FeedKey::FreeBikeStatus,
            AnyFeed::SystemHours(_) => FeedKey::SystemHours,
            AnyFeed::SystemCalendar(_) => FeedKey::SystemCalendar,
            AnyFeed::SystemRegions(_) => FeedKey::SystemRegions,
            AnyFeed::SystemPricingPlans(_) => FeedKey::SystemPricingPlans,
            AnyFeed::SystemAlerts(_) => FeedKey::SystemAlerts,
        }
    }

    pub fn entity_count(&self) -> usize {
        match self {
            AnyFeed::Gbfs(d) => d.entity_count(),
            AnyFeed::GbfsVersions(d) => d.entity_count(),
            AnyFeed::SystemInformation(d) => d.entity_count(),
            AnyFeed::StationInformation(d) => d.entity_count(),
            AnyFeed::StationStatus(d) => d.entity_count(),
            AnyFeed::FreeBikeStatus(d) => d.entity_count(),
            AnyFeed::SystemHours(d) => d.entity_count(),
            AnyFeed::SystemCalendar(d) => d.entity_count(),
            AnyFeed::SystemRegions(d) => d.entity_count(),
            AnyFeed::SystemPricingPlans(d) => d.entity_count(),
            AnyFeed::SystemAlerts(d) => d.entity_count(),
        }
    }
}
