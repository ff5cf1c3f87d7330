use serde::{Deserialize, Serialize};

use super::serde_helpers::{de_with_null_default, deserialize_option_id};
use super::{Boolean, FeedKey, FeedPayload, RentalMethod, Timestamp};

/// Deep links into the operator's rental app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalUris {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
}

/// `station_information.json`: location and capacity of every station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationInformationData {
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub stations: Vec<StationInformation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationInformation {
    pub station_id: String,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub cross_street: Option<String>,
    /// See `system_regions.json`. Published as a number by some providers.
    #[serde(default, deserialize_with = "deserialize_option_id")]
    pub region_id: Option<String>,
    #[serde(default)]
    pub post_code: Option<String>,
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub rental_methods: Vec<RentalMethod>,
    /// Docking points installed, available or not.
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub rental_uris: Option<RentalUris>,
}

impl FeedPayload for StationInformationData {
    const KEY: FeedKey = FeedKey::StationInformation;

    fn entity_count(&self) -> usize {
        self.stations.len()
    }
}

/// `station_status.json`: availability at every station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationStatusData {
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub stations: Vec<StationStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationStatus {
    pub station_id: String,
    pub num_bikes_available: u32,
    #[serde(default)]
    pub num_bikes_disabled: Option<u32>,
    /// Absent for stations with unlimited docking (virtual stations).
    #[serde(default)]
    pub num_docks_available: Option<u32>,
    #[serde(default)]
    pub num_docks_disabled: Option<u32>,
    #[serde(default)]
    pub is_installed: Boolean,
    #[serde(default)]
    pub is_renting: Boolean,
    #[serde(default)]
    pub is_returning: Boolean,
    #[serde(default)]
    pub last_reported: Timestamp,
}

impl StationStatusData {
    pub fn station(&self, station_id: &str) -> Option<&StationStatus> {
        self.stations.iter().find(|s| s.station_id == station_id)
    }
}

impl FeedPayload for StationStatusData {
    const KEY: FeedKey = FeedKey::StationStatus;

    fn entity_count(&self) -> usize {
        self.stations.len()
    }
}

/// `free_bike_status.json`: vehicles stopped outside of stations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeBikeStatusData {
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub bikes: Vec<FreeBikeStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeBikeStatus {
    /// Rotated after each trip.
    pub bike_id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub is_reserved: Boolean,
    #[serde(default)]
    pub is_disabled: Boolean,
    #[serde(default)]
    pub rental_uris: Option<RentalUris>,
}

impl FreeBikeStatusData {
    /// Bikes neither reserved nor disabled.
    pub fn available(&self) -> impl Iterator<Item = &FreeBikeStatus> {
        self.bikes
            .iter()
            .filter(|b| !b.is_reserved.get() && !b.is_disabled.get())
    }
}

impl FeedPayload for FreeBikeStatusData {
    const KEY: FeedKey = FeedKey::FreeBikeStatus;

    fn entity_count(&self) -> usize {
        self.bikes.len()
    }
}
