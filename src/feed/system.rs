use serde::{Deserialize, Serialize};

use super::serde_helpers::de_with_null_default;
use super::{AlertType, Boolean, Date, Day, FeedKey, FeedPayload, Price, Time, Timestamp, UserType};
use crate::error::Result;

/// `system_information.json`: operator, location, contact and time zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInformationData {
    /// Globally unique, stable over the life of the system.
    pub system_id: String,
    /// IETF language tag used throughout the other files.
    pub language: String,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub purchase_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub feed_contact_email: Option<String>,
    /// IANA zone name, e.g. `America/Los_Angeles`.
    pub timezone: String,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub rental_apps: Option<RentalApps>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalApps {
    #[serde(default)]
    pub android: Option<RentalApp>,
    #[serde(default)]
    pub ios: Option<RentalApp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalApp {
    #[serde(default)]
    pub store_uri: Option<String>,
    #[serde(default)]
    pub discovery_uri: Option<String>,
}

impl SystemInformationData {
    /// Start of operations, in the system's own time zone.
    pub fn start_date_time(&self) -> Option<Result<chrono::DateTime<chrono::FixedOffset>>> {
        self.start_date
            .as_ref()
            .map(|d| d.to_datetime(Some(self.timezone.as_str())))
    }
}

impl FeedPayload for SystemInformationData {
    const KEY: FeedKey = FeedKey::SystemInformation;

    fn entity_count(&self) -> usize {
        1
    }
}

/// `system_hours.json`: hours of operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemHoursData {
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub rental_hours: Vec<RentalHours>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalHours {
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub user_types: Vec<UserType>,
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub days: Vec<Day>,
    /// 00:00:00 to 23:59:59, in the system's time zone.
    pub start_time: Time,
    /// Up to 47:59:59 when the range ends on the following day.
    pub end_time: Time,
}

impl SystemHoursData {
    /// Entries covering `day` for `user_type`.
    pub fn hours_for<'a>(
        &'a self,
        day: &'a Day,
        user_type: &'a UserType,
    ) -> impl Iterator<Item = &'a RentalHours> + 'a {
        self.rental_hours
            .iter()
            .filter(move |h| h.days.contains(day) && h.user_types.contains(user_type))
    }
}

impl FeedPayload for SystemHoursData {
    const KEY: FeedKey = FeedKey::SystemHours;

    fn entity_count(&self) -> usize {
        self.rental_hours.len()
    }
}

/// `system_calendar.json`: days of operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemCalendarData {
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub calendars: Vec<Calendar>,
}

/// Years are omitted when the dates are the same every year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub start_day: u32,
    pub start_month: u32,
    #[serde(default)]
    pub start_year: Option<i32>,
    pub end_day: u32,
    pub end_month: u32,
    #[serde(default)]
    pub end_year: Option<i32>,
}

impl FeedPayload for SystemCalendarData {
    const KEY: FeedKey = FeedKey::SystemCalendar;

    fn entity_count(&self) -> usize {
        self.calendars.len()
    }
}

/// `system_regions.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemRegionsData {
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub region_id: String,
    pub name: String,
}

impl FeedPayload for SystemRegionsData {
    const KEY: FeedKey = FeedKey::SystemRegions;

    fn entity_count(&self) -> usize {
        self.regions.len()
    }
}

/// `system_pricing_plans.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemPricingPlansData {
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub plans: Vec<PricingPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub plan_id: String,
    #[serde(default)]
    pub url: Option<String>,
    pub name: String,
    /// ISO 4217
    pub currency: String,
    pub price: Price,
    /// `false` when no tax is added on top of the price.
    #[serde(default)]
    pub is_taxable: Boolean,
    #[serde(default)]
    pub description: String,
}

impl FeedPayload for SystemPricingPlansData {
    const KEY: FeedKey = FeedKey::SystemPricingPlans;

    fn entity_count(&self) -> usize {
        self.plans.len()
    }
}

/// `system_alerts.json`: changes outside normal operations, such as a
/// closure due to weather.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemAlertsData {
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub times: Vec<AlertTime>,
    /// Empty together with `region_ids` when the whole system is affected.
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub station_ids: Vec<String>,
    #[serde(default, deserialize_with = "de_with_null_default")]
    pub region_ids: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertTime {
    pub start: Timestamp,
    /// Absent while no end is planned.
    #[serde(default)]
    pub end: Option<Timestamp>,
}

impl Alert {
    pub fn is_system_wide(&self) -> bool {
        self.station_ids.is_empty() && self.region_ids.is_empty()
    }

    /// Whether one of the alert's windows covers `at`. An alert without
    /// windows is always in effect.
    pub fn is_active_at(&self, at: Timestamp) -> bool {
        if self.times.is_empty() {
            return true;
        }
        self.times
            .iter()
            .any(|t| t.start <= at && t.end.is_none_or(|end| at <= end))
    }
}

impl FeedPayload for SystemAlertsData {
    const KEY: FeedKey = FeedKey::SystemAlerts;

    fn entity_count(&self) -> usize {
        self.alerts.len()
    }
}
