//! Scalar types whose wire encoding varies between providers.
//!
//! [`Boolean`] and [`Price`] never fail to decode. [`Date`] and [`Time`] keep
//! the text as published and convert on demand.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

use crate::error::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A flag published as `true`, `1`, `"1"` or `"true"` (any case).
///
/// Every other token, including `0`, `"false"`, `null`, numbers other than 1
/// and arbitrary strings, decodes to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Boolean(pub bool);

impl Boolean {
    /// Applies the decoding rules to a raw token, quoted or not.
    pub fn parse(token: &str) -> Self {
        let v = token.trim_matches('"');
        Boolean(v == "1" || v.eq_ignore_ascii_case("true"))
    }

    pub fn get(self) -> bool {
        self.0
    }
}

impl From<Boolean> for bool {
    fn from(b: Boolean) -> bool {
        b.0
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct BooleanVisitor;

impl<'de> Visitor<'de> for BooleanVisitor {
    type Value = Boolean;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean, 0/1 or a string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Boolean, E> {
        Ok(Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Boolean, E> {
        Ok(Boolean(v == 1))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Boolean, E> {
        Ok(Boolean(v == 1))
    }

    // `1.0` is not the token `1`
    fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<Boolean, E> {
        Ok(Boolean(false))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Boolean, E> {
        Ok(Boolean::parse(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Boolean, E> {
        Ok(Boolean(false))
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Boolean, E> {
        Ok(Boolean(false))
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Boolean, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Boolean, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Boolean(false))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Boolean, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Boolean(false))
    }
}

impl<'de> Deserialize<'de> for Boolean {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(BooleanVisitor)
    }
}

/// A price kept exactly as published.
///
/// Providers send `2`, `2.0`, `"2.00"`... The surrounding quotes are removed
/// and the rest is stored verbatim; use [`Price::as_f64`] to compute with it.
/// Decoding requires a `serde_json` deserializer reading text, which is how
/// every feed in this crate is decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Price(String);

impl Price {
    pub fn new(text: impl Into<String>) -> Self {
        Price(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.trim().parse().ok()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get().trim_matches('"');
        if text == "null" {
            return Ok(Price::default());
        }
        Ok(Price(text.to_string()))
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// A service day in the `YYYY-MM-DD` format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Date(pub String);

impl Date {
    /// Midnight of this day in the IANA zone `tz`, or in the local zone when
    /// `tz` is `None` or empty.
    pub fn to_datetime(&self, tz: Option<&str>) -> Result<DateTime<FixedOffset>> {
        let zone = match tz.filter(|name| !name.is_empty()) {
            Some(name) => Some(
                name.parse::<Tz>()
                    .map_err(|_| Error::UnknownTimezone(name.to_string()))?,
            ),
            None => None,
        };

        let midnight = NaiveDate::parse_from_str(&self.0, DATE_FORMAT)
            .map_err(|e| Error::InvalidDate {
                value: self.0.clone(),
                reason: e.to_string(),
            })?
            .and_time(NaiveTime::MIN);

        let resolved = match zone {
            Some(zone) => zone
                .from_local_datetime(&midnight)
                .earliest()
                .map(|d| d.fixed_offset()),
            None => Local
                .from_local_datetime(&midnight)
                .earliest()
                .map(|d| d.fixed_offset()),
        };

        resolved.ok_or_else(|| Error::InvalidDate {
            value: self.0.clone(),
            reason: "midnight does not exist in this time zone".to_string(),
        })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A service hour in the `HH:MM:SS` format. Hours run up to 47 so that a
/// range can end on the following day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Time(pub String);

impl Time {
    /// Splits the value into hour, minute and second.
    ///
    /// Never fails: a value without exactly three segments gives `(0, 0, 0)`
    /// and a segment that is not a plain integer gives 0 for that component.
    /// Signs are kept, so `"-1:00:00"` gives an hour of -1.
    pub fn clock(&self) -> (i32, i32, i32) {
        let parts: Vec<&str> = self.0.split(':').collect();
        if parts.len() != 3 {
            return (0, 0, 0);
        }

        let field = |s: &str| s.parse().unwrap_or(0);
        (field(parts[0]), field(parts[1]), field(parts[2]))
    }

    /// Offset from midnight. Negative or past one day when the published
    /// components are.
    pub fn seconds_since_midnight(&self) -> i64 {
        let (h, m, s) = self.clock();
        i64::from(h) * 3600 + i64::from(m) * 60 + i64::from(s)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// POSIX timestamp in seconds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Timestamp(Utc::now().timestamp())
    }

    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
