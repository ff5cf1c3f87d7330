//! Enumerated string values. Providers publish values outside the published
//! lists, so each enum keeps them in an `Other` variant instead of failing.

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value this crate does not know about, kept as published.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($wire => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok($name::from(s.as_str()))
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Payment method accepted at a station.
    RentalMethod {
        Key => "KEY",
        CreditCard => "CREDITCARD",
        PayPass => "PAYPASS",
        ApplePay => "APPLEPAY",
        AndroidPay => "ANDROIDPAY",
        TransitCard => "TRANSITCARD",
        AccountNumber => "ACCOUNTNUMBER",
        Phone => "PHONE",
    }
}

wire_enum! {
    /// Rider category a set of rental hours applies to.
    UserType {
        Member => "member",
        NonMember => "nonmember",
    }
}

wire_enum! {
    /// Day of the week, as its first three English letters.
    Day {
        Monday => "mon",
        Tuesday => "tue",
        Wednesday => "wed",
        Thursday => "thu",
        Friday => "fri",
        Saturday => "sat",
        Sunday => "sun",
    }
}

wire_enum! {
    AlertType {
        SystemClosure => "SYSTEM_CLOSURE",
        StationClosure => "STATION_CLOSURE",
        StationMove => "STATION_MOVE",
        /// Published `OTHER`, as opposed to an unknown value.
        Unspecified => "OTHER",
    }
}

impl Day {
    pub fn weekday(&self) -> Option<chrono::Weekday> {
        use chrono::Weekday;
        match self {
            Day::Monday => Some(Weekday::Mon),
            Day::Tuesday => Some(Weekday::Tue),
            Day::Wednesday => Some(Weekday::Wed),
            Day::Thursday => Some(Weekday::Thu),
            Day::Friday => Some(Weekday::Fri),
            Day::Saturday => Some(Weekday::Sat),
            Day::Sunday => Some(Weekday::Sun),
            Day::Other(_) => None,
        }
    }
}
