//! Error type shared by the resolver, the fetcher and the scalar decoders.

use thiserror::Error;

use crate::feed::FeedKey;

/// Everything that can go wrong while resolving, fetching or decoding a feed.
#[derive(Debug, Error)]
pub enum Error {
    /// The client was built without a base URL.
    #[error("base url is missing")]
    BaseUrlMissing,
    /// The destination passed to [`Client::get_into`](crate::Client::get_into)
    /// holds a different feed than the one requested.
    #[error("invalid feed: requested '{requested}' into a '{declared}' destination")]
    InvalidFeed {
        requested: FeedKey,
        declared: FeedKey,
    },
    /// The server answered 404. Optional feeds are commonly absent, so this
    /// is kept apart from [`Error::UnexpectedStatus`].
    #[error("feed '{key}' does not exist at {url}")]
    FeedNotFound { key: FeedKey, url: String },
    /// Any status other than 200 or 404.
    #[error("invalid status code ({status}) for feed '{key}'")]
    UnexpectedStatus { key: FeedKey, status: u16 },
    /// Connection, timeout or client construction failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The resolved URL could not be parsed.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// A header name or value given to an authenticating transport is malformed.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),
    /// The response body is not the expected JSON document.
    #[error("failed to decode feed: {0}")]
    Decode(#[from] serde_json::Error),
    /// The date is not given in the YYYY-MM-DD format, or does not exist in
    /// the requested zone.
    #[error("'{value}' is not a valid date: {reason}")]
    InvalidDate { value: String, reason: String },
    /// The time zone name is not in the IANA database.
    #[error("unknown time zone '{0}'")]
    UnknownTimezone(String),
    /// The name is not one of the canonical GBFS feed keys.
    #[error("unknown feed key '{0}'")]
    UnknownFeedKey(String),
}

impl Error {
    /// Returns `true` for a 404, which callers usually treat as "feed not
    /// published" rather than an outage.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::FeedNotFound { .. })
    }

    /// Short label of the failure, as recorded in exported summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::BaseUrlMissing => "base_url_missing",
            Error::InvalidFeed { .. } => "invalid_feed",
            Error::FeedNotFound { .. } => "not_found",
            Error::UnexpectedStatus { .. } => "status",
            Error::Transport(_) => "transport",
            Error::InvalidUrl { .. } => "invalid_url",
            Error::InvalidHeader(_) => "invalid_header",
            Error::Decode(_) => "decode",
            Error::InvalidDate { .. } => "invalid_date",
            Error::UnknownTimezone(_) => "unknown_timezone",
            Error::UnknownFeedKey(_) => "unknown_feed_key",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
