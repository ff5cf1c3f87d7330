//! The GBFS client: resolves a feed's URL, fetches it and decodes it.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::feed::{
    AnyFeed, Envelope, FeedKey, FeedPayload, FreeBikeStatusData, GbfsData, GbfsVersionsData,
    RawEnvelope, StationInformationData, StationStatusData, SystemAlertsData, SystemCalendarData,
    SystemHoursData, SystemInformationData, SystemPricingPlansData, SystemRegionsData,
};
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};
use crate::resolver::UrlResolver;

/// Configuration for a [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    language: Option<String>,
    urls: HashMap<FeedKey, String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http: Option<Box<dyn HttpClient>>,
}

impl ClientBuilder {
    /// Root under which the feeds are published. Required.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Path segment inserted between the base URL and the file name.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Fetch `key` from `url` instead of the composed URL.
    pub fn force_url(mut self, key: FeedKey, url: impl Into<String>) -> Self {
        self.urls.insert(key, url.into());
        self
    }

    /// Total time allowed for one request. Ignored with [`Self::http_client`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ignored with [`Self::http_client`].
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Send requests through `http`, e.g. an [`ApiKey`](crate::fetch::auth::ApiKey).
    pub fn http_client(mut self, http: impl HttpClient + 'static) -> Self {
        self.http = Some(Box::new(http));
        self
    }

    pub fn build(self) -> Result<Client> {
        let base_url = self.base_url.ok_or(Error::BaseUrlMissing)?;
        let mut resolver = UrlResolver::new(base_url, self.language)?;
        resolver.force_urls(self.urls, false);

        let http = match self.http {
            Some(http) => http,
            None => Box::new(BasicClient::with_timeouts(
                self.timeout,
                self.connect_timeout,
            )?),
        };

        Ok(Client { http, resolver })
    }
}

/// A blocking client for one GBFS system.
///
/// Fetching takes `&mut self` because resolved URLs are cached on the
/// client. Use one client per thread.
pub struct Client {
    http: Box<dyn HttpClient>,
    resolver: UrlResolver,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    /// The URL `key` will be fetched from.
    pub fn url(&mut self, key: FeedKey) -> &str {
        self.resolver.resolve(key)
    }

    /// Sets the full URL of several feeds, for providers that do not follow
    /// the standard layout. With `replace`, previously known URLs are dropped.
    pub fn force_urls<I>(&mut self, urls: I, replace: bool)
    where
        I: IntoIterator<Item = (FeedKey, String)>,
    {
        self.resolver.force_urls(urls, replace);
    }

    /// Fetches `key` and decodes the envelope, leaving `data` undecoded.
    pub fn get_raw(&mut self, key: FeedKey) -> Result<RawEnvelope> {
        let body = self.get_body(key)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches `key` into `out`, replacing its previous content.
    ///
    /// Fails with [`Error::InvalidFeed`] before any request when `out` does
    /// not hold feed `key`.
    pub fn get_into<T: FeedPayload>(&mut self, key: FeedKey, out: &mut Envelope<T>) -> Result<()> {
        if T::KEY != key {
            return Err(Error::InvalidFeed {
                requested: key,
                declared: T::KEY,
            });
        }

        let body = self.get_body(key)?;
        *out = serde_json::from_slice(&body)?;
        Ok(())
    }

    pub fn fetch<T: FeedPayload>(&mut self) -> Result<Envelope<T>> {
        let body = self.get_body(T::KEY)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches a feed whose key is only known at runtime.
    pub fn fetch_any(&mut self, key: FeedKey) -> Result<Envelope<AnyFeed>> {
        let raw = self.get_raw(key)?;
        let data = AnyFeed::decode(key, &raw.data)?;
        Ok(raw.map(|_| data))
    }

    /// Fetches `feed` again if it expired or `force` is set; otherwise does nothing.
    pub fn refresh<T: FeedPayload>(&mut self, feed: &mut Envelope<T>, force: bool) -> Result<()> {
        if !force && !feed.is_expired() {
            return Ok(());
        }
        self.get_into(T::KEY, feed)
    }

    /// Fetches `gbfs.json` and uses the URLs it lists for `language` (or the
    /// client's language, or its first language) as overrides. Overrides set
    /// explicitly for a feed are replaced.
    pub fn use_auto_discovery(&mut self, language: Option<&str>) -> Result<Envelope<GbfsData>> {
        let discovery = self.auto_discovery()?;

        let language = language
            .or(self.resolver.language())
            .or_else(|| discovery.data.languages.keys().next().map(String::as_str))
            .map(str::to_string);

        match language {
            Some(lang) if discovery.data.languages.contains_key(&lang) => {
                let urls = discovery.data.feed_urls(&lang);
                debug!(language = %lang, feeds = urls.len(), "Using auto-discovery URLs");
                self.resolver.force_urls(urls, false);
            }
            Some(lang) => warn!(language = %lang, "Language not published in auto-discovery"),
            None => warn!("Auto-discovery lists no language"),
        }

        Ok(discovery)
    }

    pub fn auto_discovery(&mut self) -> Result<Envelope<GbfsData>> {
        self.fetch()
    }

    pub fn gbfs_versions(&mut self) -> Result<Envelope<GbfsVersionsData>> {
        self.fetch()
    }

    pub fn system_information(&mut self) -> Result<Envelope<SystemInformationData>> {
        self.fetch()
    }

    pub fn station_information(&mut self) -> Result<Envelope<StationInformationData>> {
        self.fetch()
    }

    pub fn station_status(&mut self) -> Result<Envelope<StationStatusData>> {
        self.fetch()
    }

    pub fn free_bike_status(&mut self) -> Result<Envelope<FreeBikeStatusData>> {
        self.fetch()
    }

    pub fn system_hours(&mut self) -> Result<Envelope<SystemHoursData>> {
        self.fetch()
    }

    pub fn system_calendar(&mut self) -> Result<Envelope<SystemCalendarData>> {
        self.fetch()
    }

    pub fn system_regions(&mut self) -> Result<Envelope<SystemRegionsData>> {
        self.fetch()
    }

    pub fn system_pricing_plans(&mut self) -> Result<Envelope<SystemPricingPlansData>> {
        self.fetch()
    }

    pub fn system_alerts(&mut self) -> Result<Envelope<SystemAlertsData>> {
        self.fetch()
    }

    #[tracing::instrument(skip_all, fields(feed = %key))]
    fn get_body(&mut self, key: FeedKey) -> Result<Vec<u8>> {
        let url = self.resolver.resolve(key).to_string();
        debug!(url = %url, "Fetching feed");

        let fetched = fetch_bytes(self.http.as_ref(), &url)?;
        match fetched.status {
            StatusCode::OK => Ok(fetched.body),
            StatusCode::NOT_FOUND => {
                warn!(url = %url, "Feed not found");
                Err(Error::FeedNotFound { key, url })
            }
            status => {
                warn!(url = %url, status = status.as_u16(), "Unexpected status");
                Err(Error::UnexpectedStatus {
                    key,
                    status: status.as_u16(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Timestamp;

    #[test]
    fn test_build_requires_base_url() {
        assert!(matches!(Client::builder().build(), Err(Error::BaseUrlMissing)));
        assert!(matches!(
            Client::builder().base_url("").build(),
            Err(Error::BaseUrlMissing)
        ));
    }

    #[test]
    fn test_build_keeps_forced_urls() {
        let mut client = Client::builder()
            .base_url("https://domain.tld")
            .language("en")
            .force_url(FeedKey::Gbfs, "https://domain.tld/gbfs.json")
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        assert_eq!(client.resolver().base_url(), "https://domain.tld");
        assert_eq!(client.resolver().len(), 1);
        assert_eq!(client.url(FeedKey::Gbfs), "https://domain.tld/gbfs.json");
        assert_eq!(
            client.url(FeedKey::StationStatus),
            "https://domain.tld/en/station_status.json"
        );
    }

    #[test]
    fn test_get_into_rejects_mismatched_destination() {
        // Unroutable: the check must fail before any request.
        let mut client = Client::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();

        let mut info = Envelope::<SystemInformationData>::default();
        let err = client.get_into(FeedKey::GbfsVersions, &mut info).unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidFeed {
                requested: FeedKey::GbfsVersions,
                declared: FeedKey::SystemInformation,
            }
        ));
        assert_eq!(client.resolver().cached(FeedKey::GbfsVersions), None);
    }

    #[test]
    fn test_refresh_skips_fresh_feed() {
        let mut client = Client::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();

        let mut feed = Envelope {
            last_updated: Timestamp::now(),
            ttl: 3600,
            version: None,
            data: SystemRegionsData::default(),
        };
        client.refresh(&mut feed, false).unwrap();
        assert!(client.resolver().is_empty());

        let err = client.refresh(&mut feed, true).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
