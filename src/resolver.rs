//! Per-feed URL resolution.
//!
//! A feed's URL is either an override (set up front, or imported from the
//! auto-discovery document) or `base_url/[language/]key.json`. Composed URLs
//! are memoized alongside the overrides.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::feed::FeedKey;

#[derive(Debug, Clone)]
pub struct UrlResolver {
    base_url: String,
    language: Option<String>,
    urls: HashMap<FeedKey, String>,
}

impl UrlResolver {
    /// Fails with [`Error::BaseUrlMissing`] when `base_url` is empty. A
    /// trailing `/` is dropped; an empty language counts as none.
    pub fn new(base_url: impl Into<String>, language: Option<String>) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(Error::BaseUrlMissing);
        }

        Ok(Self {
            base_url: base_url.to_string(),
            language: language.filter(|l| !l.is_empty()),
            urls: HashMap::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Uses `url` verbatim for `key`.
    pub fn force_url(&mut self, key: FeedKey, url: impl Into<String>) {
        self.urls.insert(key, url.into());
    }

    /// Sets several overrides at once. With `replace`, every previous entry
    /// (overrides and memoized URLs alike) is dropped first.
    pub fn force_urls<I>(&mut self, urls: I, replace: bool)
    where
        I: IntoIterator<Item = (FeedKey, String)>,
    {
        if replace {
            self.urls.clear();
        }
        self.urls.extend(urls);
    }

    /// The URL to fetch for `key`.
    pub fn resolve(&mut self, key: FeedKey) -> &str {
        self.urls.entry(key).or_insert_with(|| {
            let url = compose(&self.base_url, self.language.as_deref(), key);
            debug!(feed = %key, url = %url, "Composed feed URL");
            url
        })
    }

    /// The URL already known for `key`, without composing one.
    pub fn cached(&self, key: FeedKey) -> Option<&str> {
        self.urls.get(&key).map(String::as_str)
    }

    /// Number of known URLs, overrides included.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

fn compose(base_url: &str, language: Option<&str>, key: FeedKey) -> String {
    match language {
        Some(lang) => format!("{}/{}/{}", base_url, lang, key.file_name()),
        None => format!("{}/{}", base_url, key.file_name()),
    }
}
