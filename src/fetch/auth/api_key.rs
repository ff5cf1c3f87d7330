use reqwest::header::{HeaderName, HeaderValue};

use crate::error::{Error, Result};
use crate::fetch::client::HttpClient;

/// An [`HttpClient`] wrapper that sends an API key as an HTTP header.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// `header_name` is the field to set (e.g. `"X-Api-Key"`), `value` is
    /// written into it as is.
    pub fn new(inner: C, header_name: &str, value: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())
            .map_err(|_| Error::InvalidHeader(header_name.to_string()))?;
        let mut value =
            HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader(header_name.to_string()))?;
        value.set_sensitive(true);

        Ok(Self {
            inner,
            header_name,
            value,
        })
    }

    /// `Authorization: Bearer <key>`
    pub fn bearer(inner: C, key: &str) -> Result<Self> {
        Self::new(inner, "Authorization", &format!("Bearer {key}"))
    }
}

impl<C: HttpClient> HttpClient for ApiKey<C> {
    fn execute(
        &self,
        mut req: reqwest::blocking::Request,
    ) -> reqwest::Result<reqwest::blocking::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req)
    }
}
