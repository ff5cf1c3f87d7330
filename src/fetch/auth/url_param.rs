use crate::fetch::client::HttpClient;

/// An [`HttpClient`] wrapper that appends an API key as a URL query parameter.
pub struct UrlParam<C> {
    pub inner: C,
    pub param_name: String,
    pub key: String,
}

impl<C> UrlParam<C> {
    pub fn new(inner: C, param_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            inner,
            param_name: param_name.into(),
            key: key.into(),
        }
    }
}

impl<C: HttpClient> HttpClient for UrlParam<C> {
    fn execute(
        &self,
        mut req: reqwest::blocking::Request,
    ) -> reqwest::Result<reqwest::blocking::Response> {
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &self.key);
        self.inner.execute(req)
    }
}
